//! PIX - The main image container
//!
//! `Pix` holds edge masks (1 bpp), grayscale images (8 bpp) and RGB
//! images (32 bpp).
//!
//! # Pixel layout
//!
//! - One `u32` sample per pixel, row-major, no padding
//! - For 32-bit images, color order is RGBA (red in MSB)
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership), so a template or
//! target image can be handed to many hypothesis workers at once.
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;
pub mod convert;
pub mod graphics;

pub use graphics::Color;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Bits per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image (edge masks)
    Bit1 = 1,
    /// 8-bit grayscale
    Bit8 = 8,
    /// 32-bit RGB or RGBA
    Bit32 = 32,
}

impl PixelDepth {
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] unless `bits` is 1, 8 or 32.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            8 => Ok(PixelDepth::Bit8),
            32 => Ok(PixelDepth::Bit32),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Largest sample a pixel of this depth can hold.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }
}

#[derive(Debug, Clone)]
struct PixData {
    width: u32,
    height: u32,
    depth: PixelDepth,
    /// 1 for masks and gray, 3 or 4 for color
    spp: u32,
    data: Vec<u32>,
}

impl PixData {
    fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let spp = if depth == PixelDepth::Bit32 { 3 } else { 1 };
        Ok(PixData {
            width,
            height,
            depth,
            spp,
            data: vec![0u32; (width as usize) * (height as usize)],
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    #[inline]
    fn row_range(&self, y: u32) -> std::ops::Range<usize> {
        let start = self.index(0, y);
        start..start + self.width as usize
    }
}

/// Shared, read-only image.
///
/// # Examples
///
/// ```
/// use ghtmatch_core::{Pix, PixelDepth};
///
/// let target = Pix::new(640, 480, PixelDepth::Bit8).unwrap();
/// assert_eq!(target.dimensions(), (640, 480));
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Black image of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] when either side is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(Pix {
            inner: Arc::new(PixData::new(width, height, depth)?),
        })
    }

    /// Wrap row-major samples.
    ///
    /// # Errors
    ///
    /// Fails when `data` has the wrong length or holds a sample too large
    /// for `depth`.
    pub fn from_data(width: u32, height: u32, depth: PixelDepth, data: Vec<u32>) -> Result<Self> {
        let mut inner = PixData::new(width, height, depth)?;
        if data.len() != inner.data.len() {
            return Err(Error::InvalidParameter(format!(
                "{}x{} image needs {} samples, got {}",
                width,
                height,
                inner.data.len(),
                data.len()
            )));
        }
        let max = depth.max_value();
        if let Some(bad) = data.iter().find(|&&v| v > max) {
            return Err(Error::InvalidParameter(format!(
                "sample {} does not fit in {} bpp",
                bad,
                depth.bits()
            )));
        }
        inner.data = data;
        Ok(Pix {
            inner: Arc::new(inner),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// All samples, row-major.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Samples of row `y`. Panics when `y` is out of range.
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        &self.inner.data[self.inner.row_range(y)]
    }

    /// Same width, height and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.dimensions() == other.dimensions() && self.depth() == other.depth()
    }

    /// Copy that shares no storage with `self`.
    pub fn deep_clone(&self) -> Self {
        Pix {
            inner: Arc::new(self.inner.as_ref().clone()),
        }
    }

    /// Take the pixels for editing without copying; hands `self` back when
    /// other clones still share them.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        Arc::try_unwrap(self.inner)
            .map(|inner| PixMut { inner })
            .map_err(|inner| Pix { inner })
    }

    /// Editable copy.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: self.inner.as_ref().clone(),
        }
    }
}

/// Image being written: decoders, converters and overlay drawing fill one
/// of these, then freeze it with `Pix::from`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] when either side is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(PixMut {
            inner: PixData::new(width, height, depth)?,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Mark a 32 bpp image as RGB (3) or RGBA (4).
    pub fn set_spp(&mut self, spp: u32) {
        self.inner.spp = spp;
    }

    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Samples of row `y`. Panics when `y` is out of range.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let range = self.inner.row_range(y);
        &mut self.inner.data[range]
    }
}

impl From<PixMut> for Pix {
    fn from(pix: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zero_dimension() {
        assert!(Pix::new(0, 10, PixelDepth::Bit8).is_err());
        assert!(PixMut::new(10, 0, PixelDepth::Bit1).is_err());
    }

    #[test]
    fn test_depth_from_bits() {
        assert_eq!(PixelDepth::from_bits(8).unwrap(), PixelDepth::Bit8);
        assert!(PixelDepth::from_bits(4).is_err());
        assert_eq!(PixelDepth::Bit1.max_value(), 1);
        assert_eq!(PixelDepth::Bit8.max_value(), 255);
    }

    #[test]
    fn test_from_data_validates() {
        assert!(Pix::from_data(2, 2, PixelDepth::Bit1, vec![0, 1, 1, 0]).is_ok());
        assert!(Pix::from_data(2, 2, PixelDepth::Bit1, vec![0, 2, 1, 0]).is_err());
        assert!(Pix::from_data(2, 2, PixelDepth::Bit8, vec![0; 3]).is_err());
    }

    #[test]
    fn test_try_into_mut_shared() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let shared = pix.clone();
        let pix = pix.try_into_mut().unwrap_err();
        drop(shared);
        assert!(pix.try_into_mut().is_ok());
    }

    #[test]
    fn test_rows_and_copies() {
        let mut pm = PixMut::new(3, 2, PixelDepth::Bit8).unwrap();
        pm.row_mut(1).fill(9);
        let pix: Pix = pm.into();
        assert_eq!(pix.row(0), &[0, 0, 0]);
        assert_eq!(pix.row(1), &[9, 9, 9]);

        let mut edited = pix.to_mut();
        edited.data_mut()[0] = 5;
        let edited: Pix = edited.into();
        assert!(edited.sizes_equal(&pix));
        assert_eq!(pix.data()[0], 0);
        assert_eq!(pix.deep_clone().data(), pix.data());
    }
}
