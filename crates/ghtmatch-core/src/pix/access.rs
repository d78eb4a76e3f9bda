//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.

use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.inner.data[self.inner.index(x, y)])
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if the linear index falls outside the data buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.inner.data[self.inner.index(x, y)]
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.inner.depth != PixelDepth::Bit32 {
            return None;
        }
        self.get_pixel(x, y).map(color::extract_rgb)
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.inner.data[self.inner.index(x, y)])
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.inner.data[self.inner.index(x, y)]
    }

    /// Set a pixel value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds
    /// and [`Error::InvalidParameter`] if `val` doesn't fit the depth.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.inner.width as usize) + (x as usize),
                len: self.inner.data.len(),
            });
        }
        if val > self.inner.depth.max_value() {
            return Err(Error::InvalidParameter(format!(
                "value {} exceeds {} bpp range",
                val,
                self.inner.depth.bits()
            )));
        }
        let idx = self.inner.index(x, y);
        self.inner.data[idx] = val;
        Ok(())
    }

    /// Set a pixel value without bounds or range checking.
    ///
    /// # Panics
    ///
    /// Panics if the linear index falls outside the data buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let idx = self.inner.index(x, y);
        self.inner.data[idx] = val;
    }

    /// Set an RGB pixel at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.inner.depth != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.inner.depth.bits()));
        }
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip() {
        let mut pm = PixMut::new(5, 4, PixelDepth::Bit8).unwrap();
        pm.set_pixel(4, 3, 200).unwrap();
        assert_eq!(pm.get_pixel(4, 3), Some(200));
        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(4, 3), Some(200));
        assert_eq!(pix.get_pixel(5, 3), None);
    }

    #[test]
    fn test_set_out_of_range() {
        let mut pm = PixMut::new(2, 2, PixelDepth::Bit1).unwrap();
        assert!(pm.set_pixel(0, 0, 2).is_err());
        assert!(pm.set_pixel(2, 0, 1).is_err());
    }

    #[test]
    fn test_rgb_requires_32bpp() {
        let mut pm = PixMut::new(2, 2, PixelDepth::Bit8).unwrap();
        assert!(pm.set_rgb(0, 0, 1, 2, 3).is_err());
        let mut pm = PixMut::new(2, 2, PixelDepth::Bit32).unwrap();
        pm.set_rgb(1, 1, 1, 2, 3).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(1, 1), Some((1, 2, 3)));
    }
}
