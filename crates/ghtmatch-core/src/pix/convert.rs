//! Depth conversion and pixel counts
//!
//! - [`Pix::convert_to_8`] - any depth to 8 bpp grayscale
//! - [`Pix::convert_to_32`] - any depth to 32 bpp RGB
//! - [`Pix::count_pixels`] - nonzero pixel count

use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::Result;

impl Pix {
    /// Convert any-depth image to 8 bpp grayscale.
    ///
    /// - **1 bpp**: 0 -> 0, 1 -> 255 (edge masks stay bright-on-dark)
    /// - **8 bpp**: deep copy
    /// - **32 bpp**: weighted luminance
    ///
    /// ```
    /// use ghtmatch_core::{Pix, PixelDepth};
    ///
    /// let pix32 = Pix::new(10, 10, PixelDepth::Bit32).unwrap();
    /// let pix8 = pix32.convert_to_8().unwrap();
    /// assert_eq!(pix8.depth(), PixelDepth::Bit8);
    /// ```
    pub fn convert_to_8(&self) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit8 {
            return Ok(self.deep_clone());
        }
        let mut out = PixMut::new(self.width(), self.height(), PixelDepth::Bit8)?;
        let depth = self.depth();
        for (dst, &src) in out.data_mut().iter_mut().zip(self.data()) {
            *dst = match depth {
                PixelDepth::Bit1 => src * 255,
                PixelDepth::Bit8 => src,
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(src);
                    color::luminance(r, g, b) as u32
                }
            };
        }
        Ok(out.into())
    }

    /// Convert any-depth image to 32 bpp RGB.
    ///
    /// Gray values are replicated into R=G=B; 1 bpp maps 1 to white.
    pub fn convert_to_32(&self) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit32 {
            return Ok(self.deep_clone());
        }
        let gray = self.convert_to_8()?;
        let mut out = PixMut::new(self.width(), self.height(), PixelDepth::Bit32)?;
        for (dst, &g) in out.data_mut().iter_mut().zip(gray.data()) {
            let g = g as u8;
            *dst = color::compose_rgb(g, g, g);
        }
        Ok(out.into())
    }

    /// Count the pixels with a nonzero value.
    pub fn count_pixels(&self) -> u64 {
        self.data().iter().filter(|&&v| v != 0).count() as u64
    }
}
