//! FPix - Floating-point field
//!
//! `FPix` is a 2D array of `f32` values. The filter crate stores gradients
//! and edge directions in it; the matcher renders vote counts through it.
//!
//! # Examples
//!
//! ```
//! use ghtmatch_core::FPix;
//!
//! let mut fpix = FPix::new(100, 100).unwrap();
//! fpix.set_pixel(10, 20, 0.5).unwrap();
//! assert_eq!(fpix.get_pixel(10, 20), Some(0.5));
//!
//! let (max_val, max_x, max_y) = fpix.max().unwrap();
//! assert_eq!((max_val, max_x, max_y), (0.5, 10, 20));
//! ```

use crate::error::{Error, Result};
use crate::pix::{Pix, PixMut, PixelDepth};

/// Floating-point field
///
/// Data is stored in row-major order with no padding. The value at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct FPix {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FPix {
    /// Create a new FPix with all values set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0.0)
    }

    /// Create a new FPix with all values set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let size = (width as usize) * (height as usize);
        Ok(FPix {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create a FPix from row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected_size
            )));
        }
        Ok(FPix {
            width,
            height,
            data,
        })
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get a value, or `None` if out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// Get a value without bounds checking
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> f32 {
        self.data[self.index(x, y)]
    }

    /// Set a value
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if (x, y) is outside the field.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.width as usize) + (x as usize),
                len: self.data.len(),
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    /// Set a value without bounds checking
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: f32) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Get the raw data
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable raw data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Get one row
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[f32] {
        let start = self.index(0, y);
        &self.data[start..start + self.width as usize]
    }

    /// Find the maximum value and its first location in raster order
    ///
    /// Returns `(value, x, y)`; `None` only if every value is NaN.
    pub fn max(&self) -> Option<(f32, u32, u32)> {
        self.extreme(|cand, best| cand > best)
    }

    /// Find the minimum value and its first location in raster order
    pub fn min(&self) -> Option<(f32, u32, u32)> {
        self.extreme(|cand, best| cand < best)
    }

    fn extreme(&self, better: impl Fn(f32, f32) -> bool) -> Option<(f32, u32, u32)> {
        let mut best: Option<(f32, usize)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            match best {
                Some((b, _)) if !better(v, b) => {}
                _ => best = Some((v, i)),
            }
        }
        best.map(|(v, i)| {
            let w = self.width as usize;
            (v, (i % w) as u32, (i / w) as u32)
        })
    }

    /// Render the field as an 8 bpp image, linearly mapping
    /// `[min, max]` to `[0, 255]`.
    ///
    /// A constant field maps to all zeros.
    pub fn to_pix_normalized(&self) -> Result<Pix> {
        let mut out = PixMut::new(self.width, self.height, PixelDepth::Bit8)?;
        let (lo, hi) = match (self.min(), self.max()) {
            (Some((lo, _, _)), Some((hi, _, _))) => (lo, hi),
            _ => return Ok(out.into()),
        };
        let range = hi - lo;
        if range > 0.0 {
            for (dst, &v) in out.data_mut().iter_mut().zip(&self.data) {
                if v.is_nan() {
                    continue;
                }
                *dst = (((v - lo) / range) * 255.0 + 0.5).clamp(0.0, 255.0) as u32;
            }
        }
        Ok(out.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension() {
        assert!(FPix::new(0, 1).is_err());
        assert!(FPix::from_data(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_extremes_first_occurrence() {
        let f = FPix::from_data(3, 2, vec![1.0, 5.0, -2.0, 5.0, f32::NAN, -2.0]).unwrap();
        assert_eq!(f.max(), Some((5.0, 1, 0)));
        assert_eq!(f.min(), Some((-2.0, 2, 0)));
    }

    #[test]
    fn test_to_pix_normalized() {
        let f = FPix::from_data(3, 1, vec![0.0, 2.0, 4.0]).unwrap();
        let pix = f.to_pix_normalized().unwrap();
        assert_eq!(pix.data(), &[0, 128, 255]);

        let flat = FPix::new_with_value(2, 2, 7.0).unwrap();
        assert!(flat.to_pix_normalized().unwrap().data().iter().all(|&v| v == 0));
    }
}
