//! ghtmatch-core - Basic data structures for shape matching
//!
//! This crate provides the image containers shared by the rest of the
//! workspace:
//!
//! - [`Pix`] / [`PixMut`] - The main image container (immutable / mutable)
//! - [`FPix`] - Floating-point field (gradient directions, accumulators)
//! - [`Pta`] - Point arrays
//! - [`Box`] - Rectangle regions
//!
//! Only the depths the matcher needs are supported: 1 bpp masks, 8 bpp
//! grayscale and 32 bpp RGB.

pub mod box_;
pub mod error;
pub mod fpix;
pub mod pix;
pub mod pta;

pub use box_::Box;
pub use error::{Error, Result};
pub use fpix::FPix;
pub use pix::{Color, Pix, PixMut, PixelDepth};
pub use pta::Pta;

/// Color channel helpers for 32-bit RGBA pixels.
///
/// # Pixel format
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Luminance weights applied when converting RGB to gray.
    pub const L_RED_WEIGHT: f32 = 0.299;
    pub const L_GREEN_WEIGHT: f32 = 0.587;
    pub const L_BLUE_WEIGHT: f32 = 0.114;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Compose a 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | (255 << ALPHA_SHIFT)
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Weighted luminance of an RGB triple, rounded to 0..=255.
    #[inline]
    pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
        let v = L_RED_WEIGHT * r as f32 + L_GREEN_WEIGHT * g as f32 + L_BLUE_WEIGHT * b as f32;
        (v + 0.5).min(255.0) as u8
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_compose_extract() {
            let p = compose_rgb(12, 34, 56);
            assert_eq!(extract_rgb(p), (12, 34, 56));
            assert_eq!(p & 0xff, 255);
        }

        #[test]
        fn test_luminance_extremes() {
            assert_eq!(luminance(0, 0, 0), 0);
            assert_eq!(luminance(255, 255, 255), 255);
            assert_eq!(luminance(255, 0, 0), 76);
        }
    }
}
