//! ghtmatch-filter - Image filtering operations
//!
//! The preprocessing chain that turns a picture into edges:
//!
//! - Box blur
//! - Sobel gradients, gradient magnitude and direction
//! - Canny edge detection (non-maximum suppression + hysteresis)

pub mod convolve;
pub mod edge;
mod error;

pub use error::{FilterError, FilterResult};

pub use convolve::box_blur;
pub use edge::{
    GradientNorm, canny, canny_with_norm, gradient_direction, gradient_magnitude, sobel_gradients,
};

use ghtmatch_core::{Pix, PixelDepth};

pub(crate) fn check_grayscale(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8-bpp grayscale",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}
