//! Errors raised by the image containers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Width or height is zero
    #[error("image cannot be {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Bit depth other than 1, 8 or 32
    #[error("no {0} bpp images")]
    InvalidDepth(u32),

    #[error("pixel index {index} outside buffer of {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("expected a {}x{} image, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The depth exists but the operation does not handle it
    #[error("operation does not handle {0} bpp")]
    UnsupportedDepth(u32),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
