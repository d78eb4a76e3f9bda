//! Error types for ghtmatch-hough

use thiserror::Error;

/// Errors that can occur while building tables or matching
#[derive(Debug, Error)]
pub enum GhtError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ghtmatch_core::Error),

    /// Edge detection error
    #[error("filter error: {0}")]
    Filter(#[from] ghtmatch_filter::FilterError),

    /// A search range whose bounds are not finite or out of order
    #[error("invalid {name} range: min {min} > max {max}")]
    InvalidRange {
        /// Which range ("rotation" or "scale")
        name: &'static str,
        min: f64,
        max: f64,
    },

    /// A search step that is not finite and positive
    #[error("invalid {name} step {step}: must be finite and positive")]
    InvalidStep {
        /// Which range ("rotation" or "scale")
        name: &'static str,
        step: f64,
    },

    /// Any other rejected option
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Edge mask and direction field have different sizes
    #[error("dimension mismatch: edge mask is {mask:?}, direction field is {direction:?}")]
    DimensionMismatch {
        mask: (u32, u32),
        direction: (u32, u32),
    },

    /// The sweep observed its cancellation token
    #[error("matching cancelled")]
    Cancelled,
}

/// Result type for Hough operations
pub type GhtResult<T> = Result<T, GhtError>;
