//! Filter errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Core(#[from] ghtmatch_core::Error),

    /// Input image has a depth the filter cannot read
    #[error("filter needs {expected} input, got {actual} bpp")]
    UnsupportedDepth {
        expected: &'static str,
        actual: u32,
    },

    #[error("bad filter parameters: {0}")]
    InvalidParameters(String),
}

pub type FilterResult<T> = Result<T, FilterError>;
