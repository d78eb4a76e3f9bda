//! Read/write errors
//!
//! Codec errors from `png` and `jpeg-decoder` are flattened into strings so
//! callers see a single type regardless of enabled features.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unknown extension or magic bytes, or the codec feature is off
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Header or sample data that cannot be right
    #[error("malformed image: {0}")]
    InvalidData(String),

    #[error("decoding failed: {0}")]
    DecodeError(String),

    #[error("encoding failed: {0}")]
    EncodeError(String),

    #[error(transparent)]
    Core(#[from] ghtmatch_core::Error),
}

pub type IoResult<T> = Result<T, IoError>;
