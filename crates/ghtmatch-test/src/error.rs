//! Harness errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestError {
    /// A synthetic test image could not be built
    #[error("fixture: {0}")]
    Fixture(#[from] ghtmatch_core::Error),

    #[error("cannot write '{path}': {message}")]
    ImageWrite { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type TestResult<T> = Result<T, TestError>;
