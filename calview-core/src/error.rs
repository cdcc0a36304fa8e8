//! Error types for calview.
//!
//! View operations never fail; these cover the fallible edges
//! (loading and saving settings).

use thiserror::Error;

/// Errors that can occur outside the view itself.
#[derive(Error, Debug)]
pub enum CalViewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for calview operations.
pub type CalViewResult<T> = Result<T, CalViewError>;
