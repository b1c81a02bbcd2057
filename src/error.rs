//! Error types for wavstream

use thiserror::Error;

/// Result type alias for wavstream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wavstream
///
/// Every variant is fatal to the decode session that produced it; there is
/// no internal retry. A corrupt header cannot be guessed past.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid RIFF/WAVE container preamble
    #[error("Container error: {0}")]
    Container(String),

    /// Unsupported format tag or bit depth, or a malformed `fmt ` chunk
    #[error("Format error: {0}")]
    Format(String),

    /// Source exhausted before both `fmt ` and `data` chunks were located
    #[error("Missing chunk: {0}")]
    MissingChunk(String),

    /// IO error from the byte source or output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session lifecycle misuse
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Create a container error
    pub fn container<S: Into<String>>(msg: S) -> Self {
        Error::Container(msg.into())
    }

    /// Create a format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }

    /// Create a missing chunk error
    pub fn missing_chunk<S: Into<String>>(msg: S) -> Self {
        Error::MissingChunk(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Error::InvalidState(msg.into())
    }
}
