use thiserror::Error;

use crate::replacer::PlaceholderFault;

/// Custom error types for the pipeio library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An inner source or sink reported more bytes than it was asked to move.
    #[error("Invalid result returned by underlying '{operation}' operation: {returned} of requested {requested}")]
    InvalidResult {
        operation: &'static str,
        returned: usize,
        requested: usize,
    },

    /// The source was exhausted before the requested number of bytes arrived.
    #[error("Read amount: {read} of expected: {expected}")]
    InsufficientBytes { read: usize, expected: usize },

    /// A fixed-capacity sink cannot take the whole write.
    #[error("Write overflow, requested: {requested}, available: {available}")]
    WriteOverflow { requested: usize, available: usize },

    /// Two characters that do not form a hexadecimal byte.
    #[error("Error parsing byte from HEX-pair: {pair:?}")]
    InvalidHex { pair: [u8; 2] },

    /// A hex stream that ended in the middle of a pair.
    #[error("Invalid non-even number of bytes available in HEX source")]
    OddHexLength,

    /// Adapter construction with unusable parameters.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A placeholder problem escalated by the replacer's fault handler.
    #[error(transparent)]
    Placeholder(#[from] PlaceholderFault),
}

impl Error {
    /// Create an `InvalidResult` error for an inner operation that over-reported.
    pub fn invalid_result(operation: &'static str, returned: usize, requested: usize) -> Self {
        Self::InvalidResult {
            operation,
            returned,
            requested,
        }
    }

    /// Create an `InsufficientBytes` error.
    pub fn insufficient(read: usize, expected: usize) -> Self {
        Self::InsufficientBytes { read, expected }
    }

    /// Create an `InvalidConfig` error with a descriptive message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
