//! Error types for rowforge-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling a document
#[derive(Debug, Error)]
pub enum Error {
    /// A write arrived in an order the forward-only discipline forbids
    #[error("Out-of-order write: {0}")]
    OutOfOrderWrite(String),

    /// The style registry was already finalized
    #[error("Style registry is frozen; styles can no longer be registered")]
    RegistryFrozen,

    /// Invalid style parameter
    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    /// Invalid value or option parameter
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Cell value that cannot be represented in the container format
    #[error("Unsupported cell value: {0}")]
    UnsupportedValue(&'static str),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// A span larger than the whole buffer was requested
    #[error("Requested {requested} bytes but the buffer only holds {capacity}")]
    Capacity { requested: usize, capacity: usize },

    /// IO error from the destination sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The write was cancelled through a [`CancellationToken`](crate::CancellationToken)
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create an out-of-order write error with a message
    pub fn out_of_order<S: Into<String>>(msg: S) -> Self {
        Error::OutOfOrderWrite(msg.into())
    }

    /// Create an invalid value error with a message
    pub fn invalid_value<S: Into<String>>(msg: S) -> Self {
        Error::InvalidValue(msg.into())
    }

    /// Validation errors are reported at the offending value and do not
    /// compromise the output written so far.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidStyle(_)
                | Error::InvalidValue(_)
                | Error::UnsupportedValue(_)
                | Error::InvalidAddress(_)
                | Error::InvalidRange(_)
                | Error::InvalidSheetName(_)
                | Error::DuplicateSheetName(_)
        )
    }

    /// Check whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
