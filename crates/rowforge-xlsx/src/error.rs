//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while writing an XLSX document
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Core error (sequencing, validation, capacity, cancellation)
    #[error("Core error: {0}")]
    Core(#[from] rowforge_core::Error),

    /// A mandatory part was never written
    #[error("Incomplete document: {0}")]
    IncompleteDocument(String),

    /// A part with the same name was already written
    #[error("Duplicate part: {0}")]
    DuplicatePart(String),

    /// The archive was already finished
    #[error("Archive is already finished")]
    ArchiveFinished,

    /// An earlier error left the session unusable
    #[error("Session aborted by an earlier error")]
    SessionAborted,

    /// Invalid session options
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl XlsxError {
    /// Check whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, XlsxError::Core(e) if e.is_cancelled())
    }

    /// Validation errors reject one call and leave the session usable.
    pub fn is_validation(&self) -> bool {
        match self {
            XlsxError::Core(e) => e.is_validation(),
            XlsxError::InvalidOptions(_) => true,
            _ => false,
        }
    }
}
