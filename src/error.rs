use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised by the progress callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Known errors for checksum operations.
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// Occurs when the requested method has no registered hash engine
    #[error("Unsupported checksum method {0}")]
    UnsupportedMethod(String),

    #[error("No file exists at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Access denied to {}", .0.display())]
    AccessDenied(PathBuf),

    /// Represents errors that occur during IO operations
    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),

    /// Occurs when the tracked source is asked to do something other than read
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The progress callback returned an error, aborting the computation
    #[error("Progress callback failed: {0}")]
    CallbackFailure(#[source] CallbackError),

    #[error("Checksum computation was cancelled")]
    Cancelled,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Occurs when a checksum string does not follow the expected format
    #[error("Invalid checksum string format, expected '<method>;<digest>' or '<digest>'")]
    InvalidChecksumFormat,
}

impl ChecksumError {
    /// Classifies a failure to open `path`.
    pub fn from_open(path: impl Into<PathBuf>, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => ChecksumError::NotFound(path.into()),
            io::ErrorKind::PermissionDenied => ChecksumError::AccessDenied(path.into()),
            _ => ChecksumError::IoError(error),
        }
    }

    /// Classifies a failure to read from an already opened source.
    pub fn from_read(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::Unsupported => ChecksumError::UnsupportedOperation(error.to_string()),
            _ => ChecksumError::IoError(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_open_not_found() {
        let error = ChecksumError::from_open(
            "missing.bin",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(error, ChecksumError::NotFound(path) if path == PathBuf::from("missing.bin")));
    }

    #[test]
    fn test_from_open_permission_denied() {
        let error = ChecksumError::from_open(
            "locked.bin",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(error, ChecksumError::AccessDenied(_)));
    }

    #[test]
    fn test_from_open_other_is_io_error() {
        let error = ChecksumError::from_open("dir", io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(matches!(error, ChecksumError::IoError(_)));
    }

    #[test]
    fn test_from_read_unsupported() {
        let error = ChecksumError::from_read(io::Error::new(io::ErrorKind::Unsupported, "seek"));
        assert!(matches!(error, ChecksumError::UnsupportedOperation(_)));
    }
}
