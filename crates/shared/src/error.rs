//! Failure taxonomy shared by the services and the API client.
//!
//! Everything user-triggered is caught at the call site and shown as a
//! transient notice; nothing here is fatal to the process.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing directory or file.
    #[error("not found: {0}")]
    NotFound(String),

    /// The OS refused access.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Read/write failure other than the two above.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout, connectivity, or a non-2xx reply (status and body excerpt
    /// are folded into the message).
    #[error("network failure: {0}")]
    Network(String),

    /// A 2xx reply with no payload.
    #[error("empty response from server")]
    EmptyResponse,
}

impl Error {
    /// Classify an OS error against the taxonomy, keeping the path in the
    /// message for `NotFound` and `PermissionDenied`.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => {
                Error::PermissionDenied(path.display().to_string())
            }
            _ => Error::Io(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn io_errors_classify_by_kind() {
        let path = PathBuf::from("/tmp/gone");
        let err = Error::from_io(
            &path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(matches!(err, Error::NotFound(_)));

        let err = Error::from_io(
            &path,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, Error::PermissionDenied(_)));

        let err = Error::from_io(
            &path,
            std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        );
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn messages_keep_the_path() {
        let err = Error::NotFound("/sdcard/docs".to_string());
        assert_eq!(err.to_string(), "not found: /sdcard/docs");
    }
}
