//! Error types for the logger

use std::io;
use std::path::PathBuf;

/// Result type for logger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or writing to the file sink
///
/// Only directory creation and file opening reach the host; the remaining
/// variants are recorded and swallowed inside the logger.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The log directory was missing and could not be created
    #[error("Failed to create log directory at {path}: {source}")]
    DirectoryCreateFailed {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// The active log file could not be opened for writing
    #[error("Failed to open log file {path}: {source}")]
    FileOpenFailed {
        /// File that could not be opened
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// A rotation step referred to a file that no longer exists
    #[error("Rotation source {0} is missing")]
    RenameSourceMissing(PathBuf),

    /// The file sink was not open when a message arrived
    #[error("Log file is not ready for writing")]
    WriteSkippedFileNotReady,

    /// A rotation step failed for a reason other than a missing source
    #[error("Failed to rotate log file: {0}")]
    Rotation(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether this error disables the file sink
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::DirectoryCreateFailed { .. } | Error::FileOpenFailed { .. }
        )
    }
}
