//! Error types for the repository index builder.

use std::path::PathBuf;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building repository indexes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with the offending path attached.
    #[error("I/O error on {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Invalid repository configuration.
    #[error("Invalid repository configuration: {0}")]
    InvalidConfiguration(String),

    /// A codename with no entry in the version map.
    #[error("Unknown distribution: {0}")]
    UnknownDistribution(String),

    /// An architecture directory whose name fits no naming rule.
    #[error("Cannot determine architecture for directory: {0}")]
    ArchitectureName(String),

    /// The package scanning tool is not installed.
    #[error("Package scanner not found: {command}")]
    ScannerNotFound { command: String },

    /// The package scanning tool ran but failed.
    #[error("Package scanner exited with status {status}: {stderr}")]
    ScannerFailed { status: i32, stderr: String },
}

impl Error {
    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Attach a path to an I/O error.
    pub fn path<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }
}
