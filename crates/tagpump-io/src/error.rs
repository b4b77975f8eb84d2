use std::path::PathBuf;

/// Errors that can occur while setting up a source or sink adapter.
///
/// Reading and writing themselves never fail through this type: exhaustion
/// is reported as `None` and sink writes are fire-and-forget.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Failed to open the given path for reading.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the given path for writing.
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IoError>;
