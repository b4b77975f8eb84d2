/// Errors that can occur in pump lifecycle operations.
///
/// Source exhaustion and undecodable bytes are not errors; they end the
/// worker loop or produce no output respectively.
#[derive(Debug, thiserror::Error)]
pub enum PumpError {
    /// The OS refused to spawn the worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The source and sink are still shared with a live worker.
    #[error("pump collaborators still in use by the worker")]
    Busy,
}

pub type Result<T> = std::result::Result<T, PumpError>;
