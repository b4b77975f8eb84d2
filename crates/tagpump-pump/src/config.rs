/// Thread name given to the worker unless configured otherwise.
pub const DEFAULT_THREAD_NAME: &str = "tagpump-worker";

/// Pump behavior configuration.
#[derive(Debug, Clone)]
pub struct PumpConfig {
    /// Name of the worker thread (shows up in panics and debuggers).
    pub thread_name: String,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl PumpConfig {
    /// Override the worker thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
