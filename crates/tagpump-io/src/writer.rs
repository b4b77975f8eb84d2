use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Sender;

use crate::error::{IoError, Result};
use crate::traits::Sink;

/// Separator written after every fragment by default.
pub const DEFAULT_SEPARATOR: &str = "\n";

/// Writes fragments to any `Write` stream.
///
/// Each fragment is followed by the separator and flushed so output shows
/// up as soon as it is decoded. Failed writes are logged and the first
/// failure is kept for [`WriteSink::take_error`]; nothing is retried.
pub struct WriteSink<W> {
    inner: W,
    separator: String,
    error: Option<std::io::Error>,
}

impl<W: Write> WriteSink<W> {
    /// Create a new sink with the default newline separator.
    pub fn new(inner: W) -> Self {
        Self::with_separator(inner, DEFAULT_SEPARATOR)
    }

    /// Create a new sink with an explicit separator (may be empty).
    pub fn with_separator(inner: W, separator: impl Into<String>) -> Self {
        Self {
            inner,
            separator: separator.into(),
            error: None,
        }
    }

    /// Take the first write failure, if any.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the sink and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn try_write(&mut self, text: &str) -> std::io::Result<()> {
        self.inner.write_all(text.as_bytes())?;
        self.inner.write_all(self.separator.as_bytes())?;
        self.inner.flush()
    }
}

impl WriteSink<File> {
    /// Create (or truncate) a file as a text sink.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| IoError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> Sink for WriteSink<W> {
    fn write(&mut self, text: &str) {
        if let Err(err) = self.try_write(text) {
            tracing::warn!(error = %err, "sink write failed; fragment dropped");
            if self.error.is_none() {
                self.error = Some(err);
            }
        }
    }
}

impl<W> std::fmt::Debug for WriteSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteSink")
            .field("separator", &self.separator)
            .field("failed", &self.error.is_some())
            .finish()
    }
}

/// Forwards fragments to another thread over an `mpsc` channel.
///
/// Once the receiver hangs up, further fragments are dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<String>,
}

impl ChannelSink {
    /// Create a sink sending into `tx`.
    pub fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }
}

impl Sink for ChannelSink {
    fn write(&mut self, text: &str) {
        if self.tx.send(text.to_string()).is_err() {
            tracing::trace!("channel sink receiver gone; fragment dropped");
        }
    }
}
