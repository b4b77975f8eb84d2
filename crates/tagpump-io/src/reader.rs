use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use bytes::{Buf, BytesMut};

use crate::error::{IoError, Result};
use crate::traits::Source;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Pulls bytes one at a time from any `Read` stream.
///
/// Reads are chunked internally. EOF ends the source; any other I/O
/// error is logged, kept for [`ReadSource::take_error`], and also ends it.
pub struct ReadSource<R> {
    inner: R,
    buf: BytesMut,
    exhausted: bool,
    error: Option<std::io::Error>,
}

impl<R: Read> ReadSource<R> {
    /// Create a new source over `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            exhausted: false,
            error: None,
        }
    }

    /// Returns true once the source has reported exhaustion.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Take the I/O error that ended the source, if any.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the source and return the inner stream.
    ///
    /// Bytes already buffered but not yet read are discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    tracing::debug!("source reached end of stream");
                    self.exhausted = true;
                    return;
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::warn!(error = %err, "source read failed; treating as exhausted");
                    self.error = Some(err);
                    self.exhausted = true;
                    return;
                }
            }
        }
    }
}

impl ReadSource<File> {
    /// Open a file as a byte source.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file))
    }
}

impl<R: Read + Send> Source for ReadSource<R> {
    fn read_byte(&mut self) -> Option<u8> {
        if self.buf.is_empty() && !self.exhausted {
            self.fill();
        }
        if self.buf.is_empty() {
            return None;
        }
        Some(self.buf.get_u8())
    }
}

impl<R> std::fmt::Debug for ReadSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadSource")
            .field("buffered", &self.buf.len())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

/// Drains an in-memory buffer (`Bytes`, `VecDeque<u8>`, `&'static [u8]`, ...).
#[derive(Debug, Clone)]
pub struct BufSource<B> {
    inner: B,
}

impl<B: Buf> BufSource<B> {
    /// Create a new source over `inner`.
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }

    /// Consume the source and return the remaining buffer.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: Buf + Send> Source for BufSource<B> {
    fn read_byte(&mut self) -> Option<u8> {
        self.inner.has_remaining().then(|| self.inner.get_u8())
    }
}
