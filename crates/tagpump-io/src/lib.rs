//! Byte source and text sink capabilities.
//!
//! The pump never touches files, consoles or sockets directly. It pulls
//! bytes from a [`Source`] and pushes decoded text into a [`Sink`]:
//! - [`ReadSource`] / [`BufSource`] adapt `std::io::Read` and `bytes::Buf`
//! - [`WriteSink`] / [`ChannelSink`] adapt `std::io::Write` and `mpsc`
//!
//! This is the lowest layer of tagpump. Everything else builds on top of
//! the traits provided here.

pub mod error;
pub mod reader;
pub mod traits;
pub mod writer;

pub use error::{IoError, Result};
pub use reader::{BufSource, ReadSource};
pub use traits::{Sink, Source};
pub use writer::{ChannelSink, WriteSink, DEFAULT_SEPARATOR};
