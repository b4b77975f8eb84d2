//! Consumer-paced decoding pump.
//!
//! A [`Pump`] owns one background worker that reads a byte from its
//! [`Source`](tagpump_io::Source), decodes it, forwards any text to its
//! [`Sink`](tagpump_io::Sink), and then suspends until the owner calls
//! [`Pump::resume`] or [`Pump::stop`]. One byte per tick, strictly in order.

pub mod config;
pub mod error;
pub mod pump;
mod worker;

pub use config::{PumpConfig, DEFAULT_THREAD_NAME};
pub use error::{PumpError, Result};
pub use pump::{Pump, PumpState, PumpStats};
