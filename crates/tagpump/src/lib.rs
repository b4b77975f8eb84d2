//! Decode two-bit type tagged bytes on a consumer-paced background worker.
//!
//! Each input byte carries a type tag in its top two bits and a 6-bit
//! payload: an unsigned integer, a signed integer or a lowercase letter.
//!
//! # Crate Structure
//!
//! - [`io`]: Byte source and text sink capabilities with std adapters
//! - [`codec`]: Pure single-byte decoder (and the matching encoder)
//! - [`pump`]: Background worker pumping a source into a sink (behind `pump` feature)

/// Re-export source/sink types.
pub mod io {
    pub use tagpump_io::*;
}

/// Re-export codec types.
pub mod codec {
    pub use tagpump_codec::*;
}

/// Re-export pump types (requires `pump` feature).
#[cfg(feature = "pump")]
pub mod pump {
    pub use tagpump_pump::*;
}

pub use tagpump_codec::{decode, Decoded};
