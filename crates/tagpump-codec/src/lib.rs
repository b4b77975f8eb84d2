//! Type-tagged single-byte decoding.
//!
//! Every encoded byte is a self-contained unit:
//! - Bits 7-6 carry a 2-bit type tag
//! - Bits 5-0 carry a 6-bit data field interpreted according to the tag
//!
//! Decoding is total over all 256 byte values. Bytes with no defined
//! meaning decode to `None` rather than an error.

pub mod codec;
pub mod error;
pub mod tag;

pub use codec::{
    decode, decode_all, decode_byte, encode, sign_extend_6, DecodeAll, Decoded, EncodedByte,
    DATA_MASK, LETTER_COUNT, SIGNED_MAX, SIGNED_MIN, TYPE_MASK, TYPE_SHIFT,
};
pub use error::{CodecError, Result};
pub use tag::TypeTag;
