/// Errors that can occur while building or encoding tagged bytes.
///
/// Decoding never fails; these only arise on the encode side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The data field does not fit in 6 bits.
    #[error("data value {value} out of range (max {max})")]
    DataOutOfRange { value: u8, max: u8 },

    /// The signed value cannot be represented as a 6-bit two's-complement field.
    #[error("signed value {0} out of range (-32..=31)")]
    SignedOutOfRange(i8),

    /// The letter is outside the `a..=z` alphabet.
    #[error("letter {0:?} out of range ('a'..='z')")]
    LetterOutOfRange(char),

    /// A textual value token could not be parsed.
    #[error("invalid value token {token:?}: {reason}")]
    InvalidToken { token: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, CodecError>;
