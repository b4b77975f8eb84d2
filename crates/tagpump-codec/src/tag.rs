//! The 2-bit type tag carried in bits 7-6 of every encoded byte.

/// Unsigned integer: data is its own value (0-63).
pub const UNSIGNED: u8 = 0b00;

/// Signed integer: data is a 6-bit two's-complement value (-32..=31).
pub const SIGNED: u8 = 0b01;

/// Lowercase Latin letter: data is an offset from `'a'`.
pub const LETTER: u8 = 0b10;

/// Reserved: produces no output.
pub const RESERVED: u8 = 0b11;

/// Interpretation selected by the two high bits of an encoded byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Unsigned = UNSIGNED,
    Signed = SIGNED,
    Letter = LETTER,
    Reserved = RESERVED,
}

impl TypeTag {
    /// Build a tag from the low two bits of `bits`. Higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            UNSIGNED => Self::Unsigned,
            SIGNED => Self::Signed,
            LETTER => Self::Letter,
            _ => Self::Reserved,
        }
    }

    /// The 2-bit wire value of this tag.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable name for the tag.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unsigned => "UNSIGNED",
            Self::Signed => "SIGNED",
            Self::Letter => "LETTER",
            Self::Reserved => "RESERVED",
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
