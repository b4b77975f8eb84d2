use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, Result};
use crate::tag::TypeTag;

/// Shift that moves the type tag into the low two bits.
pub const TYPE_SHIFT: u32 = 6;

/// Mask applied after [`TYPE_SHIFT`] to isolate the type tag.
pub const TYPE_MASK: u8 = 0b11;

/// Mask isolating the 6-bit data field.
pub const DATA_MASK: u8 = 0b11_1111;

/// Number of letters addressable by the letter tag (`'a'..='z'`).
pub const LETTER_COUNT: u8 = 26;

/// Smallest value representable by the signed tag.
pub const SIGNED_MIN: i8 = -32;

/// Largest value representable by the signed tag.
pub const SIGNED_MAX: i8 = 31;

/// One raw input byte viewed as a (tag, data) pair.
///
/// Bit layout:
/// ```text
/// ┌───┬───┬───┬───┬───┬───┬───┬───┐
/// │ 7 │ 6 │ 5 │ 4 │ 3 │ 2 │ 1 │ 0 │
/// ├───┴───┼───┴───┴───┴───┴───┴───┤
/// │ type  │ data                  │
/// └───────┴───────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedByte(u8);

impl EncodedByte {
    /// Wrap a raw byte.
    pub fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Assemble a byte from a tag and a 6-bit data field.
    pub fn from_parts(tag: TypeTag, data: u8) -> Result<Self> {
        if data > DATA_MASK {
            return Err(CodecError::DataOutOfRange {
                value: data,
                max: DATA_MASK,
            });
        }
        Ok(Self((tag.bits() << TYPE_SHIFT) | data))
    }

    /// The type tag in bits 7-6.
    pub fn tag(self) -> TypeTag {
        TypeTag::from_bits((self.0 >> TYPE_SHIFT) & TYPE_MASK)
    }

    /// The data field in bits 5-0.
    pub fn data(self) -> u8 {
        self.0 & DATA_MASK
    }

    /// The underlying byte.
    pub fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for EncodedByte {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

/// A successfully decoded value.
///
/// `Display` yields the text fragment handed to a sink: decimal digits for
/// the integer tags and a single character for letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoded {
    /// Unsigned integer, 0-63.
    Unsigned(u8),
    /// Signed integer, -32..=31.
    Signed(i8),
    /// Lowercase letter, `'a'..='z'`.
    Letter(char),
}

impl Decoded {
    /// The tag that produces this kind of value.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Unsigned(_) => TypeTag::Unsigned,
            Self::Signed(_) => TypeTag::Signed,
            Self::Letter(_) => TypeTag::Letter,
        }
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Signed(value) => write!(f, "{value}"),
            Self::Letter(letter) => write!(f, "{letter}"),
        }
    }
}

/// Parses `u:<n>`, `s:<n>` and `l:<c>` tokens.
///
/// The parsed value is range-checked, so anything accepted here encodes.
impl FromStr for Decoded {
    type Err = CodecError;

    fn from_str(token: &str) -> Result<Self> {
        let invalid = |reason| CodecError::InvalidToken {
            token: token.to_string(),
            reason,
        };

        let (kind, value) = token
            .trim()
            .split_once(':')
            .ok_or_else(|| invalid("expected <kind>:<value>"))?;

        let decoded = match kind {
            "u" => Self::Unsigned(value.parse().map_err(|_| invalid("not an unsigned integer"))?),
            "s" => Self::Signed(value.parse().map_err(|_| invalid("not a signed integer"))?),
            "l" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(letter), None) => Self::Letter(letter),
                    _ => return Err(invalid("expected a single letter")),
                }
            }
            _ => return Err(invalid("kind must be one of u, s, l")),
        };

        encode(decoded)?;
        Ok(decoded)
    }
}

/// Sign-extend a 6-bit two's-complement field to `i8`.
///
/// Only the low six bits of `data` are considered: 0-31 map to themselves,
/// 32-63 map to `data - 64`. This is not the same as `data as i8`, which
/// treats bit 7 as the sign and leaves 32-63 positive.
pub fn sign_extend_6(data: u8) -> i8 {
    (((data & DATA_MASK) << 2) as i8) >> 2
}

/// Decode one byte into a typed value.
///
/// Returns `None` for the reserved tag and for letter offsets past `'z'`.
pub fn decode_byte(byte: u8) -> Option<Decoded> {
    let encoded = EncodedByte::new(byte);
    let data = encoded.data();

    match encoded.tag() {
        TypeTag::Unsigned => Some(Decoded::Unsigned(data)),
        TypeTag::Signed => Some(Decoded::Signed(sign_extend_6(data))),
        TypeTag::Letter if data < LETTER_COUNT => Some(Decoded::Letter(char::from(b'a' + data))),
        TypeTag::Letter | TypeTag::Reserved => None,
    }
}

/// Decode one byte into its text fragment.
pub fn decode(byte: u8) -> Option<String> {
    decode_byte(byte).map(|value| value.to_string())
}

/// Encode a value into the byte that decodes back to it.
pub fn encode(value: Decoded) -> Result<u8> {
    let encoded = match value {
        Decoded::Unsigned(value) => EncodedByte::from_parts(TypeTag::Unsigned, value)?,
        Decoded::Signed(value) => {
            if !(SIGNED_MIN..=SIGNED_MAX).contains(&value) {
                return Err(CodecError::SignedOutOfRange(value));
            }
            EncodedByte::from_parts(TypeTag::Signed, (value as u8) & DATA_MASK)?
        }
        Decoded::Letter(letter) => {
            if !letter.is_ascii_lowercase() {
                return Err(CodecError::LetterOutOfRange(letter));
            }
            EncodedByte::from_parts(TypeTag::Letter, letter as u8 - b'a')?
        }
    };
    Ok(encoded.raw())
}

/// Decode every byte of `bytes` in order.
pub fn decode_all(bytes: &[u8]) -> DecodeAll<'_> {
    DecodeAll {
        inner: bytes.iter(),
    }
}

/// Iterator returned by [`decode_all`].
#[derive(Debug, Clone)]
pub struct DecodeAll<'a> {
    inner: std::slice::Iter<'a, u8>,
}

impl Iterator for DecodeAll<'_> {
    type Item = (EncodedByte, Option<Decoded>);

    fn next(&mut self) -> Option<Self::Item> {
        let byte = *self.inner.next()?;
        Some((EncodedByte::new(byte), decode_byte(byte)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for DecodeAll<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_bytes_decode_to_their_value() {
        for byte in 0x00..=0x3Fu8 {
            assert_eq!(decode(byte), Some(byte.to_string()));
        }
    }

    #[test]
    fn signed_lower_half_maps_to_itself() {
        for byte in 0x40..=0x5Fu8 {
            let data = byte & DATA_MASK;
            assert_eq!(decode(byte), Some(data.to_string()));
        }
    }

    #[test]
    fn signed_upper_half_is_negative() {
        for byte in 0x60..=0x7Fu8 {
            let data = i16::from(byte & DATA_MASK);
            assert_eq!(decode(byte), Some((data - 64).to_string()));
        }
    }

    #[test]
    fn signed_decoding_uses_six_bit_width_not_eight() {
        // An 8-bit signed cast of the masked field would keep 63 positive.
        let data = 0x7Fu8 & DATA_MASK;
        assert_eq!(data as i8, 63);
        assert_eq!(sign_extend_6(data), -1);
        assert_eq!(decode(0x7F).as_deref(), Some("-1"));
        assert_eq!(decode(0x60).as_deref(), Some("-32"));
        assert_eq!(decode(0x5F).as_deref(), Some("31"));
    }

    #[test]
    fn sign_extend_ignores_high_bits() {
        assert_eq!(sign_extend_6(0b1100_0001), 1);
        assert_eq!(sign_extend_6(0b0110_0000), -32);
    }

    #[test]
    fn letters_cover_alphabet() {
        for offset in 0..LETTER_COUNT {
            let expected = char::from(b'a' + offset).to_string();
            assert_eq!(decode(0x80 | offset), Some(expected));
        }
        assert_eq!(decode(0x80).as_deref(), Some("a"));
        assert_eq!(decode(0x99).as_deref(), Some("z"));
    }

    #[test]
    fn letters_past_z_produce_nothing() {
        for offset in LETTER_COUNT..=DATA_MASK {
            assert_eq!(decode(0x80 | offset), None, "offset {offset}");
        }
    }

    #[test]
    fn reserved_tag_produces_nothing() {
        for byte in 0xC0..=0xFFu8 {
            assert_eq!(decode_byte(byte), None);
        }
    }

    #[test]
    fn decode_is_pure() {
        for byte in 0..=u8::MAX {
            assert_eq!(decode(byte), decode(byte));
        }
    }

    #[test]
    fn reference_sequence() {
        let out: Vec<Option<String>> = [0x00, 0x7F, 0x82, 0xC0].into_iter().map(decode).collect();
        assert_eq!(
            out,
            vec![
                Some("0".to_string()),
                Some("-1".to_string()),
                Some("c".to_string()),
                None
            ]
        );
    }

    #[test]
    fn encoded_byte_accessors() {
        let byte = EncodedByte::new(0x82);
        assert_eq!(byte.tag(), TypeTag::Letter);
        assert_eq!(byte.data(), 2);
        assert_eq!(byte.raw(), 0x82);
    }

    #[test]
    fn from_parts_rejects_wide_data() {
        let err = EncodedByte::from_parts(TypeTag::Unsigned, 64).unwrap_err();
        assert_eq!(err, CodecError::DataOutOfRange { value: 64, max: 63 });
        assert_eq!(
            EncodedByte::from_parts(TypeTag::Reserved, 0).unwrap().raw(),
            0xC0
        );
    }

    #[test]
    fn encode_produces_decodable_bytes() {
        assert_eq!(encode(Decoded::Unsigned(63)).unwrap(), 0x3F);
        assert_eq!(encode(Decoded::Signed(-1)).unwrap(), 0x7F);
        assert_eq!(encode(Decoded::Signed(31)).unwrap(), 0x5F);
        assert_eq!(encode(Decoded::Letter('c')).unwrap(), 0x82);
        assert_eq!(decode_byte(0x7F), Some(Decoded::Signed(-1)));
    }

    #[test]
    fn encode_rejects_out_of_range_values() {
        assert!(matches!(
            encode(Decoded::Unsigned(64)),
            Err(CodecError::DataOutOfRange { .. })
        ));
        assert_eq!(
            encode(Decoded::Signed(32)),
            Err(CodecError::SignedOutOfRange(32))
        );
        assert_eq!(
            encode(Decoded::Signed(-33)),
            Err(CodecError::SignedOutOfRange(-33))
        );
        assert_eq!(
            encode(Decoded::Letter('A')),
            Err(CodecError::LetterOutOfRange('A'))
        );
    }

    #[test]
    fn parse_value_tokens() {
        assert_eq!("u:5".parse::<Decoded>().unwrap(), Decoded::Unsigned(5));
        assert_eq!("s:-3".parse::<Decoded>().unwrap(), Decoded::Signed(-3));
        assert_eq!("l:q".parse::<Decoded>().unwrap(), Decoded::Letter('q'));
    }

    #[test]
    fn parse_rejects_bad_tokens() {
        assert!(matches!(
            "x:1".parse::<Decoded>(),
            Err(CodecError::InvalidToken { .. })
        ));
        assert!(matches!(
            "l:ab".parse::<Decoded>(),
            Err(CodecError::InvalidToken { .. })
        ));
        assert!(matches!(
            "5".parse::<Decoded>(),
            Err(CodecError::InvalidToken { .. })
        ));
        assert_eq!(
            "s:40".parse::<Decoded>(),
            Err(CodecError::SignedOutOfRange(40))
        );
    }

    #[test]
    fn decode_all_preserves_order() {
        let decoded: Vec<_> = decode_all(&[0x01, 0xC5, 0x81]).collect();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].1, Some(Decoded::Unsigned(1)));
        assert_eq!(decoded[1].0.tag(), TypeTag::Reserved);
        assert_eq!(decoded[1].1, None);
        assert_eq!(decoded[2].1, Some(Decoded::Letter('b')));
    }
}
