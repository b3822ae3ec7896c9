//! Decoding of JSON string escapes.
//!
//! The tokenizer hands string bodies over raw, escapes included, so that the
//! size ceiling applies to the bytes actually read from the wire. [`unescape`]
//! turns such a raw body into the string it denotes.
//!
//! # Errors
//!
//! - An unknown escape character, or a `\u` followed by anything other than
//!   four hexadecimal digits, yields [`DecodeError::InvalidEscape`].
//! - A `\u` escape naming half of a surrogate pair without its other half
//!   yields [`DecodeError::LoneSurrogate`].
//! - Bytes that are not UTF-8 yield [`DecodeError::Utf8`].

use crate::error::DecodeError;

/// Buffer for accumulating the four hexadecimal digits of a `\u` escape and
/// decoding them into a UTF-16 code unit.
#[derive(Debug)]
pub(crate) struct UnicodeEscapeBuffer {
    value: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self { value: 0, len: 0 }
    }

    /// Feeds one byte of the escape.
    ///
    /// - Returns `Ok(None)` while fewer than four digits have been seen.
    /// - Returns `Ok(Some(unit))` on the fourth digit and resets the buffer.
    /// - Returns `Err` if `b` is not an ASCII hex digit.
    pub(crate) fn feed(&mut self, b: u8) -> Result<Option<u16>, DecodeError> {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return Err(DecodeError::InvalidEscape(b as char)),
        };
        self.value = (self.value << 4) | u16::from(digit);
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }
        let unit = self.value;
        *self = Self::new();
        Ok(Some(unit))
    }
}

/// Decodes a raw JSON string body (the bytes between the quotes).
pub(crate) fn unescape(raw: Vec<u8>) -> Result<String, DecodeError> {
    if !raw.contains(&b'\\') {
        return Ok(String::from_utf8(raw)?);
    }

    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        let escaped = bytes.next().ok_or(DecodeError::InvalidEscape('\\'))?;
        let ch = match escaped {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => decode_unicode(&mut bytes)?,
            other => return Err(DecodeError::InvalidEscape(other as char)),
        };
        let mut tmp = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
    }
    Ok(String::from_utf8(out)?)
}

/// Reads the digits after a `\u`, and the second escape of a surrogate pair
/// when the first names a high surrogate.
fn decode_unicode(bytes: &mut impl Iterator<Item = u8>) -> Result<char, DecodeError> {
    let high = read_unit(bytes)?;
    let code = match high {
        0xD800..=0xDBFF => {
            if bytes.next() != Some(b'\\') || bytes.next() != Some(b'u') {
                return Err(DecodeError::LoneSurrogate(u32::from(high)));
            }
            let low = read_unit(bytes)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(DecodeError::LoneSurrogate(u32::from(high)));
            }
            0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
        }
        0xDC00..=0xDFFF => return Err(DecodeError::LoneSurrogate(u32::from(high))),
        _ => u32::from(high),
    };
    char::from_u32(code).ok_or(DecodeError::LoneSurrogate(code))
}

fn read_unit(bytes: &mut impl Iterator<Item = u8>) -> Result<u16, DecodeError> {
    let mut buf = UnicodeEscapeBuffer::new();
    loop {
        let b = bytes.next().ok_or(DecodeError::InvalidEscape('u'))?;
        if let Some(unit) = buf.feed(b)? {
            return Ok(unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Result<String, DecodeError> {
        unescape(raw.as_bytes().to_vec())
    }

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'4').unwrap(), None);
        assert_eq!(buf.feed(b'1').unwrap(), Some(0x41));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        for b in *b"AbC" {
            assert!(buf.feed(b).unwrap().is_none());
        }
        assert_eq!(buf.feed(b'd').unwrap(), Some(0xABCD));
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'G'), Err(DecodeError::InvalidEscape('G')));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode("héllo").unwrap(), "héllo");
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(
            decode(r#"a\"b\\c\/d\b\f\n\r\t"#).unwrap(),
            "a\"b\\c/d\u{8}\u{c}\n\r\t"
        );
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(decode(r"\u0041\u00e9").unwrap(), "Aé");
        assert_eq!(decode(r"\ud83d\uDE00").unwrap(), "\u{1F600}");
    }

    #[test]
    fn lone_surrogates_are_rejected() {
        assert_eq!(decode(r"\uD83D"), Err(DecodeError::LoneSurrogate(0xD83D)));
        assert_eq!(
            decode(r"\uD83Dx\uDE00"),
            Err(DecodeError::LoneSurrogate(0xD83D))
        );
        assert_eq!(decode(r"\uDE00"), Err(DecodeError::LoneSurrogate(0xDE00)));
        assert_eq!(
            decode(r"\uD83DA"),
            Err(DecodeError::LoneSurrogate(0xD83D))
        );
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(matches!(
            unescape(vec![b'a', 0xff]),
            Err(DecodeError::Utf8(_))
        ));
        assert!(matches!(
            unescape(vec![b'\\', b'n', 0xff]),
            Err(DecodeError::Utf8(_))
        ));
    }

    #[test]
    fn truncated_escapes() {
        assert_eq!(decode("\\"), Err(DecodeError::InvalidEscape('\\')));
        assert_eq!(decode(r"\u00"), Err(DecodeError::InvalidEscape('u')));
        assert_eq!(decode(r"\q"), Err(DecodeError::InvalidEscape('q')));
    }
}
