//! Re-emitting a value in canonical form.
//!
//! [`transcode`] walks one value with a [`Reader`] and writes it back through
//! a [`Writer`]: whitespace dropped, strings re-escaped, number text and key
//! order kept as read. Sentinels pass through as the plain objects they are.

use std::io::Write;

use crate::{BoundedSink, Error, JsonType, Reader, TokenSource, Writer};

/// Copies the next value from `reader` to `writer`.
///
/// Strings and numbers are bounded by the reader's [`Limits`](crate::Limits);
/// arrays and nesting are bounded the same way as
/// [`Reader::discard_type`]. When `writer` sits on a [`BoundedSink`] the
/// output is bounded too, and a rejected write aborts the walk.
///
/// # Errors
///
/// Any error from either side. The writer may hold a prefix of the output.
pub fn transcode<T, W>(reader: &mut Reader<T>, writer: &mut Writer<W>) -> Result<(), Error>
where
    T: TokenSource,
    W: Write,
{
    match reader.peek_type()? {
        JsonType::Object => {
            writer.write_object_open()?;
            reader.read_object(|r, index, key| {
                if index > 0 {
                    writer.write_comma()?;
                }
                writer.write_string(&key)?;
                writer.write_object_colon()?;
                transcode(r, &mut *writer)
            })?;
            writer.write_object_close()
        }
        JsonType::Array => {
            writer.write_array_open()?;
            reader.read_array(|r, index| {
                if index > 0 {
                    writer.write_comma()?;
                }
                transcode(r, &mut *writer)
            })?;
            writer.write_array_close()
        }
        JsonType::Number => {
            let max = reader.limits().max_number_len;
            let text = reader.read_number_as_string(max)?;
            writer.write_raw(text.as_bytes())
        }
        JsonType::String => {
            let max = reader.limits().max_string_len;
            let s = reader.read_string(max)?;
            writer.write_string(&s)
        }
        JsonType::Boolean => {
            let b = reader.read_bool()?;
            writer.write_bool(b)
        }
        JsonType::Null => {
            reader.read_null()?;
            writer.write_null()
        }
    }
}

/// Transcodes the next value into a fresh buffer of at most `max_len` bytes.
///
/// # Errors
///
/// Fails with a size-limit error once the canonical output would pass
/// `max_len`, and with any error [`transcode`] reports.
///
/// # Examples
///
/// ```rust
/// use dagjson::{Reader, capture};
///
/// let mut r = Reader::from_reader(&b"{ \"a\" : [ 1 , true ] }"[..]);
/// assert_eq!(capture(&mut r, 64)?, br#"{"a":[1,true]}"#);
/// # Ok::<(), dagjson::Error>(())
/// ```
pub fn capture<T: TokenSource>(reader: &mut Reader<T>, max_len: usize) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::new(BoundedSink::new(Vec::new(), max_len));
    transcode(reader, &mut writer)?;
    let buf = writer.into_inner().into_inner();
    tracing::trace!(len = buf.len(), max_len, "captured value");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{ErrorKind, Limits};

    fn capture_str(src: &str, max_len: usize) -> Result<String, Error> {
        let buf = capture(&mut Reader::from_reader(src.as_bytes()), max_len)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn canonicalizes_whitespace() {
        let src = " { \"a\" : 1 , \"b\" : [ true , null ] } ";
        assert_eq!(capture_str(src, 100).unwrap(), r#"{"a":1,"b":[true,null]}"#);
    }

    #[test]
    fn fails_once_output_passes_ceiling() {
        let err = capture_str(r#"{"a":1,"b":[true,null]}"#, 5).unwrap_err();
        assert!(err.is_size_limit(), "{err}");
    }

    #[test]
    fn ceiling_is_exact() {
        let canonical = r#"{"a":1,"b":[true,null]}"#;
        assert_eq!(capture_str(canonical, canonical.len()).unwrap(), canonical);
        assert!(
            capture_str(canonical, canonical.len() - 1)
                .unwrap_err()
                .is_size_limit()
        );
    }

    #[rstest]
    #[case(r#""tab\there""#, r#""tab\there""#)]
    #[case(r#""A\/""#, r#""A/""#)]
    #[case(r#""q\"""#, r#""q\"""#)]
    #[case("1.50e+10", "1.50e+10")]
    #[case("-0", "-0")]
    #[case("false", "false")]
    #[case("[]", "[]")]
    #[case("{}", "{}")]
    #[case(r#"{"/":"bafkqaaa"}"#, r#"{"/":"bafkqaaa"}"#)]
    #[case(r#"{ "/" : { "bytes" : "AA" } }"#, r#"{"/":{"bytes":"AA"}}"#)]
    fn scalars_and_sentinels(#[case] src: &str, #[case] want: &str) {
        assert_eq!(capture_str(src, 64).unwrap(), want);
    }

    #[test]
    fn keys_are_escaped_on_output() {
        assert_eq!(
            capture_str(r#"{"a\"b":1}"#, 64).unwrap(),
            r#"{"a\"b":1}"#
        );
    }

    #[test]
    fn idempotent() {
        let src = r#" [ {"k" : "v\n", "n":[1, 2.5, -3e2]}, "é", {} ] "#;
        let once = capture_str(src, 256).unwrap();
        let twice = capture_str(&once, 256).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_input_is_reported() {
        assert_eq!(
            capture_str("[1,]", 64).unwrap_err().kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            capture_str(r#"{"a" 1}"#, 64).unwrap_err().kind(),
            ErrorKind::Structural
        );
        assert_eq!(capture_str("[1", 64).unwrap_err().kind(), ErrorKind::Syntax);
    }

    #[test]
    fn reader_limits_apply() {
        let limits = Limits {
            max_string_len: 3,
            ..Limits::default()
        };
        let mut r = Reader::from_reader_with_limits(&br#"["abcd"]"#[..], limits);
        assert!(capture(&mut r, 64).unwrap_err().is_size_limit());
    }

    #[test]
    fn leaves_following_tokens_in_place() {
        let mut r = Reader::from_reader(&br#"[{"a":1},2]"#[..]);
        r.read_array_open().unwrap();
        assert_eq!(capture(&mut r, 64).unwrap(), br#"{"a":1}"#);
        assert!(!r.read_array_close_or_comma().unwrap());
        assert_eq!(r.read_number_as_u64().unwrap(), 2);
    }
}
