//! Push-style DAG-JSON writer.
//!
//! Each method writes exactly the canonical bytes of one construct, without
//! whitespace, in a single `write_all` call, so a [`BoundedSink`] underneath
//! either accepts a whole construct or none of it.

use std::io::Write;

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};
use cid::Cid;
use num_bigint::BigInt;

use crate::{BoundedSink, Error, error::DecodeError};

/// Writes DAG-JSON tokens onto a byte sink.
///
/// The writer does not track grammar state: callers (generated codecs, the
/// transcoder, the [`MarshalDagJson`](crate::MarshalDagJson) impls) are
/// responsible for emitting punctuation in a valid order.
///
/// ```rust
/// use dagjson::Writer;
///
/// let mut w = Writer::new(Vec::new());
/// w.write_array_open()?;
/// w.write_u64(1)?;
/// w.write_comma()?;
/// w.write_bytes(&[0])?;
/// w.write_array_close()?;
/// assert_eq!(w.into_inner(), br#"[1,{"/":{"bytes":"AA"}}]"#);
/// # Ok::<(), dagjson::Error>(())
/// ```
#[derive(Debug)]
pub struct Writer<W> {
    out: W,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes pre-encoded bytes verbatim.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    pub fn write_raw(&mut self, raw: &[u8]) -> Result<(), Error> {
        self.out.write_all(raw)?;
        Ok(())
    }

    pub fn write_object_open(&mut self) -> Result<(), Error> {
        self.write_raw(b"{")
    }

    pub fn write_object_close(&mut self) -> Result<(), Error> {
        self.write_raw(b"}")
    }

    pub fn write_object_colon(&mut self) -> Result<(), Error> {
        self.write_raw(b":")
    }

    pub fn write_array_open(&mut self) -> Result<(), Error> {
        self.write_raw(b"[")
    }

    pub fn write_array_close(&mut self) -> Result<(), Error> {
        self.write_raw(b"]")
    }

    pub fn write_comma(&mut self) -> Result<(), Error> {
        self.write_raw(b",")
    }

    pub fn write_null(&mut self) -> Result<(), Error> {
        self.write_raw(b"null")
    }

    pub fn write_bool(&mut self, b: bool) -> Result<(), Error> {
        self.write_raw(if b { b"true" } else { b"false" })
    }

    pub fn write_i64(&mut self, n: i64) -> Result<(), Error> {
        self.write_raw(n.to_string().as_bytes())
    }

    pub fn write_u64(&mut self, n: u64) -> Result<(), Error> {
        self.write_raw(n.to_string().as_bytes())
    }

    pub fn write_u8(&mut self, n: u8) -> Result<(), Error> {
        self.write_raw(n.to_string().as_bytes())
    }

    pub fn write_big_int(&mut self, n: &BigInt) -> Result<(), Error> {
        self.write_raw(n.to_str_radix(10).as_bytes())
    }

    /// Writes a float in plain decimal notation.
    ///
    /// The text is the shortest one that parses back to `f` and never uses an
    /// exponent; integral values get a trailing `.0` so that they read back
    /// as floats.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::NonFiniteFloat`] for NaN and infinities,
    /// which DAG-JSON cannot represent.
    pub fn write_f64(&mut self, f: f64) -> Result<(), Error> {
        if !f.is_finite() {
            return Err(DecodeError::NonFiniteFloat(f).into());
        }
        let mut text = f.to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        self.write_raw(text.as_bytes())
    }

    pub fn write_string(&mut self, s: &str) -> Result<(), Error> {
        let mut quoted = String::with_capacity(s.len() + 2);
        quoted.push('"');
        write_escaped_string(s, &mut quoted);
        quoted.push('"');
        self.write_raw(quoted.as_bytes())
    }

    /// Writes `{"/":{"bytes":"<unpadded base64>"}}`.
    pub fn write_bytes(&mut self, b: &[u8]) -> Result<(), Error> {
        let mut text = String::with_capacity(b.len() * 4 / 3 + 20);
        text.push_str(r#"{"/":{"bytes":""#);
        STANDARD_NO_PAD.encode_string(b, &mut text);
        text.push_str(r#""}}"#);
        self.write_raw(text.as_bytes())
    }

    /// Writes `{"/":"<cid>"}`.
    pub fn write_cid(&mut self, c: &Cid) -> Result<(), Error> {
        self.write_raw(format!(r#"{{"/":"{c}"}}"#).as_bytes())
    }
}

impl<W: Write> Writer<BoundedSink<W>> {
    /// A writer that fails with a size-limit error instead of writing more
    /// than `limit` bytes to `out`.
    pub fn bounded(out: W, limit: usize) -> Self {
        Self::new(BoundedSink::new(out, limit))
    }
}

/// Appends `src` to `out` with JSON string escaping.
///
/// Quotes, backslashes and control characters below U+0020 are escaped;
/// everything else, including non-ASCII text, is copied as-is.
pub(crate) fn write_escaped_string(src: &str, out: &mut String) {
    let mut start = 0;
    for (i, b) in src.bytes().enumerate() {
        let escape = match b {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x08 => "\\b",
            0x0c => "\\f",
            0x00..=0x1f => "",
            _ => continue,
        };
        out.push_str(&src[start..i]);
        if escape.is_empty() {
            out.push_str(&format!("\\u{b:04x}"));
        } else {
            out.push_str(escape);
        }
        start = i + 1;
    }
    out.push_str(&src[start..]);
}
