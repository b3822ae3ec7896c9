//! Pull-style DAG-JSON reader.
//!
//! [`Reader`] wraps a [`TokenSource`] with a single pending token. Peeks fill
//! the slot, reads drain it, and a second peek returns the cached token. Every
//! variable-length scalar is pulled through a [`BoundedSink`] sized by the
//! caller, so no accessor buffers more than its ceiling.

use std::{io::BufRead, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};
use cid::Cid;
use num_bigint::BigInt;

use crate::{
    BoundedSink, Error, JsonType, Limits, Token, TokenSource, Tokenizer,
    error::{DecodeError, LimitExceeded, SyntaxError},
    escape_buffer::unescape,
};

/// Longest decimal text of an `i64` or `u64`.
const MAX_INT64_LEN: usize = 20;
/// Longest decimal text of a `u8`.
const MAX_UINT8_LEN: usize = 3;

/// Reads DAG-JSON values token by token.
///
/// # Examples
///
/// ```rust
/// use dagjson::{JsonType, Reader};
///
/// let mut r = Reader::from_reader(&br#"{"n":42}"#[..]);
/// r.read_object_open()?;
/// assert_eq!(r.read_string(8)?, "n");
/// r.read_object_colon()?;
/// assert_eq!(r.peek_type()?, JsonType::Number);
/// assert_eq!(r.read_number_as_i64()?, 42);
/// assert!(r.read_object_close_or_comma()?);
/// # Ok::<(), dagjson::Error>(())
/// ```
#[derive(Debug)]
pub struct Reader<T> {
    tokens: T,
    peeked: Option<Token>,
    limits: Limits,
    depth: usize,
}

impl<R: BufRead> Reader<Tokenizer<R>> {
    /// A reader over a byte stream, with default [`Limits`].
    pub fn from_reader(inner: R) -> Self {
        Self::new(Tokenizer::new(inner))
    }

    pub fn from_reader_with_limits(inner: R, limits: Limits) -> Self {
        Self::with_limits(Tokenizer::new(inner), limits)
    }
}

impl<T: TokenSource> Reader<T> {
    pub fn new(tokens: T) -> Self {
        Self::with_limits(tokens, Limits::default())
    }

    pub fn with_limits(tokens: T, limits: Limits) -> Self {
        Self {
            tokens,
            peeked: None,
            limits,
            depth: 0,
        }
    }

    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn get_ref(&self) -> &T {
        &self.tokens
    }

    /// Returns the token source. A token that was peeked but not read is
    /// lost.
    pub fn into_inner(self) -> T {
        self.tokens
    }

    fn token(&mut self) -> Result<Token, Error> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.tokens.next_token(),
        }
    }

    fn peek_token(&mut self) -> Result<Token, Error> {
        if let Some(tok) = self.peeked {
            return Ok(tok);
        }
        let tok = self.tokens.next_token()?;
        self.peeked = Some(tok);
        Ok(tok)
    }

    fn expect(&mut self, want: Token, expected: &'static str) -> Result<(), Error> {
        match self.token()? {
            tok if tok == want => Ok(()),
            tok => Err(Error::unexpected(expected, tok)),
        }
    }

    /// Pulls the raw body of the string token just consumed, bounded to
    /// `max_len` bytes.
    fn string_body(&mut self, max_len: usize) -> Result<String, Error> {
        let mut raw = Vec::new();
        self.tokens
            .read_string(&mut BoundedSink::new(&mut raw, max_len))?;
        Ok(unescape(raw)?)
    }

    fn number_body(&mut self, max_len: usize) -> Result<String, Error> {
        let mut raw = Vec::new();
        self.tokens
            .read_number(&mut BoundedSink::new(&mut raw, max_len))?;
        // The tokenizer only lets ASCII digits, signs, '.', 'e' and 'E'
        // through, but a foreign token source might not.
        Ok(String::from_utf8(raw).map_err(DecodeError::from)?)
    }

    /// Consumes a number token (or `null` when `nullable`) and returns its
    /// text.
    fn number_or_null(&mut self, max_len: usize, nullable: bool) -> Result<Option<String>, Error> {
        match self.token()? {
            Token::Number => Ok(Some(self.number_body(max_len)?)),
            Token::Null if nullable => Ok(None),
            tok => Err(Error::unexpected("number", tok)),
        }
    }

    /// Returns the type of the next value without consuming it.
    ///
    /// # Errors
    ///
    /// Fails with a structural error if the next token cannot start a value.
    pub fn peek_type(&mut self) -> Result<JsonType, Error> {
        let tok = self.peek_token()?;
        JsonType::of(tok).ok_or(Error::unexpected("start of value", tok))
    }

    /// Returns `true` if the next token is `null`, without consuming it.
    pub fn peek_null(&mut self) -> Result<bool, Error> {
        Ok(self.peek_token()? == Token::Null)
    }

    pub fn read_null(&mut self) -> Result<(), Error> {
        self.expect(Token::Null, "null")
    }

    pub fn read_object_open(&mut self) -> Result<(), Error> {
        self.expect(Token::ObjectOpen, "object open")
    }

    pub fn read_object_close(&mut self) -> Result<(), Error> {
        self.expect(Token::ObjectClose, "object close")
    }

    pub fn read_object_colon(&mut self) -> Result<(), Error> {
        self.expect(Token::Colon, "object colon")
    }

    /// Returns `true` if the next token is `}`, without consuming it.
    pub fn peek_object_close(&mut self) -> Result<bool, Error> {
        Ok(self.peek_token()? == Token::ObjectClose)
    }

    /// Consumes `}` or `,`; returns `true` for `}`.
    pub fn read_object_close_or_comma(&mut self) -> Result<bool, Error> {
        match self.token()? {
            Token::ObjectClose => Ok(true),
            Token::Comma => Ok(false),
            tok => Err(Error::unexpected("object close or comma", tok)),
        }
    }

    pub fn read_array_open(&mut self) -> Result<(), Error> {
        self.expect(Token::ArrayOpen, "array open")
    }

    /// Consumes `[` or `null`; returns `false` for `null`.
    pub fn read_array_open_or_null(&mut self) -> Result<bool, Error> {
        match self.token()? {
            Token::ArrayOpen => Ok(true),
            Token::Null => Ok(false),
            tok => Err(Error::unexpected("array open", tok)),
        }
    }

    pub fn read_array_close(&mut self) -> Result<(), Error> {
        self.expect(Token::ArrayClose, "array close")
    }

    /// Returns `true` if the next token is `]`, without consuming it.
    pub fn peek_array_close(&mut self) -> Result<bool, Error> {
        Ok(self.peek_token()? == Token::ArrayClose)
    }

    /// Consumes `]` or `,`; returns `true` for `]`.
    pub fn read_array_close_or_comma(&mut self) -> Result<bool, Error> {
        match self.token()? {
            Token::ArrayClose => Ok(true),
            Token::Comma => Ok(false),
            tok => Err(Error::unexpected("array close or comma", tok)),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.read_bool_or_null()?
            .ok_or(Error::unexpected("boolean", Token::Null))
    }

    pub fn read_bool_or_null(&mut self) -> Result<Option<bool>, Error> {
        match self.token()? {
            Token::True => Ok(Some(true)),
            Token::False => Ok(Some(false)),
            Token::Null => Ok(None),
            tok => Err(Error::unexpected("boolean", tok)),
        }
    }

    /// Reads a string whose raw (escaped) form is at most `max_len` bytes.
    ///
    /// # Errors
    ///
    /// Size-limit error past `max_len`, decode error for invalid escapes or
    /// UTF-8, structural error for any other token, including `null`.
    pub fn read_string(&mut self, max_len: usize) -> Result<String, Error> {
        self.read_string_or_null(max_len)?
            .ok_or(Error::unexpected("string", Token::Null))
    }

    pub fn read_string_or_null(&mut self, max_len: usize) -> Result<Option<String>, Error> {
        match self.token()? {
            Token::String => Ok(Some(self.string_body(max_len)?)),
            Token::Null => Ok(None),
            tok => Err(Error::unexpected("string", tok)),
        }
    }

    /// Returns the text of a number token unchanged, bounded to `max_len`
    /// bytes.
    pub fn read_number_as_string(&mut self, max_len: usize) -> Result<String, Error> {
        Ok(self
            .number_or_null(max_len, false)?
            .unwrap_or_default())
    }

    pub fn read_number_as_u8(&mut self) -> Result<u8, Error> {
        parse(&self.read_number_as_string(MAX_UINT8_LEN)?)
    }

    pub fn read_number_as_i64(&mut self) -> Result<i64, Error> {
        self.read_number_as_i64_or_null()?
            .ok_or(Error::unexpected("number", Token::Null))
    }

    pub fn read_number_as_i64_or_null(&mut self) -> Result<Option<i64>, Error> {
        self.number_or_null(MAX_INT64_LEN, true)?
            .map(|text| parse::<i64>(&text))
            .transpose()
    }

    pub fn read_number_as_u64(&mut self) -> Result<u64, Error> {
        self.read_number_as_u64_or_null()?
            .ok_or(Error::unexpected("number", Token::Null))
    }

    pub fn read_number_as_u64_or_null(&mut self) -> Result<Option<u64>, Error> {
        self.number_or_null(MAX_INT64_LEN, true)?
            .map(|text| parse::<u64>(&text))
            .transpose()
    }

    /// Reads an integer of arbitrary size whose text is at most `max_len`
    /// bytes.
    pub fn read_number_as_big_int(&mut self, max_len: usize) -> Result<BigInt, Error> {
        parse(&self.read_number_as_string(max_len)?)
    }

    /// Reads a key that must be `expected`, and its colon.
    ///
    /// The key is bounded by [`Limits::max_string_len`] like any other key,
    /// so a wrong key is reported as such whatever its length.
    fn read_expected_key(&mut self, expected: &'static str) -> Result<(), Error> {
        let key = self.read_string(self.limits.max_string_len)?;
        if key != expected {
            return Err(Error::UnexpectedKey {
                expected,
                found: key.into(),
            });
        }
        self.read_object_colon()
    }

    /// Reads `{"bytes":"<base64>"}`, the value of a bytes sentinel.
    fn read_bytes_object(&mut self, max_len: usize) -> Result<Vec<u8>, Error> {
        self.read_object_open()?;
        self.read_expected_key("bytes")?;
        let encoded = self.read_string(base64_len(max_len))?;
        let decoded = STANDARD_NO_PAD
            .decode(encoded)
            .map_err(DecodeError::from)?;
        if decoded.len() > max_len {
            return Err(LimitExceeded {
                requested: decoded.len(),
                remaining: max_len,
                limit: max_len,
            }
            .into());
        }
        self.read_object_close()?;
        Ok(decoded)
    }

    /// Reads the CID string of a link sentinel.
    fn read_link_text(&mut self) -> Result<Cid, Error> {
        let text = self.read_string(self.limits.max_link_len)?;
        Ok(Cid::try_from(text.as_str()).map_err(DecodeError::from)?)
    }

    /// Reads a bytes sentinel `{"/":{"bytes":"..."}}` decoding to at most
    /// `max_len` bytes.
    pub fn read_bytes(&mut self, max_len: usize) -> Result<Vec<u8>, Error> {
        self.read_bytes_or_null(max_len)?
            .ok_or(Error::unexpected("bytes", Token::Null))
    }

    pub fn read_bytes_or_null(&mut self, max_len: usize) -> Result<Option<Vec<u8>>, Error> {
        match self.token()? {
            Token::Null => return Ok(None),
            Token::ObjectOpen => {}
            tok => return Err(Error::unexpected("object open", tok)),
        }
        self.read_expected_key("/")?;
        let bytes = self.read_bytes_object(max_len)?;
        self.read_object_close()?;
        Ok(Some(bytes))
    }

    /// Reads a link sentinel `{"/":"<cid>"}`.
    pub fn read_cid(&mut self) -> Result<Cid, Error> {
        self.read_cid_or_null()?
            .ok_or(Error::unexpected("CID", Token::Null))
    }

    pub fn read_cid_or_null(&mut self) -> Result<Option<Cid>, Error> {
        match self.token()? {
            Token::Null => return Ok(None),
            Token::ObjectOpen => {}
            tok => return Err(Error::unexpected("object open", tok)),
        }
        self.read_expected_key("/")?;
        let cid = self.read_link_text()?;
        self.read_object_close()?;
        Ok(Some(cid))
    }

    fn enter(&mut self) -> Result<(), Error> {
        if let Some(limit) = self.limits.max_depth {
            if self.depth >= limit {
                return Err(Error::DepthExceeded { limit });
            }
        }
        self.depth += 1;
        Ok(())
    }

    /// Reads a whole object, calling `entry` once per key with the reader
    /// positioned at that key's value. `entry` must consume exactly one
    /// value. The `usize` is the entry's position in the object.
    ///
    /// Keys are bounded by [`Limits::max_string_len`].
    pub fn read_object<F>(&mut self, mut entry: F) -> Result<(), Error>
    where
        F: FnMut(&mut Self, usize, String) -> Result<(), Error>,
    {
        self.read_object_open()?;
        self.enter()?;
        let mut index = 0;
        if self.peek_object_close()? {
            self.read_object_close()?;
        } else {
            loop {
                let key = self.read_string(self.limits.max_string_len)?;
                self.read_object_colon()?;
                entry(self, index, key)?;
                index += 1;
                if self.read_object_close_or_comma()? {
                    break;
                }
            }
        }
        self.depth -= 1;
        Ok(())
    }

    /// Reads a whole array, calling `element` once per element with the
    /// reader positioned at it. `element` must consume exactly one value.
    ///
    /// Arrays longer than [`Limits::max_array_len`] fail with a size-limit
    /// error.
    pub fn read_array<F>(&mut self, mut element: F) -> Result<(), Error>
    where
        F: FnMut(&mut Self, usize) -> Result<(), Error>,
    {
        self.read_array_open()?;
        self.enter()?;
        let mut index = 0;
        if self.peek_array_close()? {
            self.read_array_close()?;
        } else {
            loop {
                if index >= self.limits.max_array_len {
                    return Err(Error::TooManyElements {
                        limit: self.limits.max_array_len,
                    });
                }
                element(self, index)?;
                index += 1;
                if self.read_array_close_or_comma()? {
                    break;
                }
            }
        }
        self.depth -= 1;
        Ok(())
    }

    /// Consumes and drops the next value, whatever its shape.
    pub fn discard_type(&mut self) -> Result<(), Error> {
        match self.peek_type()? {
            JsonType::Object => self.read_object(|r, _, _| r.discard_type()),
            JsonType::Array => self.read_array(|r, _| r.discard_type()),
            JsonType::Number => self
                .read_number_as_string(self.limits.max_number_len)
                .map(drop),
            JsonType::String => self.read_string(self.limits.max_string_len).map(drop),
            JsonType::Boolean => self.read_bool().map(drop),
            JsonType::Null => self.read_null(),
        }
    }

    /// Reads the value under a `"/"` key: a CID string or a bytes object.
    pub(crate) fn read_sentinel_value(&mut self) -> Result<Sentinel, Error> {
        match self.peek_type()? {
            JsonType::String => Ok(Sentinel::Link(self.read_link_text()?)),
            JsonType::Object => Ok(Sentinel::Bytes(
                self.read_bytes_object(self.limits.max_bytes_len)?,
            )),
            _ => Err(Error::InvalidSentinel(
                "\"/\" must map to a CID string or a bytes object",
            )),
        }
    }

    /// Succeeds if the input holds no further tokens.
    ///
    /// # Errors
    ///
    /// Fails with a structural error naming the first trailing token.
    pub fn read_end(&mut self) -> Result<(), Error> {
        let next = match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.tokens.next_token(),
        };
        match next {
            Ok(tok) => Err(Error::unexpected("end of input", tok)),
            Err(Error::Syntax {
                reason: SyntaxError::UnexpectedEndOfInput,
                ..
            }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// The value of a `"/"` key, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Sentinel {
    Link(Cid),
    Bytes(Vec<u8>),
}

fn parse<N>(text: &str) -> Result<N, Error>
where
    N: FromStr,
    DecodeError: From<N::Err>,
{
    Ok(text.parse::<N>().map_err(DecodeError::from)?)
}

/// Length of the unpadded base64 encoding of `n` bytes.
pub(crate) fn base64_len(n: usize) -> usize {
    n.saturating_mul(8).div_ceil(6)
}
