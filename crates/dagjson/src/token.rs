//! Lexical tokens and the token source capability the reader is built on.

use core::fmt;
use std::io::Write;

use crate::Error;

/// One atomic lexical unit of a JSON document.
///
/// String and number tokens carry no payload. Their raw text is pulled
/// through [`TokenSource::read_string`] or [`TokenSource::read_number`] into
/// a caller-chosen sink, so that the caller decides how many bytes it is
/// willing to buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Colon,
    Comma,
    String,
    Number,
    True,
    False,
    Null,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Token::ObjectOpen => "{",
            Token::ObjectClose => "}",
            Token::ArrayOpen => "[",
            Token::ArrayClose => "]",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::String => "string",
            Token::Number => "number",
            Token::True | Token::False => "boolean",
            Token::Null => "null",
        })
    }
}

/// The JSON type a value starts with, as reported by
/// [`Reader::peek_type`](crate::Reader::peek_type).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Object,
    Array,
    Number,
    String,
    Boolean,
    Null,
}

impl JsonType {
    /// Maps a token to the type of value it opens, or `None` for tokens that
    /// cannot start a value.
    #[must_use]
    pub fn of(token: Token) -> Option<Self> {
        match token {
            Token::ObjectOpen => Some(JsonType::Object),
            Token::ArrayOpen => Some(JsonType::Array),
            Token::Number => Some(JsonType::Number),
            Token::String => Some(JsonType::String),
            Token::True | Token::False => Some(JsonType::Boolean),
            Token::Null => Some(JsonType::Null),
            Token::ObjectClose | Token::ArrayClose | Token::Colon | Token::Comma => None,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Boolean => "boolean",
            JsonType::Null => "null",
        })
    }
}

/// A supplier of JSON tokens.
///
/// After `next_token` returns [`Token::String`] or [`Token::Number`], the
/// body of that token is still unread. `read_string` writes the raw contents
/// of the string (between the quotes, escapes left as-is) to `out`;
/// `read_number` writes the number text. Implementations must stop at the
/// first write error and return it, so a bounded `out` caps how much of the
/// body is ever buffered.
pub trait TokenSource {
    /// Returns the next token.
    ///
    /// # Errors
    ///
    /// Fails on malformed input, end of input, or I/O failure.
    fn next_token(&mut self) -> Result<Token, Error>;

    /// Streams the raw body of the string token just returned into `out`,
    /// returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Fails if no string body is pending, if the body is malformed, or if
    /// `out` rejects a write.
    fn read_string(&mut self, out: &mut dyn Write) -> Result<usize, Error>;

    /// Streams the text of the number token just returned into `out`,
    /// returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Fails if no number body is pending, if the number is malformed, or if
    /// `out` rejects a write.
    fn read_number(&mut self, out: &mut dyn Write) -> Result<usize, Error>;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Result<Token, Error> {
        (**self).next_token()
    }

    fn read_string(&mut self, out: &mut dyn Write) -> Result<usize, Error> {
        (**self).read_string(out)
    }

    fn read_number(&mut self, out: &mut dyn Write) -> Result<usize, Error> {
        (**self).read_number(out)
    }
}
