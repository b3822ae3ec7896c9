//! Tokenizer: turns a buffered byte stream into JSON tokens.
//!
//! Punctuation and the `true`/`false`/`null` literals are consumed as soon as
//! they are returned. String and number tokens are returned as soon as their
//! first byte is seen; their bodies stay in the stream until the caller pulls
//! them through [`TokenSource::read_string`] / [`TokenSource::read_number`].
//! Bodies are validated while they stream and are never buffered here, so the
//! caller's sink is the only place a body can accumulate.
//!
//! Invariants
//! - At most one body is pending. Asking for the next token while a body is
//!   pending skips that body.
//! - `offset` counts bytes consumed from the start of the stream and is what
//!   syntax errors report.

use std::io::{self, BufRead, Write};

use crate::{
    Error, Token, TokenSource,
    error::{SyntaxError, UsageError},
    literal_buffer::{ExpectedLiteralBuffer, Step},
};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    String,
    Number,
}

/// Where a string body is within an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EscapeState {
    None,
    Backslash,
    /// Hex digits still expected after `\u`.
    Unicode(u8),
}

/// JSON number grammar, one state per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Start,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

impl NumberState {
    /// Advances on `b`. `Ok(None)` means `b` is not part of the number and the
    /// number ended before it.
    fn step(self, b: u8) -> Result<Option<Self>, SyntaxError> {
        use NumberState::*;

        let next = match (self, b) {
            (Start, b'-') => Sign,
            (Start | Sign, b'0') => Zero,
            (Start | Sign, b'1'..=b'9') => DecimalInteger,
            (Start, _) => return Err(SyntaxError::InvalidByte(b)),
            (Sign, _) => return Err(SyntaxError::InvalidNumber("expected digit after '-'")),
            (Zero, b'0'..=b'9') => return Err(SyntaxError::InvalidNumber("leading zero")),
            (Zero | DecimalInteger, b'.') => DecimalPoint,
            (DecimalInteger, b'0'..=b'9') => DecimalInteger,
            (Zero | DecimalInteger | DecimalFraction, b'e' | b'E') => DecimalExponent,
            (DecimalPoint | DecimalFraction, b'0'..=b'9') => DecimalFraction,
            (DecimalPoint, _) => {
                return Err(SyntaxError::InvalidNumber("expected digit after '.'"));
            }
            (DecimalExponent, b'+' | b'-') => DecimalExponentSign,
            (DecimalExponent | DecimalExponentSign | DecimalExponentInteger, b'0'..=b'9') => {
                DecimalExponentInteger
            }
            (DecimalExponent | DecimalExponentSign, _) => {
                return Err(SyntaxError::InvalidNumber("expected digit in exponent"));
            }
            (Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger, _) => {
                return Ok(None);
            }
        };
        Ok(Some(next))
    }

    fn is_terminal(self) -> bool {
        matches!(
            self,
            NumberState::Zero
                | NumberState::DecimalInteger
                | NumberState::DecimalFraction
                | NumberState::DecimalExponentInteger
        )
    }
}

/// A streaming [`TokenSource`] over any [`BufRead`].
///
/// Insignificant whitespace between tokens is skipped on input.
///
/// ```rust
/// use dagjson::{Token, TokenSource, Tokenizer};
///
/// let mut tokens = Tokenizer::new(&b"[true, 12]"[..]);
/// assert_eq!(tokens.next_token().unwrap(), Token::ArrayOpen);
/// assert_eq!(tokens.next_token().unwrap(), Token::True);
/// assert_eq!(tokens.next_token().unwrap(), Token::Comma);
/// assert_eq!(tokens.next_token().unwrap(), Token::Number);
///
/// let mut text = Vec::new();
/// tokens.read_number(&mut text).unwrap();
/// assert_eq!(text, b"12");
/// ```
#[derive(Debug)]
pub struct Tokenizer<R> {
    inner: R,
    offset: u64,
    pending: Option<Body>,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            pending: None,
        }
    }

    /// Bytes consumed from the underlying stream so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns the underlying stream. Any pending body stays unread in it.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn syntax(&self, reason: SyntaxError, at: usize) -> Error {
        Error::Syntax {
            reason,
            offset: self.offset + at as u64,
        }
    }

    fn advance(&mut self, n: usize) {
        self.inner.consume(n);
        self.offset += n as u64;
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, Error> {
        Ok(fill_buf(&mut self.inner)?.first().copied())
    }

    fn skip_whitespace(&mut self) -> Result<(), Error> {
        loop {
            let buf = fill_buf(&mut self.inner)?;
            if buf.is_empty() {
                return Ok(());
            }
            let n = buf
                .iter()
                .take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
                .count();
            let exhausted = n == buf.len();
            self.advance(n);
            if !exhausted {
                return Ok(());
            }
        }
    }

    fn read_literal(&mut self, first: u8) -> Result<Token, Error> {
        let mut literal = ExpectedLiteralBuffer::new(first);
        self.advance(1);
        loop {
            let Some(b) = self.peek_byte()? else {
                return Err(self.syntax(SyntaxError::TruncatedLiteral, 0));
            };
            match literal.step(b) {
                Step::NeedMore => self.advance(1),
                Step::Done(token) => {
                    self.advance(1);
                    return Ok(token);
                }
                Step::Reject => return Err(self.syntax(SyntaxError::InvalidByte(b), 0)),
            }
        }
    }

    fn take_pending(&mut self, want: Body) -> Result<(), Error> {
        if self.pending == Some(want) {
            self.pending = None;
            return Ok(());
        }
        Err(UsageError::NoPendingBody(match want {
            Body::String => "string",
            Body::Number => "number",
        })
        .into())
    }

    /// Streams a string body up to and including the closing quote; the
    /// quote itself is not written.
    fn stream_string(&mut self, out: &mut dyn Write) -> Result<usize, Error> {
        let mut state = EscapeState::None;
        let mut written = 0;
        loop {
            let buf = fill_buf(&mut self.inner)?;
            if buf.is_empty() {
                return Err(self.syntax(SyntaxError::UnexpectedEndOfInput, 0));
            }

            let mut end = None;
            for (i, &b) in buf.iter().enumerate() {
                state = match state {
                    EscapeState::None => match b {
                        b'"' => {
                            end = Some(i);
                            break;
                        }
                        b'\\' => EscapeState::Backslash,
                        0x00..=0x1f => {
                            let reason = SyntaxError::ControlCharacter(b);
                            return Err(self.syntax(reason, i));
                        }
                        _ => EscapeState::None,
                    },
                    EscapeState::Backslash => match b {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                            EscapeState::None
                        }
                        b'u' => EscapeState::Unicode(4),
                        _ => return Err(self.syntax(SyntaxError::InvalidEscape(b), i)),
                    },
                    EscapeState::Unicode(left) if b.is_ascii_hexdigit() => {
                        if left == 1 {
                            EscapeState::None
                        } else {
                            EscapeState::Unicode(left - 1)
                        }
                    }
                    EscapeState::Unicode(_) => {
                        return Err(self.syntax(SyntaxError::InvalidEscape(b), i));
                    }
                };
            }

            let body = end.unwrap_or(buf.len());
            out.write_all(&buf[..body])?;
            written += body;
            match end {
                Some(quote) => {
                    self.advance(quote + 1);
                    return Ok(written);
                }
                None => self.advance(body),
            }
        }
    }

    fn stream_number(&mut self, out: &mut dyn Write) -> Result<usize, Error> {
        let mut state = NumberState::Start;
        let mut written = 0;
        loop {
            let buf = fill_buf(&mut self.inner)?;
            if buf.is_empty() {
                if state.is_terminal() {
                    return Ok(written);
                }
                return Err(self.syntax(SyntaxError::UnexpectedEndOfInput, 0));
            }

            let mut end = None;
            for (i, &b) in buf.iter().enumerate() {
                match state.step(b) {
                    Ok(Some(next)) => state = next,
                    Ok(None) => {
                        end = Some(i);
                        break;
                    }
                    Err(reason) => return Err(self.syntax(reason, i)),
                }
            }

            let len = end.unwrap_or(buf.len());
            out.write_all(&buf[..len])?;
            written += len;
            self.advance(len);
            if end.is_some() {
                return Ok(written);
            }
        }
    }
}

impl<R: BufRead> TokenSource for Tokenizer<R> {
    fn next_token(&mut self) -> Result<Token, Error> {
        match self.pending.take() {
            Some(Body::String) => {
                self.stream_string(&mut io::sink())?;
            }
            Some(Body::Number) => {
                self.stream_number(&mut io::sink())?;
            }
            None => {}
        }

        self.skip_whitespace()?;
        let Some(b) = self.peek_byte()? else {
            return Err(self.syntax(SyntaxError::UnexpectedEndOfInput, 0));
        };
        let punctuator = match b {
            b'{' => Token::ObjectOpen,
            b'}' => Token::ObjectClose,
            b'[' => Token::ArrayOpen,
            b']' => Token::ArrayClose,
            b':' => Token::Colon,
            b',' => Token::Comma,
            b'"' => {
                self.advance(1);
                self.pending = Some(Body::String);
                return Ok(Token::String);
            }
            b'-' | b'0'..=b'9' => {
                self.pending = Some(Body::Number);
                return Ok(Token::Number);
            }
            b't' | b'f' | b'n' => return self.read_literal(b),
            _ => return Err(self.syntax(SyntaxError::InvalidByte(b), 0)),
        };
        self.advance(1);
        Ok(punctuator)
    }

    fn read_string(&mut self, out: &mut dyn Write) -> Result<usize, Error> {
        self.take_pending(Body::String)?;
        self.stream_string(out)
    }

    fn read_number(&mut self, out: &mut dyn Write) -> Result<usize, Error> {
        self.take_pending(Body::Number)?;
        self.stream_number(out)
    }
}

/// `BufRead::fill_buf`, retried on `Interrupted`.
fn fill_buf<R: BufRead>(r: &mut R) -> io::Result<&[u8]> {
    loop {
        match r.fill_buf() {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    r.fill_buf()
}
