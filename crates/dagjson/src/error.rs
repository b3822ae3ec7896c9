use std::{
    fmt, io,
    num::{ParseFloatError, ParseIntError},
    string::FromUtf8Error,
};

use bstr::BString;
use thiserror::Error;

use crate::token::Token;

/// Broad category of an [`Error`].
///
/// Callers use this to tell malformed input apart from input that is merely
/// too large, and both apart from programming defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The next token does not fit the grammar position.
    Structural,
    /// A bounded read or write would exceed its ceiling.
    SizeLimit,
    /// A well-formed token does not hold a valid instance of the target type.
    Decode,
    /// The API was used in a way that breaks one of its invariants.
    Usage,
    /// The byte stream is not lexically valid JSON.
    Syntax,
    /// The underlying stream failed.
    Io,
}

/// Errors produced while reading or writing DAG-JSON.
#[derive(Error, Debug)]
pub enum Error {
    #[error("expected {expected} but read {found}")]
    Unexpected {
        expected: &'static str,
        found: Token,
    },
    #[error("expected key {expected:?} but read {found:?}")]
    UnexpectedKey {
        expected: &'static str,
        found: BString,
    },
    #[error("invalid sentinel: {0}")]
    InvalidSentinel(&'static str),
    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),
    #[error("array longer than the maximum of {limit} elements")]
    TooManyElements { limit: usize },
    #[error("nesting deeper than the maximum of {limit} levels")]
    DepthExceeded { limit: usize },
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),
    #[error("syntax error: {reason} at byte {offset}")]
    Syntax { reason: SyntaxError, offset: u64 },
    #[error("i/o error: {0}")]
    Io(io::Error),
}

impl Error {
    /// Returns the category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unexpected { .. } | Error::UnexpectedKey { .. } | Error::InvalidSentinel(_) => {
                ErrorKind::Structural
            }
            Error::LimitExceeded(_)
            | Error::TooManyElements { .. }
            | Error::DepthExceeded { .. } => ErrorKind::SizeLimit,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Usage(_) => ErrorKind::Usage,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::SizeLimit`.
    #[must_use]
    pub fn is_size_limit(&self) -> bool {
        self.kind() == ErrorKind::SizeLimit
    }

    pub(crate) fn unexpected(expected: &'static str, found: Token) -> Self {
        Error::Unexpected { expected, found }
    }
}

// A `BoundedSink` can only report through `io::Error`; unwrap its payload so
// size-limit failures keep their own kind after crossing an `io::Write` call.
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<LimitExceeded>())
        {
            Some(limit) => Error::LimitExceeded(*limit),
            None => Error::Io(err),
        }
    }
}

/// A write was rejected by a [`BoundedSink`](crate::BoundedSink).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("length beyond maximum allowed: {requested} bytes with {remaining} of {limit} remaining")]
pub struct LimitExceeded {
    /// Size of the rejected write.
    pub requested: usize,
    /// Budget left when the write was attempted.
    pub remaining: usize,
    /// Budget the sink was constructed with.
    pub limit: usize,
}

impl From<LimitExceeded> for io::Error {
    fn from(err: LimitExceeded) -> Self {
        io::Error::other(err)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid CID: {0}")]
    Cid(String),
    #[error("invalid integer: {0}")]
    Int(#[from] ParseIntError),
    #[error("invalid big integer: {0}")]
    BigInt(#[from] num_bigint::ParseBigIntError),
    #[error("invalid float: {0}")]
    Float(#[from] ParseFloatError),
    #[error("invalid UTF-8 in string: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("unpaired surrogate \\u{0:04X}")]
    LoneSurrogate(u32),
    #[error("duplicate map key {0:?}")]
    DuplicateKey(String),
    #[error("timestamp outside the representable range")]
    TimestampOutOfRange,
    #[error("non-finite float {0} cannot be encoded")]
    NonFiniteFloat(f64),
}

// `cid::Error` is neither `PartialEq` nor `Clone`; its message is all callers
// need.
impl From<cid::Error> for DecodeError {
    fn from(err: cid::Error) -> Self {
        DecodeError::Cid(err.to_string())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    #[error("cannot marshal Deferred with no raw value (will not unmarshal)")]
    UnsetDeferred,
    #[error("no {0} body is pending on the token source")]
    NoPendingBody(&'static str),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid byte {}", ByteDisplay(*.0))]
    InvalidByte(u8),
    #[error("invalid escape character {}", ByteDisplay(*.0))]
    InvalidEscape(u8),
    #[error("unescaped control character {}", ByteDisplay(*.0))]
    ControlCharacter(u8),
    #[error("invalid number: {0}")]
    InvalidNumber(&'static str),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("input ends inside a literal")]
    TruncatedLiteral,
}

struct ByteDisplay(u8);

impl fmt::Display for ByteDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() {
            write!(f, "'{}'", self.0 as char)
        } else {
            write!(f, "0x{:02x}", self.0)
        }
    }
}
