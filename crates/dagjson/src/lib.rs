//! A bounded, streaming DAG-JSON codec.
//!
//! DAG-JSON is canonical JSON plus two reserved shapes: `{"/":"<cid>"}` for
//! links and `{"/":{"bytes":"<base64>"}}` for byte strings. This crate reads
//! and writes it one token at a time, and every read that buffers a
//! variable-length value takes a ceiling, so a hostile document cannot make
//! it allocate more than the caller allowed.
//!
//! - [`Reader`] pulls typed values out of a [`TokenSource`] with one token of
//!   lookahead.
//! - [`Writer`] pushes canonical tokens into any [`std::io::Write`].
//! - [`BoundedSink`] caps the total number of bytes written through it.
//! - [`transcode`] and [`capture`] copy a value in canonical form;
//!   [`Deferred`] stores such a copy for later decoding.
//! - [`MarshalDagJson`] and [`UnmarshalDagJson`] are the interface record
//!   codecs are written against.
//!
//! ```rust
//! use dagjson::{Value, from_slice, to_vec};
//!
//! let v: Value = from_slice(br#"{"data":{"/":{"bytes":"aGk"}},"n":[1,2.5]}"#)?;
//! assert_eq!(v.as_map().unwrap()["data"], Value::Bytes(b"hi".to_vec()));
//! assert_eq!(to_vec(&v)?, br#"{"data":{"/":{"bytes":"aGk"}},"n":[1,2.5]}"#);
//! # Ok::<(), dagjson::Error>(())
//! ```

#![allow(missing_docs)]

mod escape_buffer;
mod literal_buffer;

mod codec;
mod deferred;
mod error;
mod options;
mod reader;
mod sink;
mod time;
mod token;
mod tokenizer;
mod transcode;
mod value;
mod writer;

#[cfg(test)]
mod tests;

pub use codec::{
    MarshalDagJson, UnmarshalDagJson, from_slice, from_slice_with_limits, to_vec, to_vec_bounded,
};
pub use deferred::Deferred;
pub use error::{DecodeError, Error, ErrorKind, LimitExceeded, SyntaxError, UsageError};
pub use options::{
    DEFAULT_BYTE_ARRAY_MAX_LEN, DEFAULT_MAX_LENGTH, DEFAULT_MAX_LINK_LENGTH, Limits,
};
pub use reader::Reader;
pub use sink::BoundedSink;
pub use time::Timestamp;
pub use token::{JsonType, Token, TokenSource};
pub use tokenizer::Tokenizer;
pub use transcode::{capture, transcode};
pub use value::{List, Map, Value};
pub use writer::Writer;

pub use cid::Cid;
pub use num_bigint::BigInt;
