//! Codec traits and the helpers built on them.
//!
//! Hand-written or generated record codecs implement [`MarshalDagJson`] and
//! [`UnmarshalDagJson`] in terms of the [`Writer`] and [`Reader`] accessors;
//! the implementations here cover the scalar types, [`Value`], and `Option`
//! for nullable fields.

use std::io::Write;

use cid::Cid;
use num_bigint::BigInt;

use crate::{BoundedSink, Error, Limits, Reader, TokenSource, Value, Writer};

/// Types that can write themselves as DAG-JSON.
pub trait MarshalDagJson {
    /// Writes `self` in canonical form.
    ///
    /// # Errors
    ///
    /// Fails if `self` has no DAG-JSON representation, or if the writer
    /// fails.
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error>;
}

/// Types that can read themselves from DAG-JSON.
pub trait UnmarshalDagJson: Sized {
    /// Reads exactly one value.
    ///
    /// # Errors
    ///
    /// Fails if the next value does not decode to `Self`.
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error>;
}

/// Encodes `value` into a new buffer.
///
/// # Errors
///
/// Fails if `value` cannot be encoded.
pub fn to_vec<T: MarshalDagJson + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let mut w = Writer::new(Vec::new());
    value.marshal_dag_json(&mut w)?;
    Ok(w.into_inner())
}

/// Encodes `value` into a new buffer of at most `max_len` bytes.
///
/// # Errors
///
/// Fails with a size-limit error if the encoding is longer than `max_len`.
pub fn to_vec_bounded<T: MarshalDagJson + ?Sized>(
    value: &T,
    max_len: usize,
) -> Result<Vec<u8>, Error> {
    let mut w = Writer::new(BoundedSink::new(Vec::new(), max_len));
    value.marshal_dag_json(&mut w)?;
    Ok(w.into_inner().into_inner())
}

/// Decodes a complete document with the default [`Limits`].
///
/// # Errors
///
/// Fails if the document does not decode to `T`, or if anything follows it.
///
/// # Examples
///
/// ```rust
/// use dagjson::from_slice;
///
/// let n: Option<u64> = from_slice(b" 7 ")?;
/// assert_eq!(n, Some(7));
/// assert!(from_slice::<u64>(b"7 8").is_err());
/// # Ok::<(), dagjson::Error>(())
/// ```
pub fn from_slice<T: UnmarshalDagJson>(bytes: &[u8]) -> Result<T, Error> {
    from_slice_with_limits(bytes, Limits::default())
}

/// Decodes a complete document with the given limits.
///
/// # Errors
///
/// As [`from_slice`].
pub fn from_slice_with_limits<T: UnmarshalDagJson>(bytes: &[u8], limits: Limits) -> Result<T, Error> {
    let mut r = Reader::from_reader_with_limits(bytes, limits);
    let value = T::unmarshal_dag_json(&mut r)?;
    r.read_end()?;
    Ok(value)
}

impl<M: MarshalDagJson + ?Sized> MarshalDagJson for &M {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        (**self).marshal_dag_json(w)
    }
}

impl<M: MarshalDagJson> MarshalDagJson for Option<M> {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        match self {
            Some(v) => v.marshal_dag_json(w),
            None => w.write_null(),
        }
    }
}

impl<U: UnmarshalDagJson> UnmarshalDagJson for Option<U> {
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
        if r.peek_null()? {
            r.read_null()?;
            return Ok(None);
        }
        U::unmarshal_dag_json(r).map(Some)
    }
}

impl<M: MarshalDagJson> MarshalDagJson for [M] {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        w.write_array_open()?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                w.write_comma()?;
            }
            v.marshal_dag_json(w)?;
        }
        w.write_array_close()
    }
}

impl<M: MarshalDagJson> MarshalDagJson for Vec<M> {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        self.as_slice().marshal_dag_json(w)
    }
}

impl<U: UnmarshalDagJson> UnmarshalDagJson for Vec<U> {
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
        let mut out = Vec::new();
        r.read_array(|r, _| {
            out.push(U::unmarshal_dag_json(r)?);
            Ok(())
        })?;
        Ok(out)
    }
}

macro_rules! scalar_codec {
    ($ty:ty, $write:ident, $read:ident) => {
        impl MarshalDagJson for $ty {
            fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
                w.$write(*self)
            }
        }

        impl UnmarshalDagJson for $ty {
            fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
                r.$read()
            }
        }
    };
}

scalar_codec!(bool, write_bool, read_bool);
scalar_codec!(u8, write_u8, read_number_as_u8);
scalar_codec!(u64, write_u64, read_number_as_u64);
scalar_codec!(i64, write_i64, read_number_as_i64);

impl MarshalDagJson for str {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        w.write_string(self)
    }
}

impl MarshalDagJson for String {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        w.write_string(self)
    }
}

impl UnmarshalDagJson for String {
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
        let max = r.limits().max_string_len;
        r.read_string(max)
    }
}

impl MarshalDagJson for BigInt {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        w.write_big_int(self)
    }
}

impl UnmarshalDagJson for BigInt {
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
        let max = r.limits().max_number_len;
        r.read_number_as_big_int(max)
    }
}

impl MarshalDagJson for Cid {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        w.write_cid(self)
    }
}

impl UnmarshalDagJson for Cid {
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
        r.read_cid()
    }
}

impl MarshalDagJson for Value {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        match self {
            Value::Null => w.write_null(),
            Value::Bool(b) => w.write_bool(*b),
            Value::Integer(n) => w.write_big_int(n),
            Value::Float(f) => w.write_f64(*f),
            Value::String(s) => w.write_string(s),
            Value::Bytes(b) => w.write_bytes(b),
            Value::Link(c) => w.write_cid(c),
            Value::List(list) => list.marshal_dag_json(w),
            Value::Map(map) => {
                w.write_object_open()?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        w.write_comma()?;
                    }
                    w.write_string(k)?;
                    w.write_object_colon()?;
                    v.marshal_dag_json(w)?;
                }
                w.write_object_close()
            }
        }
    }
}

impl UnmarshalDagJson for Value {
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
        r.read_value()
    }
}
