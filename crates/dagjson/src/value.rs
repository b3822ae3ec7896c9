//! The DAG-JSON data model.
//!
//! [`Value`] holds any decoded document, with the two sentinel shapes lifted
//! into [`Value::Bytes`] and [`Value::Link`].
use std::collections::{BTreeMap, btree_map::Entry};

use cid::Cid;
use num_bigint::BigInt;

use crate::{
    Error, JsonType, Reader, TokenSource,
    error::DecodeError,
    reader::Sentinel,
};

pub type Map = BTreeMap<String, Value>;
pub type List = Vec<Value>;

/// A DAG-JSON value.
///
/// Integers and floats are kept apart the way the wire keeps them apart: a
/// number whose text contains `.`, `e` or `E` is a [`Float`](Value::Float),
/// any other number is an [`Integer`](Value::Integer) of unbounded size.
///
/// [`Display`](core::fmt::Display) renders the canonical encoding, with map
/// keys in sorted order.
///
/// # Examples
///
/// ```
/// use dagjson::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::from("value"));
/// map.insert("blob".to_string(), Value::Bytes(vec![1, 2, 3]));
/// let v = Value::Map(map);
/// assert_eq!(v.to_string(), r#"{"blob":{"/":{"bytes":"AQID"}},"key":"value"}"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Link(Cid),
    List(List),
    Map(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Integer(v.into())
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Cid> for Value {
    fn from(v: Cid) -> Self {
        Self::Link(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Self::Integer(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_link(&self) -> Option<&Cid> {
        match self {
            Self::Link(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the entries of a [`Map`](Value::Map).
    ///
    /// # Examples
    ///
    /// ```
    /// use dagjson::{Value, from_slice};
    ///
    /// let v: Value = from_slice(br#"{"a":{"/":"bafkqaaa"}}"#)?;
    /// let link = v.as_map().and_then(|m| m["a"].as_link());
    /// assert_eq!(link.map(ToString::to_string).as_deref(), Some("bafkqaaa"));
    /// # Ok::<(), dagjson::Error>(())
    /// ```
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Only non-finite floats fail to encode.
        let buf = crate::to_vec(self).map_err(|_| core::fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

/// Interprets number text: floats when it has a fraction or exponent,
/// integers otherwise.
fn number(text: &str) -> Result<Value, Error> {
    if text.contains(['.', 'e', 'E']) {
        let f: f64 = text.parse().map_err(DecodeError::from)?;
        if !f.is_finite() {
            return Err(DecodeError::NonFiniteFloat(f).into());
        }
        Ok(Value::Float(f))
    } else {
        let n: BigInt = text.parse().map_err(DecodeError::from)?;
        Ok(Value::Integer(n))
    }
}

impl<T: TokenSource> Reader<T> {
    /// Reads the next value in full.
    ///
    /// Strings, numbers, byte blobs and arrays are bounded by the reader's
    /// [`Limits`](crate::Limits).
    ///
    /// # Errors
    ///
    /// Besides the errors of the individual accessors:
    /// - an object holding a `"/"` key that is not exactly a link or bytes
    ///   sentinel fails with [`Error::InvalidSentinel`];
    /// - a repeated map key fails with [`DecodeError::DuplicateKey`].
    pub fn read_value(&mut self) -> Result<Value, Error> {
        match self.peek_type()? {
            JsonType::Object => self.read_map(),
            JsonType::Array => {
                let mut list = List::new();
                self.read_array(|r, _| {
                    list.push(r.read_value()?);
                    Ok(())
                })?;
                Ok(Value::List(list))
            }
            JsonType::Number => number(&self.read_number_as_string(self.limits().max_number_len)?),
            JsonType::String => Ok(Value::String(
                self.read_string(self.limits().max_string_len)?,
            )),
            JsonType::Boolean => Ok(Value::Bool(self.read_bool()?)),
            JsonType::Null => {
                self.read_null()?;
                Ok(Value::Null)
            }
        }
    }

    fn read_map(&mut self) -> Result<Value, Error> {
        let mut map = Map::new();
        let mut sentinel = None;
        self.read_object(|r, index, key| {
            if sentinel.is_some() || (key == "/" && index > 0) {
                return Err(Error::InvalidSentinel("a sentinel must have exactly one key"));
            }
            if key == "/" {
                sentinel = Some(r.read_sentinel_value()?);
                return Ok(());
            }
            match map.entry(key) {
                Entry::Occupied(e) => Err(DecodeError::DuplicateKey(e.key().clone()).into()),
                Entry::Vacant(e) => {
                    e.insert(r.read_value()?);
                    Ok(())
                }
            }
        })?;
        Ok(match sentinel {
            Some(Sentinel::Link(cid)) => Value::Link(cid),
            Some(Sentinel::Bytes(bytes)) => Value::Bytes(bytes),
            None => Value::Map(map),
        })
    }
}
