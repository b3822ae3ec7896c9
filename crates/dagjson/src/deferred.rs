use core::fmt;
use std::io::Write;

use bstr::BStr;

use crate::{
    Error, MarshalDagJson, Reader, TokenSource, UnmarshalDagJson, Writer, capture,
    error::UsageError,
};

/// A value whose decoding is postponed.
///
/// Unmarshaling a `Deferred` captures the next value as canonical DAG-JSON
/// without interpreting it; marshaling writes the captured bytes back
/// verbatim. A field of unknown or late-bound type can be carried through
/// this way and decoded later with [`from_slice`](crate::from_slice).
///
/// A `Deferred` starts out unset. Marshaling an unset `Deferred` fails,
/// since there is nothing to write that would read back as the same value;
/// use `Option<Deferred>` for a field that may be `null`.
///
/// ```rust
/// use dagjson::{Deferred, Value, from_slice, to_vec};
///
/// let d: Deferred = from_slice(br#"{ "b" : [1, 2] }"#)?;
/// assert_eq!(d.raw(), Some(&br#"{"b":[1,2]}"#[..]));
/// assert_eq!(to_vec(&d)?, br#"{"b":[1,2]}"#);
///
/// let v: Value = from_slice(d.raw().unwrap_or_default())?;
/// assert_eq!(v.to_string(), r#"{"b":[1,2]}"#);
/// # Ok::<(), dagjson::Error>(())
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Deferred {
    raw: Option<Vec<u8>>,
}

impl Deferred {
    /// An unset `Deferred`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A `Deferred` holding `raw`, which the caller asserts is canonical
    /// DAG-JSON.
    #[must_use]
    pub fn from_raw(raw: Vec<u8>) -> Self {
        Self { raw: Some(raw) }
    }

    #[must_use]
    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    pub fn set_raw(&mut self, raw: Vec<u8>) {
        self.raw = Some(raw);
    }

    #[must_use]
    pub fn into_raw(self) -> Option<Vec<u8>> {
        self.raw
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.raw.is_some()
    }
}

impl From<Vec<u8>> for Deferred {
    fn from(raw: Vec<u8>) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.debug_tuple("Deferred").field(&BStr::new(raw)).finish(),
            None => f.write_str("Deferred(<unset>)"),
        }
    }
}

impl MarshalDagJson for Deferred {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        match &self.raw {
            Some(raw) => w.write_raw(raw),
            None => {
                tracing::debug!("refusing to marshal an unset Deferred");
                Err(UsageError::UnsetDeferred.into())
            }
        }
    }
}

impl UnmarshalDagJson for Deferred {
    /// Captures the next value, up to [`Limits::max_deferred_len`] bytes of
    /// canonical output.
    ///
    /// [`Limits::max_deferred_len`]: crate::Limits::max_deferred_len
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
        let max = r.limits().max_deferred_len;
        capture(r, max).map(Self::from_raw)
    }
}
