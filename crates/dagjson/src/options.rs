/// Default ceiling for strings, numbers and array lengths.
pub const DEFAULT_MAX_LENGTH: usize = 8192;

/// Default ceiling for decoded byte blobs and deferred captures (2 MiB).
pub const DEFAULT_BYTE_ARRAY_MAX_LEN: usize = 2 << 20;

/// Default ceiling for the text of a link: a base32 CIDv1 over a 32-byte
/// digest.
pub const DEFAULT_MAX_LINK_LENGTH: usize = 59;

/// Size ceilings applied by a [`Reader`](crate::Reader).
///
/// Every bounded accessor on the reader takes its ceiling as an argument.
/// These limits are what the reader falls back to where no explicit ceiling
/// is passed: object keys, [`discard_type`](crate::Reader::discard_type),
/// deferred captures, [`Value`](crate::Value) decoding, and the
/// [`UnmarshalDagJson`](crate::UnmarshalDagJson) implementations in this
/// crate.
///
/// # Examples
///
/// ```rust
/// use dagjson::{Limits, Reader};
///
/// let limits = Limits {
///     max_string_len: 64,
///     max_depth: Some(16),
///     ..Default::default()
/// };
/// let reader = Reader::from_reader_with_limits(&b"\"hi\""[..], limits);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum raw (still escaped) length of a string, in bytes.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_LENGTH`]
    pub max_string_len: usize,

    /// Maximum length of the text of a number, in bytes.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_LENGTH`]
    pub max_number_len: usize,

    /// Maximum decoded length of a bytes sentinel.
    ///
    /// # Default
    ///
    /// [`DEFAULT_BYTE_ARRAY_MAX_LEN`]
    pub max_bytes_len: usize,

    /// Maximum number of elements in an array.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_LENGTH`]
    pub max_array_len: usize,

    /// Maximum length of the text inside a link sentinel.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_LINK_LENGTH`]
    pub max_link_len: usize,

    /// Maximum size of the canonical buffer produced by a deferred capture.
    ///
    /// # Default
    ///
    /// [`DEFAULT_BYTE_ARRAY_MAX_LEN`]
    pub max_deferred_len: usize,

    /// Maximum nesting depth of objects and arrays.
    ///
    /// Without it, nesting is bounded only by the byte ceilings and the
    /// call stack.
    ///
    /// # Default
    ///
    /// `None`
    pub max_depth: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_LENGTH,
            max_number_len: DEFAULT_MAX_LENGTH,
            max_bytes_len: DEFAULT_BYTE_ARRAY_MAX_LEN,
            max_array_len: DEFAULT_MAX_LENGTH,
            max_link_len: DEFAULT_MAX_LINK_LENGTH,
            max_deferred_len: DEFAULT_BYTE_ARRAY_MAX_LEN,
            max_depth: None,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let limits: Limits = serde_json::from_str(r#"{"max_string_len":64,"max_depth":8}"#).unwrap();
        assert_eq!(
            limits,
            Limits {
                max_string_len: 64,
                max_depth: Some(8),
                ..Limits::default()
            }
        );
        let text = serde_json::to_string(&limits).unwrap();
        assert_eq!(serde_json::from_str::<Limits>(&text).unwrap(), limits);
    }
}
