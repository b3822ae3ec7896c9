use std::io::{self, Write};

use crate::error::LimitExceeded;

/// A writer that lets at most `limit` bytes through to `inner`, cumulative
/// over its lifetime.
///
/// A write that does not fit in the remaining budget fails with
/// [`LimitExceeded`] (inside an [`io::Error`]) and leaves `inner` untouched:
/// there are no truncated partial writes.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use dagjson::BoundedSink;
///
/// let mut out = Vec::new();
/// let mut sink = BoundedSink::new(&mut out, 4);
/// sink.write_all(b"abc").unwrap();
/// assert!(sink.write_all(b"de").is_err());
/// assert_eq!(sink.remaining(), 1);
/// assert_eq!(out, b"abc");
/// ```
#[derive(Debug)]
pub struct BoundedSink<W> {
    inner: W,
    remaining: usize,
    limit: usize,
}

impl<W: Write> BoundedSink<W> {
    pub fn new(inner: W, limit: usize) -> Self {
        Self {
            inner,
            remaining: limit,
            limit,
        }
    }

    /// Bytes that may still be written.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Budget the sink was constructed with.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for BoundedSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.remaining {
            tracing::debug!(
                requested = buf.len(),
                remaining = self.remaining,
                limit = self.limit,
                "bounded write rejected"
            );
            return Err(LimitExceeded {
                requested: buf.len(),
                remaining: self.remaining,
                limit: self.limit,
            }
            .into());
        }
        let n = self.inner.write(buf)?;
        self.remaining -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
