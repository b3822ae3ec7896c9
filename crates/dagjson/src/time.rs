use std::{
    io::Write,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::{
    Error, MarshalDagJson, Reader, TokenSource, UnmarshalDagJson, Writer, error::DecodeError,
};

/// A point in time, encoded as signed nanoseconds since the unix epoch.
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
/// use dagjson::{Timestamp, from_slice, to_vec};
///
/// let t = Timestamp(UNIX_EPOCH + Duration::from_millis(1500));
/// assert_eq!(to_vec(&t)?, b"1500000000");
/// assert_eq!(from_slice::<Timestamp>(b"1500000000")?, t);
/// # Ok::<(), dagjson::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub SystemTime);

impl Timestamp {
    /// Nanoseconds since the unix epoch, negative before it.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::TimestampOutOfRange`] for times more than
    /// about 292 years away from the epoch.
    pub fn unix_nanos(&self) -> Result<i64, DecodeError> {
        let nanos = match self.0.duration_since(UNIX_EPOCH) {
            Ok(after) => i128::try_from(after.as_nanos()),
            Err(before) => i128::try_from(before.duration().as_nanos()).map(|n| -n),
        };
        nanos
            .ok()
            .and_then(|n| i64::try_from(n).ok())
            .ok_or(DecodeError::TimestampOutOfRange)
    }

    /// The time `nanos` nanoseconds from the unix epoch.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::TimestampOutOfRange`] if the platform's
    /// [`SystemTime`] cannot represent it.
    pub fn from_unix_nanos(nanos: i64) -> Result<Self, DecodeError> {
        let offset = Duration::from_nanos(nanos.unsigned_abs());
        let t = if nanos >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        };
        t.map(Self).ok_or(DecodeError::TimestampOutOfRange)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        Self(t)
    }
}

impl From<Timestamp> for SystemTime {
    fn from(t: Timestamp) -> Self {
        t.0
    }
}

impl MarshalDagJson for Timestamp {
    fn marshal_dag_json<W: Write>(&self, w: &mut Writer<W>) -> Result<(), Error> {
        w.write_i64(self.unix_nanos()?)
    }
}

impl UnmarshalDagJson for Timestamp {
    fn unmarshal_dag_json<T: TokenSource>(r: &mut Reader<T>) -> Result<Self, Error> {
        Ok(Self::from_unix_nanos(r.read_number_as_i64()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_slice, to_vec};

    #[test]
    fn epoch_and_before() {
        assert_eq!(Timestamp(UNIX_EPOCH).unix_nanos().unwrap(), 0);
        let before = Timestamp(UNIX_EPOCH - Duration::from_nanos(5));
        assert_eq!(before.unix_nanos().unwrap(), -5);
        assert_eq!(to_vec(&before).unwrap(), b"-5");
        assert_eq!(from_slice::<Timestamp>(b"-5").unwrap(), before);
    }

    #[test]
    fn extremes_round_trip() {
        for n in [i64::MIN, i64::MAX] {
            let t = Timestamp::from_unix_nanos(n).unwrap();
            assert_eq!(t.unix_nanos().unwrap(), n);
        }
    }

    #[test]
    fn far_future_is_out_of_range() {
        let far = Timestamp(UNIX_EPOCH + Duration::from_secs(400 * 365 * 24 * 3600));
        assert_eq!(far.unix_nanos(), Err(DecodeError::TimestampOutOfRange));
        assert!(to_vec(&far).is_err());
    }

    #[test]
    fn rejects_non_integers() {
        assert!(from_slice::<Timestamp>(b"1.5").is_err());
        assert!(from_slice::<Timestamp>(b"\"2020-01-01\"").is_err());
    }
}
