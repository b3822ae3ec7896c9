use quickcheck::QuickCheck;

use super::quickcheck_tests;
use crate::{JsonType, Reader, Value, capture, from_slice, to_vec};

/// Property: encoding a value and decoding the result gives the value back.
#[test]
fn encode_decode_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let buf = to_vec(&value).unwrap();
        from_slice::<Value>(&buf).unwrap() == value
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: capturing an encoding that is already canonical changes nothing,
/// and neither does capturing the capture.
#[test]
fn transcode_idempotence_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let canonical = to_vec(&value).unwrap();
        let once = capture(&mut Reader::from_reader(&canonical[..]), usize::MAX).unwrap();
        let twice = capture(&mut Reader::from_reader(&once[..]), usize::MAX).unwrap();
        once == canonical && twice == once
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: any number of peeks before a read observe the same type, and the
/// read that follows still sees the whole value.
#[test]
fn peek_does_not_consume_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, peeks: u8) -> bool {
        let buf = to_vec(&value).unwrap();
        let mut r = Reader::from_reader(&buf[..]);
        let first = r.peek_type().unwrap();
        for _ in 0..peeks % 4 {
            if r.peek_type().unwrap() != first {
                return false;
            }
        }
        let expected = match &value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Integer(_) | Value::Float(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::List(_) => JsonType::Array,
            Value::Bytes(_) | Value::Link(_) | Value::Map(_) => JsonType::Object,
        };
        first == expected && r.read_value().unwrap() == value && r.read_end().is_ok()
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Value, u8) -> bool);
}
