use quickcheck::QuickCheck;

use super::quickcheck_tests;
use crate::{
    ErrorKind, Limits, Reader, Value, Writer, capture, from_slice_with_limits, to_vec,
    to_vec_bounded,
};

fn limits(f: impl FnOnce(&mut Limits)) -> Limits {
    let mut limits = Limits::default();
    f(&mut limits);
    limits
}

/// Property: a whole document fits a ceiling equal to its length and fails
/// with a size-limit error one byte below it, on both the writing and the
/// capturing side.
#[test]
fn whole_document_ceiling_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let buf = to_vec(&value).unwrap();
        let n = buf.len();
        let capture_at = |max| capture(&mut Reader::from_reader(&buf[..]), max);
        to_vec_bounded(&value, n).is_ok_and(|b| b == buf)
            && to_vec_bounded(&value, n - 1).is_err_and(|e| e.is_size_limit())
            && capture_at(n).is_ok()
            && capture_at(n - 1).is_err_and(|e| e.is_size_limit())
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn string_one_byte_over() {
    let mut r = Reader::from_reader(&br#""abcde""#[..]);
    assert_eq!(r.read_string(5).unwrap(), "abcde");
    let mut r = Reader::from_reader(&br#""abcde""#[..]);
    assert_eq!(r.read_string(4).unwrap_err().kind(), ErrorKind::SizeLimit);
}

#[test]
fn number_one_byte_over() {
    let mut r = Reader::from_reader(&b"12345"[..]);
    assert_eq!(r.read_number_as_string(5).unwrap(), "12345");
    let mut r = Reader::from_reader(&b"12345"[..]);
    assert_eq!(
        r.read_number_as_string(4).unwrap_err().kind(),
        ErrorKind::SizeLimit
    );
}

#[test]
fn bytes_one_byte_over() {
    // Six bytes encode to eight characters, seven to ten.
    let six = br#"{"/":{"bytes":"AAECAwQF"}}"#;
    let seven = br#"{"/":{"bytes":"AAECAwQFBg"}}"#;
    assert_eq!(Reader::from_reader(&six[..]).read_bytes(6).unwrap().len(), 6);
    let err = Reader::from_reader(&seven[..]).read_bytes(6).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeLimit);
}

#[test]
fn oversized_bytes_are_a_size_limit_at_every_ceiling() {
    for max in 0..16 {
        let src = to_vec(&Value::Bytes(vec![7; max + 1])).unwrap();
        let err = Reader::from_reader(&src[..]).read_bytes(max).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeLimit, "max {max}: {err}");
        let src = to_vec(&Value::Bytes(vec![7; max])).unwrap();
        assert_eq!(Reader::from_reader(&src[..]).read_bytes(max).unwrap().len(), max);
    }
}

#[test]
fn limits_thread_through_values() {
    let l = limits(|l| l.max_number_len = 3);
    assert!(from_slice_with_limits::<Value>(b"[123]", l).is_ok());
    assert!(
        from_slice_with_limits::<Value>(b"[1234]", l)
            .unwrap_err()
            .is_size_limit()
    );

    let l = limits(|l| l.max_array_len = 3);
    assert!(from_slice_with_limits::<Value>(b"[[1,2,3]]", l).is_ok());
    assert!(
        from_slice_with_limits::<Value>(b"[[1,2,3,4]]", l)
            .unwrap_err()
            .is_size_limit()
    );
}

#[test]
fn depth_guard_is_off_by_default() {
    let depth = 200;
    let src = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    assert!(from_slice_with_limits::<Value>(src.as_bytes(), Limits::default()).is_ok());
    let l = limits(|l| l.max_depth = Some(depth - 1));
    assert!(
        from_slice_with_limits::<Value>(src.as_bytes(), l)
            .unwrap_err()
            .is_size_limit()
    );
}

#[test]
fn rejected_write_leaves_output_untouched() {
    let mut w = Writer::bounded(Vec::new(), 10);
    w.write_array_open().unwrap();
    let err = w.write_string("far too long").unwrap_err();
    assert!(err.is_size_limit());
    assert_eq!(w.get_ref().get_ref(), b"[");
    assert_eq!(w.get_ref().remaining(), 9);
}
