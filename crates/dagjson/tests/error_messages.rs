#![allow(missing_docs)]

use dagjson::{Deferred, Error, Limits, Reader, Value, from_slice, from_slice_with_limits, to_vec};

fn value_err(src: &str) -> Error {
    from_slice::<Value>(src.as_bytes()).unwrap_err()
}

#[test]
fn structural() {
    insta::assert_snapshot!(value_err("[1 2]"), @"expected array close or comma but read number");
    insta::assert_snapshot!(value_err(r#"{"a" 1}"#), @"expected object colon but read number");
    insta::assert_snapshot!(value_err("]"), @"expected start of value but read ]");
    insta::assert_snapshot!(value_err("1 2"), @"expected end of input but read number");
    let err = Reader::from_reader(&br#"{"/":{"bites":"AA"}}"#[..]).read_bytes(4).unwrap_err();
    insta::assert_snapshot!(err, @r#"expected key "bytes" but read "bites""#);
}

#[test]
fn syntax() {
    insta::assert_snapshot!(value_err("[tru]"), @"syntax error: invalid byte ']' at byte 4");
    insta::assert_snapshot!(value_err("[1.]"), @"syntax error: invalid number: expected digit after '.' at byte 3");
    insta::assert_snapshot!(value_err("\"a\u{1}\""), @"syntax error: unescaped control character 0x01 at byte 2");
    insta::assert_snapshot!(value_err("[\"abc"), @"syntax error: unexpected end of input at byte 5");
}

#[test]
fn decode() {
    insta::assert_snapshot!(value_err(r#"{"a":1,"a":2}"#), @r#"decode error: duplicate map key "a""#);
    insta::assert_snapshot!(value_err(r#""\ud800""#), @r"decode error: unpaired surrogate \uD800");
    insta::assert_snapshot!(value_err("1e999"), @"decode error: non-finite float inf cannot be encoded");
}

#[test]
fn size_limit() {
    let limits = Limits {
        max_string_len: 4,
        ..Limits::default()
    };
    let err = from_slice_with_limits::<Value>(br#""abcdef""#, limits).unwrap_err();
    insta::assert_snapshot!(err, @"length beyond maximum allowed: 6 bytes with 4 of 4 remaining");
}

#[test]
fn usage() {
    insta::assert_snapshot!(
        to_vec(&Deferred::new()).unwrap_err(),
        @"usage error: cannot marshal Deferred with no raw value (will not unmarshal)"
    );
}
