use std::io::BufReader;

use quickcheck::QuickCheck;

use super::quickcheck_tests;
use crate::{Reader, Value, to_vec};

/// Property: the reader does not depend on how the underlying stream is
/// buffered. Every string and number body here crosses buffer boundaries.
#[test]
fn small_buffers_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, capacity: usize) -> bool {
        let buf = to_vec(&value).unwrap();
        let inner = BufReader::with_capacity(1 + capacity % 8, &buf[..]);
        let mut r = Reader::from_reader(inner);
        r.read_value().unwrap() == value && r.read_end().is_ok()
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Value, usize) -> bool);
}

#[test]
fn pretty_printed_input_across_buffers() {
    let src = "{\n  \"a\" : [ 1 ,\t-2.5e3 ] ,\r\n  \"b\" : { \"/\" : { \"bytes\" : \"AAEC\" } }\n}\n";
    for capacity in 1..=src.len() {
        let mut r = Reader::from_reader(BufReader::with_capacity(capacity, src.as_bytes()));
        let v = r.read_value().unwrap();
        assert_eq!(
            v.to_string(),
            r#"{"a":[1,-2500.0],"b":{"/":{"bytes":"AAEC"}}}"#,
            "capacity {capacity}"
        );
        r.read_end().unwrap();
    }
}
