#![no_main]

use arbitrary::Arbitrary;
use dagjson::{Limits, Reader, Value, capture, from_slice_with_limits, to_vec};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    max_len: u16,
    max_depth: u8,
    data: Vec<u8>,
}

/// Limits wide enough that anything read under `input`'s limits re-reads.
fn unbounded() -> Limits {
    Limits {
        max_string_len: usize::MAX,
        max_number_len: usize::MAX,
        max_bytes_len: usize::MAX,
        max_array_len: usize::MAX,
        max_link_len: usize::MAX,
        max_deferred_len: usize::MAX,
        max_depth: None,
    }
}

fuzz_target!(|input: Input| {
    let max_len = usize::from(input.max_len);
    let limits = Limits {
        max_string_len: max_len,
        // Integers past f64 range are valid DAG-JSON that serde_json refuses.
        max_number_len: max_len % 300,
        max_bytes_len: max_len,
        max_array_len: max_len,
        max_deferred_len: max_len,
        // serde_json stops at 128 levels.
        max_depth: Some(usize::from(input.max_depth) % 100),
        ..Limits::default()
    };

    if let Ok(value) = from_slice_with_limits::<Value>(&input.data, limits) {
        let buf = to_vec(&value).expect("decoded values encode");
        let again = from_slice_with_limits::<Value>(&buf, unbounded()).expect("encoding re-reads");
        assert_eq!(again, value);
        assert!(
            serde_json::from_slice::<serde_json::Value>(&input.data).is_ok(),
            "accepted input that serde_json rejects"
        );
    }

    let mut r = Reader::from_reader_with_limits(&input.data[..], limits);
    if let Ok(once) = capture(&mut r, max_len) {
        assert!(once.len() <= max_len);
        let mut r = Reader::from_reader_with_limits(&once[..], unbounded());
        let twice = capture(&mut r, usize::MAX).expect("captures re-read");
        assert_eq!(twice, once);
    }
});
