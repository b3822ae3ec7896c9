mod arbitrary;

mod property_chunked;
mod property_roundtrip;
mod size_limits;

/// Iterations per quickcheck property.
pub(crate) fn quickcheck_tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}
