// Duration normalization: unit suffixes, Go compound durations, defaults

use benchdash::duration::normalize;

#[test]
fn normalize_milliseconds() {
    assert_eq!(normalize(Some("1500ms")), 1500.0);
}

#[test]
fn normalize_seconds() {
    assert_eq!(normalize(Some("1.5s")), 1500.0);
}

#[test]
fn normalize_nanoseconds() {
    assert_eq!(normalize(Some("1500000ns")), 1.5);
}

#[test]
fn normalize_microseconds_all_spellings() {
    assert_eq!(normalize(Some("1500µs")), 1.5);
    assert_eq!(normalize(Some("1500μs")), 1.5);
    assert_eq!(normalize(Some("1500us")), 1.5);
}

#[test]
fn normalize_absent_is_zero() {
    assert_eq!(normalize(None), 0.0);
}

#[test]
fn normalize_garbage_is_zero() {
    assert_eq!(normalize(Some("garbage")), 0.0);
    assert_eq!(normalize(Some("")), 0.0);
    assert_eq!(normalize(Some("ms")), 0.0);
    assert_eq!(normalize(Some("12 parsecs")), 0.0);
}

#[test]
fn normalize_bare_number_is_milliseconds() {
    assert_eq!(normalize(Some("42")), 42.0);
    assert_eq!(normalize(Some(" 2.5 ")), 2.5);
}

#[test]
fn normalize_go_compound_durations() {
    assert_eq!(normalize(Some("1m30s")), 90_000.0);
    assert_eq!(normalize(Some("1m30.5s")), 90_500.0);
    assert_eq!(normalize(Some("2h0m1s")), 7_201_000.0);
}

#[test]
fn normalize_negative_passes_through() {
    assert_eq!(normalize(Some("-5ms")), -5.0);
}

#[test]
fn normalize_non_finite_is_zero() {
    assert_eq!(normalize(Some("infms")), 0.0);
    assert_eq!(normalize(Some("NaN")), 0.0);
}
