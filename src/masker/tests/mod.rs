
/// Assert two floats agree to within `1e-9`
pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}", expected, actual
    );
}
