//! Adaptive number formatting tests.

use plotweave_geometry::chart::{NumericFormat, NumericFormatter};

// ====================
// Format Selection
// ====================

#[test]
fn test_tiny_values_use_scientific() {
    let format = NumericFormatter::format(1e-6, 5e-6, 2e-6);
    assert_eq!(
        format,
        NumericFormat::Scientific {
            exponent: -6,
            decimals: 2
        }
    );
    assert_eq!(format.format(3e-6), "3.00");
    assert_eq!(format.format_with_exponent(3e-6), "3.00e-6");
}

#[test]
fn test_huge_values_use_scientific() {
    let format = NumericFormatter::format(0.0, 2e7, 5e6);
    assert_eq!(format.exponent(), Some(6));
    assert_eq!(format.format(1.5e7), "15.00");
}

#[test]
fn test_zero_spread_falls_back_to_magnitude() {
    let format = NumericFormatter::format(0.0, 0.0, 0.0);
    assert_eq!(format, NumericFormat::Fixed { decimals: 2 });
    assert_eq!(format.format(0.0), "0.00");
}

#[test]
fn test_mid_range_is_integer() {
    let format = NumericFormatter::format(-500.0, 500.0, 250.0);
    assert_eq!(format, NumericFormat::Integer);
    assert_eq!(format.format(-120.0), "-120");
}

// ====================
// Non-finite Input
// ====================

#[test]
fn test_non_finite_input_uses_identity() {
    assert_eq!(
        NumericFormatter::format(0.0, f64::INFINITY, 1.0),
        NumericFormat::Identity
    );
    assert_eq!(
        NumericFormatter::format(0.0, 1.0, f64::NAN),
        NumericFormat::Identity
    );
    assert_eq!(
        NumericFormatter::format(0.0, f64::NAN, 1.0),
        NumericFormat::Identity
    );
}

#[test]
fn test_formatter_never_panics() {
    let values = [
        0.0,
        -0.0,
        1e-300,
        -1e-12,
        3.5,
        -42.0,
        1e15,
        f64::MAX,
        f64::MIN_POSITIVE,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ];
    for &min in &values {
        for &max in &values {
            for &std in &values {
                let format = NumericFormatter::format(min, max, std);
                let _ = format.format(max);
                let _ = format.format_with_exponent(min);
            }
        }
    }
}

#[test]
fn test_precision_covers_spread() {
    // A spread of 0.01 must keep at least the hundredths visible.
    let format = NumericFormatter::format(0.0, 1.0, 0.01);
    let decimals = format.decimals().expect("fixed format");
    assert!(decimals >= 2, "got {decimals} decimals");
    assert_ne!(format.format(0.25), format.format(0.26));
}
