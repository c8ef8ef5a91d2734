//! Adaptive numeric formatting for tick labels and tooltips.
//!
//! [`NumericFormatter::format`] picks a display format from the magnitude of a
//! value range and the spread of the values shown in it. The format is chosen
//! once per axis (or tooltip) so neighbouring labels share their precision.

/// Digits of precision kept beyond the spread's leading digit.
const EXTRA_PRECISION: i32 = 2;

/// Values below this are treated as zero when taking logarithms.
const LOG_FLOOR: f64 = 1e-12;

/// A display format for numbers of a given range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFormat {
    /// Raw value, used when the range could not be analysed.
    Identity,
    /// Fixed-point with the given number of decimals.
    Fixed { decimals: usize },
    /// Rounded integer; a trailing `.` marks values that were not integral.
    Integer,
    /// Mantissa scaled by `10^exponent` with the given number of decimals.
    Scientific { exponent: i32, decimals: usize },
}

impl NumericFormat {
    /// Format a value for a tick label.
    ///
    /// Scientific formats print only the mantissa; the shared exponent is
    /// available through [`exponent`](Self::exponent) for the axis unit label.
    pub fn format(&self, value: f64) -> String {
        match *self {
            Self::Identity => value.to_string(),
            Self::Fixed { decimals } => to_fixed(value, decimals),
            Self::Integer => {
                let rounded = value.round();
                // Avoid "-0".
                let rounded = if rounded == 0.0 { 0.0 } else { rounded };
                if value.is_finite() && value.fract() != 0.0 {
                    format!("{rounded}.")
                } else {
                    format!("{rounded}")
                }
            }
            Self::Scientific { exponent, decimals } => {
                to_fixed(value / 10f64.powi(exponent), decimals)
            }
        }
    }

    /// Format a value as a self-contained string, e.g. `1.23e-5`.
    pub fn format_with_exponent(&self, value: f64) -> String {
        match self.exponent() {
            Some(exponent) => format!("{}e{exponent}", self.format(value)),
            None => self.format(value),
        }
    }

    /// The base-10 exponent factored out of every value, if any.
    pub fn exponent(&self) -> Option<i32> {
        match *self {
            Self::Scientific { exponent, .. } => Some(exponent),
            _ => None,
        }
    }

    pub fn decimals(&self) -> Option<usize> {
        match *self {
            Self::Fixed { decimals } | Self::Scientific { decimals, .. } => Some(decimals),
            Self::Integer => Some(0),
            Self::Identity => None,
        }
    }
}

/// Fixed-point text with ties rounded away from zero, matching
/// [`NumericFormat::Integer`]. Values too large to scale exactly fall back
/// to the standard formatter.
fn to_fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals.min(i32::MAX as usize) as i32);
    let scaled = value * scale;
    if !(scaled.abs() < 1e15) {
        return format!("{value:.decimals$}");
    }
    let rounded = scaled.round() / scale;
    // Avoid "-0.00".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.decimals$}")
}

/// Chooses a [`NumericFormat`] for a value range.
pub struct NumericFormatter;

impl NumericFormatter {
    /// Pick a format for values in `min..=max` whose typical spread is `std`.
    ///
    /// Falls back to [`NumericFormat::Identity`] when the largest magnitude or
    /// the spread is NaN or infinite.
    pub fn format(min: f64, max: f64, std: f64) -> NumericFormat {
        // f64::max ignores NaN operands, so check the inputs directly.
        if min.is_nan() || max.is_nan() {
            return NumericFormat::Identity;
        }
        let posmax = min.abs().max(max.abs());
        if !posmax.is_finite() || !std.is_finite() {
            return NumericFormat::Identity;
        }

        let p = if posmax > LOG_FLOOR { posmax.log10() } else { 0.0 };
        let p_floor = p.floor() as i32;
        let alpha = if std > LOG_FLOOR {
            std.log10().floor() as i32 - EXTRA_PRECISION
        } else {
            p_floor - EXTRA_PRECISION
        };

        if alpha < 0 {
            if alpha <= -2 && p_floor <= -4 {
                NumericFormat::Scientific {
                    exponent: p_floor,
                    decimals: (-alpha + p_floor).max(0) as usize,
                }
            } else {
                NumericFormat::Fixed {
                    decimals: (-alpha) as usize,
                }
            }
        } else if alpha >= 2 && p > 5.0 {
            NumericFormat::Scientific {
                exponent: alpha + EXTRA_PRECISION,
                decimals: 2,
            }
        } else {
            NumericFormat::Integer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range_is_fixed() {
        let format = NumericFormatter::format(0.0, 1.0, 0.25);
        assert_eq!(format, NumericFormat::Fixed { decimals: 3 });
        assert_eq!(format.format(0.5), "0.500");
    }

    #[test]
    fn test_integer_trailing_dot() {
        let format = NumericFormatter::format(0.0, 1000.0, 250.0);
        assert_eq!(format, NumericFormat::Integer);
        assert_eq!(format.format(300.0), "300");
        assert_eq!(format.format(300.4), "300.");
        assert_eq!(format.format(-0.2), "0.");
    }

    #[test]
    fn test_fixed_ties_round_away_from_zero() {
        let format = NumericFormat::Fixed { decimals: 1 };
        assert_eq!(format.format(0.25), "0.3");
        assert_eq!(format.format(-0.25), "-0.3");
        assert_eq!(format.format(1.75), "1.8");
        assert_eq!(format.format(-0.04), "0.0");
        assert_eq!(NumericFormat::Integer.format(2.5), "3.");
        assert_eq!(format.format(f64::NAN), "NaN");
    }

    #[test]
    fn test_scientific_mantissa_rounds_like_fixed() {
        let format = NumericFormat::Scientific { exponent: 3, decimals: 1 };
        assert_eq!(format.format(1250.0), "1.3");
        assert_eq!(format.format_with_exponent(1250.0), "1.3e3");
    }

    #[test]
    fn test_identity_on_nan_min() {
        assert_eq!(NumericFormatter::format(f64::NAN, 1.0, 0.1), NumericFormat::Identity);
        assert_eq!(NumericFormat::Identity.format(1.5), "1.5");
    }
}
