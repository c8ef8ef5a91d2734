//! Axis tick placement and labeling.

use super::format::{NumericFormat, NumericFormatter};
use super::scale::{AxisRange, ScaleType};

/// A labeled tick position.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Ticks for one axis plus the format their labels share.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTicks {
    pub ticks: Vec<Tick>,
    pub format: NumericFormat,
}

impl AxisTicks {
    fn empty() -> Self {
        Self {
            ticks: Vec::new(),
            format: NumericFormat::Identity,
        }
    }

    /// Exponent factored out of the labels, shown once as an axis unit.
    pub fn exponent(&self) -> Option<i32> {
        self.format.exponent()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|tick| tick.value)
    }
}

/// A "nice" 1/2/5 × 10^k interval giving roughly `target_count` ticks over `span`.
pub fn nice_interval(span: f64, target_count: usize) -> f64 {
    let rough_interval = span / target_count.max(1) as f64;
    let magnitude = 10f64.powf(rough_interval.log10().floor());
    let normalized = rough_interval / magnitude;

    if normalized < 1.5 {
        magnitude
    } else if normalized < 3.0 {
        2.0 * magnitude
    } else if normalized < 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

/// Multiples of `interval` inside `min..=max`.
fn multiples_in(min: f64, max: f64, interval: f64) -> Vec<f64> {
    if !(interval > 0.0) || !interval.is_finite() {
        return Vec::new();
    }

    // Tolerate rounding so range ends that sit on a multiple get their tick.
    let first = (min / interval - 1e-9).ceil() as i64;
    let last = (max / interval + 1e-9).floor() as i64;
    (first..=last)
        .map(|k| {
            let value = k as f64 * interval;
            // Snap accumulated error around zero so it never prints as "-0.00".
            if value.abs() < interval * 1e-9 { 0.0 } else { value }
        })
        .collect()
}

/// Ticks for a linear axis, labeled with a shared [`NumericFormat`].
///
/// The format is derived from the range with a quarter-range spread, so the
/// labels carry just enough decimals to tell neighbouring ticks apart.
pub fn axis_ticks(range: AxisRange, target_count: usize) -> AxisTicks {
    if !range.is_valid() || range.span() <= 0.0 {
        return AxisTicks::empty();
    }

    let interval = nice_interval(range.span(), target_count);
    let values = multiples_in(range.min, range.max, interval);
    let format = NumericFormatter::format(range.min, range.max, range.span() / 4.0);

    AxisTicks {
        ticks: values
            .into_iter()
            .map(|value| Tick {
                value,
                label: format.format(value),
            })
            .collect(),
        format,
    }
}

/// Ticks for an axis of any scale.
///
/// Logarithmic axes get one tick per integral power of the base; when the
/// range spans less than two powers the linear placement is used instead.
pub fn scaled_axis_ticks(range: AxisRange, scale: ScaleType, target_count: usize) -> AxisTicks {
    let ScaleType::Logarithmic { base } = scale else {
        return axis_ticks(range, target_count);
    };
    if !range.is_valid() || range.min <= 0.0 {
        return AxisTicks::empty();
    }

    let first = (scale.forward(range.min) - 1e-9).ceil() as i32;
    let last = (scale.forward(range.max) + 1e-9).floor() as i32;
    if last - first < 1 {
        return axis_ticks(range, target_count);
    }

    let ticks = (first..=last)
        .map(|k| {
            let value = base.powi(k);
            let label = if base == 10.0 {
                if (0..=5).contains(&k) {
                    format!("{value}")
                } else {
                    format!("1e{k}")
                }
            } else {
                format!("{base}^{k}")
            };
            Tick { value, label }
        })
        .collect();

    AxisTicks {
        ticks,
        format: NumericFormat::Identity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_interval_steps() {
        assert_eq!(nice_interval(10.0, 5), 2.0);
        assert_eq!(nice_interval(100.0, 10), 10.0);
        assert!((nice_interval(1.0, 2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unit_range_ticks() {
        let ticks = axis_ticks(AxisRange::new(0.0, 1.0), 5);
        let labels: Vec<_> = ticks.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0.000", "0.200", "0.400", "0.600", "0.800", "1.000"]);
        assert_eq!(ticks.exponent(), None);
    }

    #[test]
    fn test_symmetric_range_has_clean_zero() {
        let ticks = axis_ticks(AxisRange::new(-0.3, 0.3), 6);
        assert!(ticks.values().any(|v| v == 0.0 && v.is_sign_positive()));
    }

    #[test]
    fn test_tiny_range_shares_exponent() {
        let ticks = axis_ticks(AxisRange::new(0.0, 3e-5), 4);
        assert_eq!(ticks.exponent(), Some(-5));
        assert_eq!(ticks.ticks.len(), 4);
        assert_eq!(ticks.ticks.last().map(|t| t.label.as_str()), Some("3.000"));
    }

    #[test]
    fn test_log_ticks() {
        let ticks = scaled_axis_ticks(AxisRange::new(1.0, 1e7), ScaleType::log10(), 5);
        let labels: Vec<_> = ticks.ticks.iter().map(|t| t.label.clone()).collect();
        assert_eq!(labels.first().map(String::as_str), Some("1"));
        assert_eq!(labels.last().map(String::as_str), Some("1e7"));
        assert_eq!(labels.len(), 8);
    }

    #[test]
    fn test_invalid_range_has_no_ticks() {
        assert!(axis_ticks(AxisRange::new(1.0, 1.0), 5).ticks.is_empty());
        assert!(axis_ticks(AxisRange::new(f64::NAN, 1.0), 5).ticks.is_empty());
    }
}
