//! Axis scales, value ranges and data-to-screen transforms.
//!
//! This module provides:
//! - `ScaleType` - linear and logarithmic axis scales
//! - `AxisRange` / `DataBounds` - value extents with NaN-aware accumulation
//! - `AxisTransform` / `PlotTransform` - f64 mapping between data and screen

use super::clip::ClipRegion;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Scale type for axis transformation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ScaleType {
    #[default]
    Linear,
    /// Logarithmic scale. Non-positive values have no position and map to NaN.
    Logarithmic { base: f64 },
}

impl ScaleType {
    pub fn log10() -> Self {
        Self::Logarithmic { base: 10.0 }
    }

    /// Map a data value into the scale's linear space.
    pub fn forward(&self, value: f64) -> f64 {
        match *self {
            Self::Linear => value,
            Self::Logarithmic { base } => {
                if value <= 0.0 {
                    f64::NAN
                } else if base == 10.0 {
                    value.log10()
                } else {
                    value.log(base)
                }
            }
        }
    }

    /// Inverse of [`forward`](Self::forward).
    pub fn inverse(&self, value: f64) -> f64 {
        match *self {
            Self::Linear => value,
            Self::Logarithmic { base } => base.powf(value),
        }
    }

    /// Normalize a value to `[0, 1]` over `min..=max` (values outside map outside).
    pub fn normalize(&self, value: f64, min: f64, max: f64) -> f64 {
        let (lo, hi) = (self.forward(min), self.forward(max));
        if (hi - lo).abs() < f64::EPSILON {
            return 0.5;
        }
        (self.forward(value) - lo) / (hi - lo)
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, t: f64, min: f64, max: f64) -> f64 {
        let (lo, hi) = (self.forward(min), self.forward(max));
        self.inverse(lo + t * (hi - lo))
    }
}

/// A closed value interval. The empty range has `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl AxisRange {
    pub const EMPTY: AxisRange = AxisRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }

    /// Finite and non-empty.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Grow to include a value; non-finite values are ignored.
    pub fn include(&mut self, value: f64) {
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    pub fn union(&self, other: &AxisRange) -> AxisRange {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => *other,
            (_, true) => *self,
            _ => AxisRange::new(self.min.min(other.min), self.max.max(other.max)),
        }
    }

    /// Widen by `fraction` of the span on both ends. A zero-width range is
    /// widened by half a unit (or a tenth of its magnitude) so it stays drawable.
    pub fn padded(&self, fraction: f64) -> AxisRange {
        let span = self.span();
        if span > 0.0 {
            let pad = span * fraction;
            AxisRange::new(self.min - pad, self.max + pad)
        } else {
            let pad = if self.min == 0.0 { 0.5 } else { self.min.abs() * 0.1 };
            AxisRange::new(self.min - pad, self.max + pad)
        }
    }
}

impl FromIterator<f64> for AxisRange {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut range = AxisRange::EMPTY;
        for value in iter {
            range.include(value);
        }
        range
    }
}

/// Data extents of one or more plots.
///
/// Alongside the full extents it keeps the extents of the strictly positive
/// values, which is what a logarithmic axis can show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub x: AxisRange,
    pub y: AxisRange,
    pub x_positive: AxisRange,
    pub y_positive: AxisRange,
}

impl DataBounds {
    pub const EMPTY: DataBounds = DataBounds {
        x: AxisRange::EMPTY,
        y: AxisRange::EMPTY,
        x_positive: AxisRange::EMPTY,
        y_positive: AxisRange::EMPTY,
    };

    /// Bounds of the finite `(x[i], y[i])` pairs, or `None` if there are none.
    pub fn from_xy(x: &[f64], y: &[f64]) -> Option<Self> {
        let mut bounds = Self::EMPTY;
        for (&xv, &yv) in x.iter().zip(y) {
            if xv.is_finite() && yv.is_finite() {
                bounds.include_x(xv);
                bounds.include_y(yv);
            }
        }
        bounds.into_option()
    }

    /// Bounds of two independent axes, as for the cell edges of a grid.
    pub fn from_axes(x: &[f64], y: &[f64]) -> Option<Self> {
        let mut bounds = Self::EMPTY;
        x.iter().for_each(|&v| bounds.include_x(v));
        y.iter().for_each(|&v| bounds.include_y(v));
        bounds.into_option()
    }

    pub fn include_x(&mut self, value: f64) {
        self.x.include(value);
        if value > 0.0 {
            self.x_positive.include(value);
        }
    }

    pub fn include_y(&mut self, value: f64) {
        self.y.include(value);
        if value > 0.0 {
            self.y_positive.include(value);
        }
    }

    pub fn union(&self, other: &DataBounds) -> DataBounds {
        DataBounds {
            x: self.x.union(&other.x),
            y: self.y.union(&other.y),
            x_positive: self.x_positive.union(&other.x_positive),
            y_positive: self.y_positive.union(&other.y_positive),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    pub fn into_option(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// Maps one data axis onto a screen interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    pub range: AxisRange,
    pub scale: ScaleType,
    /// Screen coordinate of `range.min`.
    pub screen_start: f64,
    /// Screen coordinate of `range.max`.
    pub screen_end: f64,
}

impl AxisTransform {
    pub fn new(range: AxisRange, scale: ScaleType, screen_start: f64, screen_end: f64) -> Self {
        Self {
            range,
            scale,
            screen_start,
            screen_end,
        }
    }

    pub fn to_screen(&self, value: f64) -> f64 {
        let t = self.scale.normalize(value, self.range.min, self.range.max);
        self.screen_start + t * (self.screen_end - self.screen_start)
    }

    pub fn to_data(&self, screen: f64) -> f64 {
        let length = self.screen_end - self.screen_start;
        if length.abs() < f64::EPSILON {
            return self.range.min;
        }
        let t = (screen - self.screen_start) / length;
        self.scale.denormalize(t, self.range.min, self.range.max)
    }
}

/// Data-to-screen transform for both axes of a plot area.
///
/// Screen y grows downward, so the y axis is inverted: `range.min` sits on
/// the bottom edge of the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTransform {
    pub x: AxisTransform,
    pub y: AxisTransform,
}

impl PlotTransform {
    pub fn new(
        x_range: AxisRange,
        y_range: AxisRange,
        x_scale: ScaleType,
        y_scale: ScaleType,
        area: &ClipRegion,
    ) -> Self {
        Self {
            x: AxisTransform::new(x_range, x_scale, area.min.x, area.max.x),
            y: AxisTransform::new(y_range, y_scale, area.max.y, area.min.y),
        }
    }

    /// Linear transform, the common case.
    pub fn linear(x_range: AxisRange, y_range: AxisRange, area: &ClipRegion) -> Self {
        Self::new(x_range, y_range, ScaleType::Linear, ScaleType::Linear, area)
    }

    pub fn to_screen(&self, data: DVec2) -> DVec2 {
        DVec2::new(self.x.to_screen(data.x), self.y.to_screen(data.y))
    }

    pub fn to_data(&self, screen: DVec2) -> DVec2 {
        DVec2::new(self.x.to_data(screen.x), self.y.to_data(screen.y))
    }
}
