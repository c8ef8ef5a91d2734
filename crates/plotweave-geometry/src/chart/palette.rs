//! Color palettes for series and heatmaps.

use super::error::ChartError;
use crate::Color;
use std::str::FromStr;

/// Default series colors, assigned by z-order.
pub const SERIES_COLORS: [Color; 8] = [
    Color::rgb(0.122, 0.467, 0.706), // blue
    Color::rgb(1.000, 0.498, 0.055), // orange
    Color::rgb(0.173, 0.627, 0.173), // green
    Color::rgb(0.839, 0.153, 0.157), // red
    Color::rgb(0.580, 0.404, 0.741), // purple
    Color::rgb(0.549, 0.337, 0.294), // brown
    Color::rgb(0.890, 0.467, 0.761), // pink
    Color::rgb(0.090, 0.745, 0.812), // teal
];

/// Series color for a z-order slot.
pub fn series_color(z_order: u32) -> Color {
    SERIES_COLORS[z_order as usize % SERIES_COLORS.len()]
}

const VIRIDIS: [Color; 9] = [
    Color::rgb(0.267, 0.005, 0.329),
    Color::rgb(0.279, 0.175, 0.483),
    Color::rgb(0.230, 0.322, 0.546),
    Color::rgb(0.173, 0.449, 0.558),
    Color::rgb(0.128, 0.567, 0.551),
    Color::rgb(0.153, 0.683, 0.501),
    Color::rgb(0.360, 0.785, 0.388),
    Color::rgb(0.678, 0.864, 0.190),
    Color::rgb(0.993, 0.906, 0.144),
];

const MAGMA: [Color; 9] = [
    Color::rgb(0.001, 0.000, 0.014),
    Color::rgb(0.112, 0.065, 0.276),
    Color::rgb(0.316, 0.072, 0.485),
    Color::rgb(0.513, 0.148, 0.508),
    Color::rgb(0.716, 0.215, 0.475),
    Color::rgb(0.904, 0.314, 0.388),
    Color::rgb(0.986, 0.535, 0.382),
    Color::rgb(0.996, 0.765, 0.525),
    Color::rgb(0.987, 0.991, 0.750),
];

const GRAYS: [Color; 2] = [Color::rgb(0.0, 0.0, 0.0), Color::rgb(1.0, 1.0, 1.0)];

const COOLWARM: [Color; 5] = [
    Color::rgb(0.230, 0.299, 0.754),
    Color::rgb(0.552, 0.690, 0.996),
    Color::rgb(0.866, 0.866, 0.866),
    Color::rgb(0.958, 0.604, 0.482),
    Color::rgb(0.706, 0.016, 0.150),
];

/// Continuous palette used to color heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Viridis,
    Magma,
    Grays,
    Coolwarm,
}

impl Palette {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::Magma => "magma",
            Self::Grays => "grays",
            Self::Coolwarm => "coolwarm",
        }
    }

    fn stops(&self) -> &'static [Color] {
        match self {
            Self::Viridis => &VIRIDIS,
            Self::Magma => &MAGMA,
            Self::Grays => &GRAYS,
            Self::Coolwarm => &COOLWARM,
        }
    }

    /// Color at `t` in `0..=1` (clamped). NaN maps to transparent.
    pub fn sample(&self, t: f64) -> Color {
        if t.is_nan() {
            return Color::TRANSPARENT;
        }
        let stops = self.stops();
        let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let lo = scaled.floor() as usize;
        let hi = (lo + 1).min(stops.len() - 1);
        stops[lo].lerp(stops[hi], (scaled - lo as f64) as f32)
    }

    /// Color for `value` normalized over `min..=max`.
    pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Color {
        let span = max - min;
        let t = if span > 0.0 { (value - min) / span } else { 0.5 };
        self.sample(t)
    }
}

impl FromStr for Palette {
    type Err = ChartError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "viridis" => Ok(Self::Viridis),
            "magma" => Ok(Self::Magma),
            "grays" | "greys" | "gray" => Ok(Self::Grays),
            "coolwarm" => Ok(Self::Coolwarm),
            _ => Err(ChartError::UnknownPalette(name.to_string())),
        }
    }
}
