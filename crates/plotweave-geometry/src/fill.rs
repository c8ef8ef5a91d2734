//! Fill rules and fill options.

use crate::Color;

/// Fill rule for determining the interior of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// A point is inside if the winding number is non-zero.
    #[default]
    NonZero,
    /// A point is inside if the number of crossings is odd.
    EvenOdd,
}

/// How a closed path is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
    pub rule: FillRule,
    /// Opacity multiplier (0.0 to 1.0)
    pub opacity: f32,
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            rule: FillRule::NonZero,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Color with the opacity multiplier folded into alpha.
    pub fn effective_color(&self) -> Color {
        self.color.with_alpha(self.color.a * self.opacity)
    }
}

impl Default for Fill {
    fn default() -> Self {
        Self::solid(Color::BLACK)
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Self::solid(color)
    }
}
