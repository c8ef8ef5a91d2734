//! Screen-space clip regions and Cohen–Sutherland segment clipping.
//!
//! Clipping runs in `f64`: extreme data maps far outside the viewport, and
//! clipping before narrowing to `f32` keeps raster coordinates sane.

use glam::DVec2;

bitflags::bitflags! {
    /// Which boundaries of a [`ClipRegion`] a point violates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Outcode: u8 {
        /// x < min.x
        const LEFT = 0b0001;
        /// x > max.x
        const RIGHT = 0b0010;
        /// y < min.y
        const BELOW = 0b0100;
        /// y > max.y
        const ABOVE = 0b1000;
    }
}

/// Axis-aligned screen rectangle of the current render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRegion {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for ClipRegion {
    fn default() -> Self {
        Self::from_origin_size(0.0, 0.0, 640.0, 480.0)
    }
}

impl ClipRegion {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(DVec2::new(x, y), DVec2::new(x + width, y + height))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Shrink by `padding` on every side, never past zero size.
    pub fn inset(&self, padding: f64) -> Self {
        let center = (self.min + self.max) * 0.5;
        let half = (self.size() * 0.5 - DVec2::splat(padding)).max(DVec2::ZERO);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, point: DVec2) -> bool {
        self.outcode(point).is_empty() && !point.is_nan()
    }

    /// Whether the box spanned by `min..max` overlaps this region.
    pub fn intersects(&self, min: DVec2, max: DVec2) -> bool {
        min.x <= self.max.x && max.x >= self.min.x && min.y <= self.max.y && max.y >= self.min.y
    }

    pub fn outcode(&self, point: DVec2) -> Outcode {
        let mut code = Outcode::empty();
        if point.x < self.min.x {
            code |= Outcode::LEFT;
        } else if point.x > self.max.x {
            code |= Outcode::RIGHT;
        }
        if point.y < self.min.y {
            code |= Outcode::BELOW;
        } else if point.y > self.max.y {
            code |= Outcode::ABOVE;
        }
        code
    }

    /// Clip the segment `a..b` to this region.
    ///
    /// Returns the visible part, or `None` when nothing of the segment is
    /// inside. Endpoints that were already inside are returned unchanged.
    pub fn clip_segment(&self, a: DVec2, b: DVec2) -> Option<(DVec2, DVec2)> {
        let (mut p0, mut p1) = (a, b);
        let (mut c0, mut c1) = (self.outcode(p0), self.outcode(p1));

        // Every pass moves one endpoint onto a boundary and clears that bit,
        // so four passes per endpoint is a hard ceiling.
        for _ in 0..8 {
            if (c0 | c1).is_empty() {
                return Some((p0, p1));
            }
            if c0.intersects(c1) {
                return None;
            }

            let outside = if c0.is_empty() { c1 } else { c0 };
            let delta = p1 - p0;
            let point = if outside.contains(Outcode::ABOVE) {
                DVec2::new(p0.x + delta.x * (self.max.y - p0.y) / delta.y, self.max.y)
            } else if outside.contains(Outcode::BELOW) {
                DVec2::new(p0.x + delta.x * (self.min.y - p0.y) / delta.y, self.min.y)
            } else if outside.contains(Outcode::RIGHT) {
                DVec2::new(self.max.x, p0.y + delta.y * (self.max.x - p0.x) / delta.x)
            } else {
                DVec2::new(self.min.x, p0.y + delta.y * (self.min.x - p0.x) / delta.x)
            };

            if !point.is_finite() {
                return None;
            }

            if outside == c0 {
                p0 = point;
                c0 = self.outcode(p0);
            } else {
                p1 = point;
                c1 = self.outcode(p1);
            }
        }

        None
    }
}
