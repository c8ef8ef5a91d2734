//! Path primitives handed to a [`DrawSurface`](crate::DrawSurface).
//!
//! Chart renderers only ever emit straight segments, circular arcs and closes,
//! so that is all a path can hold.

use glam::Vec2;

/// A command in a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new sub-path without drawing.
    MoveTo(Vec2),
    /// Straight segment to a position.
    LineTo(Vec2),
    /// SVG-style elliptical arc to a position.
    ArcTo {
        radii: Vec2,
        /// X-axis rotation in radians
        x_rotation: f32,
        large_arc: bool,
        /// Clockwise when true
        sweep: bool,
        to: Vec2,
    },
    /// Close the current sub-path back to its start.
    Close,
}

/// A 2D path in screen space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// End points of every segment, in order (arc interiors are not sampled).
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            PathCommand::MoveTo(to) | PathCommand::LineTo(to) | PathCommand::ArcTo { to, .. } => {
                Some(*to)
            }
            PathCommand::Close => None,
        })
    }

    /// Conservative bounding box as (min, max) corners.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        let mut current = Vec2::ZERO;

        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(to) | PathCommand::LineTo(to) => {
                    min = min.min(*to);
                    max = max.max(*to);
                    current = *to;
                }
                PathCommand::ArcTo { to, radii, .. } => {
                    min = min.min(*to).min(current - *radii);
                    max = max.max(*to).max(current + *radii);
                    current = *to;
                }
                PathCommand::Close => {}
            }
        }

        (min.is_finite() && max.is_finite()).then_some((min, max))
    }
}

/// Builder for constructing paths.
#[derive(Debug, Default)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
    current_pos: Vec2,
    subpath_start: Vec2,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with room for `capacity` commands.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn move_to(&mut self, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(to));
        self.current_pos = to;
        self.subpath_start = to;
        self
    }

    pub fn line_to(&mut self, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(to));
        self.current_pos = to;
        self
    }

    pub fn arc_to(
        &mut self,
        radii: Vec2,
        x_rotation: f32,
        large_arc: bool,
        sweep: bool,
        to: Vec2,
    ) -> &mut Self {
        self.commands.push(PathCommand::ArcTo {
            radii,
            x_rotation,
            large_arc,
            sweep,
            to,
        });
        self.current_pos = to;
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self.current_pos = self.subpath_start;
        self
    }

    /// Add an axis-aligned rectangle.
    pub fn rect(&mut self, position: Vec2, size: Vec2) -> &mut Self {
        self.move_to(position);
        self.line_to(position + Vec2::new(size.x, 0.0));
        self.line_to(position + size);
        self.line_to(position + Vec2::new(0.0, size.y));
        self.close()
    }

    /// Add a circle made of four quarter arcs.
    pub fn circle(&mut self, center: Vec2, radius: f32) -> &mut Self {
        let r = Vec2::splat(radius);

        self.move_to(center + Vec2::new(radius, 0.0));
        self.arc_to(r, 0.0, false, true, center + Vec2::new(0.0, radius));
        self.arc_to(r, 0.0, false, true, center + Vec2::new(-radius, 0.0));
        self.arc_to(r, 0.0, false, true, center + Vec2::new(0.0, -radius));
        self.arc_to(r, 0.0, false, true, center + Vec2::new(radius, 0.0));

        self.close()
    }

    /// Add a closed polygon. Empty input adds nothing.
    pub fn polygon(&mut self, points: &[Vec2]) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };

        self.move_to(*first);
        for point in rest {
            self.line_to(*point);
        }
        self.close()
    }

    pub fn current_pos(&self) -> Vec2 {
        self.current_pos
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands pushed so far.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn build(self) -> Path {
        Path {
            commands: self.commands,
        }
    }
}
