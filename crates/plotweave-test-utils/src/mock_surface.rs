//! Mock implementation of DrawSurface for testing.

use glam::Vec2;
use parking_lot::Mutex;
use plotweave_geometry::{Color, DrawSurface, Fill, Path, PathCommand, Stroke};
use std::sync::Arc;

/// Records a draw call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    StrokePath {
        points: Vec<Vec2>,
        width: f32,
        color: Color,
    },
    FillPath {
        points: Vec<Vec2>,
        closed: bool,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    FillRect {
        position: Vec2,
        size: Vec2,
        color: Color,
    },
}

impl DrawCall {
    /// Points of a path call; the center or corner of a shape call.
    pub fn points(&self) -> Vec<Vec2> {
        match self {
            DrawCall::StrokePath { points, .. } | DrawCall::FillPath { points, .. } => points.clone(),
            DrawCall::FillCircle { center, .. } => vec![*center],
            DrawCall::FillRect { position, .. } => vec![*position],
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DrawCall::StrokePath { color, .. }
            | DrawCall::FillPath { color, .. }
            | DrawCall::FillCircle { color, .. }
            | DrawCall::FillRect { color, .. } => *color,
        }
    }
}

/// A drawing surface that records calls instead of painting.
///
/// Clones share the same call log, so a test can keep a handle while the
/// surface itself is mutably borrowed by a renderer or viewer.
#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    calls: Arc<Mutex<Vec<DrawCall>>>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn count_strokes(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::StrokePath { .. }))
    }

    pub fn count_fills(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::FillPath { .. }))
    }

    pub fn count_circles(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::FillCircle { .. }))
    }

    pub fn count_rects(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::FillRect { .. }))
    }

    /// Points of every stroked path, in call order.
    pub fn stroked_paths(&self) -> Vec<Vec<Vec2>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::StrokePath { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: DrawCall) {
        self.calls.lock().push(call);
    }
}

impl DrawSurface for MockSurface {
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        self.record(DrawCall::StrokePath {
            points: path.points().collect(),
            width: stroke.width,
            color: stroke.effective_color(),
        });
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill) {
        self.record(DrawCall::FillPath {
            points: path.points().collect(),
            closed: matches!(path.commands().last(), Some(PathCommand::Close)),
            color: fill.effective_color(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &Fill) {
        self.record(DrawCall::FillCircle {
            center,
            radius,
            color: fill.effective_color(),
        });
    }

    fn fill_rect(&mut self, position: Vec2, size: Vec2, fill: &Fill) {
        self.record(DrawCall::FillRect {
            position,
            size,
            color: fill.effective_color(),
        });
    }
}
