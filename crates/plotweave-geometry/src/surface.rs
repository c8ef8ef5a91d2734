//! The drawing target chart renderers paint onto.

use crate::{Fill, Path, PathBuilder, Stroke};
use glam::Vec2;

/// A 2D drawing target in screen space (y grows downward).
///
/// Implementations decide what a draw call becomes: triangles for the GPU
/// ([`TessellatingSurface`](crate::TessellatingSurface)), recorded calls in
/// tests, or anything else the host renders with.
pub trait DrawSurface {
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);

    fn fill_path(&mut self, path: &Path, fill: &Fill);

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &Fill) {
        let mut builder = PathBuilder::new();
        builder.circle(center, radius);
        self.fill_path(&builder.build(), fill);
    }

    fn fill_rect(&mut self, position: Vec2, size: Vec2, fill: &Fill) {
        let mut builder = PathBuilder::new();
        builder.rect(position, size);
        self.fill_path(&builder.build(), fill);
    }
}
