//! Path tessellation using Lyon.
//!
//! Converts stroked and filled paths into colored triangle meshes ready for
//! GPU upload, and provides [`TessellatingSurface`], a [`DrawSurface`] that
//! accumulates one mesh per frame in draw order.

use crate::{
    Fill, FillRule, LineCap, LineJoin, Path, PathCommand, Stroke,
    surface::DrawSurface,
    vertex::{SurfaceVertex, TessellatedMesh},
};
use lyon::geom::{ArcFlags, SvgArc};
use lyon::lyon_tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex as LyonFillVertex, StrokeOptions,
    StrokeTessellator, StrokeVertex as LyonStrokeVertex, VertexBuffers,
};
use lyon::math::{Angle, Point, Vector, point};
use lyon::path::PathEvent;
use plotweave_core::profiling::profile_function;

/// Tessellator for converting paths to triangle meshes.
pub struct Tessellator {
    fill_tessellator: FillTessellator,
    stroke_tessellator: StrokeTessellator,
    /// Tolerance for curve flattening (smaller = more segments)
    pub tolerance: f32,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator {
    pub fn new() -> Self {
        Self::with_tolerance(0.25)
    }

    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            fill_tessellator: FillTessellator::new(),
            stroke_tessellator: StrokeTessellator::new(),
            tolerance,
        }
    }

    /// Tessellate the interior of a path.
    pub fn tessellate_fill(&mut self, path: &Path, fill: &Fill) -> TessellatedMesh<SurfaceVertex> {
        profile_function!();
        let mut buffers: VertexBuffers<SurfaceVertex, u32> = VertexBuffers::new();
        let color = fill.effective_color();

        let options = FillOptions::default()
            .with_tolerance(self.tolerance)
            .with_fill_rule(convert_fill_rule(fill.rule));

        let result = self.fill_tessellator.tessellate(
            path_to_events(path),
            &options,
            &mut BuffersBuilder::new(&mut buffers, move |vertex: LyonFillVertex| {
                SurfaceVertex::new(vertex.position().x, vertex.position().y, color)
            }),
        );

        if let Err(err) = result {
            tracing::warn!("Fill tessellation failed: {err:?}");
            return TessellatedMesh::new();
        }

        TessellatedMesh::from_data(buffers.vertices, buffers.indices)
    }

    /// Tessellate the outline of a path.
    pub fn tessellate_stroke(
        &mut self,
        path: &Path,
        stroke: &Stroke,
    ) -> TessellatedMesh<SurfaceVertex> {
        profile_function!();
        let mut buffers: VertexBuffers<SurfaceVertex, u32> = VertexBuffers::new();
        let color = stroke.effective_color();

        let options = StrokeOptions::default()
            .with_tolerance(self.tolerance)
            .with_line_width(stroke.width)
            .with_line_cap(convert_line_cap(stroke.line_cap))
            .with_line_join(convert_line_join(stroke.line_join))
            .with_miter_limit(stroke.miter_limit);

        let result = self.stroke_tessellator.tessellate(
            path_to_events(path),
            &options,
            &mut BuffersBuilder::new(&mut buffers, move |vertex: LyonStrokeVertex| {
                SurfaceVertex::new(vertex.position().x, vertex.position().y, color)
            }),
        );

        if let Err(err) = result {
            tracing::warn!("Stroke tessellation failed: {err:?}");
            return TessellatedMesh::new();
        }

        TessellatedMesh::from_data(buffers.vertices, buffers.indices)
    }
}

/// Convert a path to Lyon path events.
///
/// Lyon requires every `Begin` to have a matching `End`, so open sub-paths are
/// terminated explicitly. Arcs are flattened into quadratic segments.
fn path_to_events(path: &Path) -> Vec<PathEvent> {
    let mut events = Vec::with_capacity(path.len() + 1);
    let mut current = point(0.0, 0.0);
    let mut subpath_start = current;
    let mut in_subpath = false;

    for cmd in path.commands() {
        match cmd {
            PathCommand::MoveTo(to) => {
                if in_subpath {
                    events.push(PathEvent::End {
                        last: current,
                        first: subpath_start,
                        close: false,
                    });
                }

                current = point(to.x, to.y);
                subpath_start = current;
                events.push(PathEvent::Begin { at: current });
                in_subpath = true;
            }
            PathCommand::LineTo(to) => {
                let from = current;
                current = point(to.x, to.y);
                events.push(PathEvent::Line { from, to: current });
            }
            PathCommand::ArcTo {
                radii,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => {
                let from = current;
                let target: Point = point(to.x, to.y);
                current = target;

                let degenerate = radii.x.abs() <= f32::EPSILON
                    || radii.y.abs() <= f32::EPSILON
                    || from == target;
                if degenerate {
                    events.push(PathEvent::Line { from, to: target });
                    continue;
                }

                let arc = SvgArc {
                    from,
                    to: target,
                    radii: Vector::new(radii.x, radii.y),
                    x_rotation: Angle::radians(*x_rotation),
                    flags: ArcFlags {
                        large_arc: *large_arc,
                        sweep: *sweep,
                    },
                }
                .to_arc();

                arc.for_each_quadratic_bezier(&mut |segment| {
                    events.push(PathEvent::Quadratic {
                        from: segment.from,
                        ctrl: segment.ctrl,
                        to: segment.to,
                    });
                });
            }
            PathCommand::Close => {
                events.push(PathEvent::End {
                    last: current,
                    first: subpath_start,
                    close: true,
                });
                current = subpath_start;
                in_subpath = false;
            }
        }
    }

    if in_subpath {
        events.push(PathEvent::End {
            last: current,
            first: subpath_start,
            close: false,
        });
    }

    events
}

fn convert_fill_rule(rule: FillRule) -> lyon::lyon_tessellation::FillRule {
    match rule {
        FillRule::NonZero => lyon::lyon_tessellation::FillRule::NonZero,
        FillRule::EvenOdd => lyon::lyon_tessellation::FillRule::EvenOdd,
    }
}

fn convert_line_cap(cap: LineCap) -> lyon::lyon_tessellation::LineCap {
    match cap {
        LineCap::Butt => lyon::lyon_tessellation::LineCap::Butt,
        LineCap::Round => lyon::lyon_tessellation::LineCap::Round,
        LineCap::Square => lyon::lyon_tessellation::LineCap::Square,
    }
}

fn convert_line_join(join: LineJoin) -> lyon::lyon_tessellation::LineJoin {
    match join {
        LineJoin::Miter => lyon::lyon_tessellation::LineJoin::Miter,
        LineJoin::Round => lyon::lyon_tessellation::LineJoin::Round,
        LineJoin::Bevel => lyon::lyon_tessellation::LineJoin::Bevel,
    }
}

/// A [`DrawSurface`] that tessellates every draw call into one colored mesh.
///
/// The host takes the mesh once per frame with [`take_mesh`](Self::take_mesh)
/// and uploads it; triangles appear in draw order, so painter's ordering holds.
#[derive(Default)]
pub struct TessellatingSurface {
    tessellator: Tessellator,
    mesh: TessellatedMesh<SurfaceVertex>,
    draw_calls: usize,
}

impl TessellatingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            tessellator: Tessellator::with_tolerance(tolerance),
            ..Self::default()
        }
    }

    pub fn mesh(&self) -> &TessellatedMesh<SurfaceVertex> {
        &self.mesh
    }

    /// Number of visible draw calls received since the last take.
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// Take the accumulated mesh and start a fresh one.
    pub fn take_mesh(&mut self) -> TessellatedMesh<SurfaceVertex> {
        self.draw_calls = 0;
        std::mem::take(&mut self.mesh)
    }
}

impl DrawSurface for TessellatingSurface {
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        if !stroke.is_visible() || path.is_empty() {
            return;
        }
        self.draw_calls += 1;
        let mesh = self.tessellator.tessellate_stroke(path, stroke);
        self.mesh.append(mesh);
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill) {
        if fill.opacity <= 0.0 || path.is_empty() {
            return;
        }
        self.draw_calls += 1;
        let mesh = self.tessellator.tessellate_fill(path, fill);
        self.mesh.append(mesh);
    }
}
