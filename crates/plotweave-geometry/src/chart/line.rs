//! Viewport-clipped polylines and confidence-band polygons.
//!
//! [`LineRenderer::render_line`] walks the samples with a two-state machine:
//! NaN samples end the current run, so lines never bridge a gap, and a run
//! with a single visible sample (or whose samples all coalesce) is drawn as
//! a dot. Every segment is clipped against the viewport in `f64` before
//! anything reaches the surface.

use super::clip::ClipRegion;
use crate::{Color, DrawSurface, Fill, PathBuilder, Stroke};
use glam::DVec2;
use plotweave_core::config::ViewerConfig;
use plotweave_core::profiling::profile_function;

/// Counters from one render call, for tracing and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Stroked paths handed to the surface.
    pub paths: usize,
    /// Dots drawn for single-sample runs.
    pub dots: usize,
    /// Points emitted into paths after coalescing.
    pub points: usize,
    /// Segments with no visible part.
    pub rejected_segments: usize,
    /// Filled band polygons.
    pub polygons: usize,
    /// Band runs skipped because they miss the viewport.
    pub culled_runs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    SeekingStart,
    Stroking,
}

/// Accumulates one run's path, coalescing points closer than the tolerance.
struct Polyline {
    builder: PathBuilder,
    tolerance: f64,
    /// Where the pen is; `None` after the line left the viewport.
    pen: Option<DVec2>,
    /// Start of a sub-path that has no segment yet, so nothing is in the path.
    anchor: Option<DVec2>,
    last_emitted: Option<DVec2>,
    /// A coalesced point still owed to the path if the run stops here.
    pending: Option<DVec2>,
    points: usize,
    segments: usize,
}

impl Polyline {
    fn new(tolerance: f64) -> Self {
        Self {
            builder: PathBuilder::new(),
            tolerance,
            pen: None,
            anchor: None,
            last_emitted: None,
            pending: None,
            points: 0,
            segments: 0,
        }
    }

    fn emit_move(&mut self, point: DVec2) {
        self.flush_pending();
        self.anchor = Some(point);
        self.last_emitted = Some(point);
        self.pen = Some(point);
    }

    fn emit_line(&mut self, point: DVec2) {
        let close_to_last = self.last_emitted.is_some_and(|last| {
            (point.x - last.x).abs() < self.tolerance && (point.y - last.y).abs() < self.tolerance
        });

        if close_to_last {
            self.pending = Some(point);
        } else {
            self.push_segment(point);
            self.pending = None;
        }
        self.pen = Some(point);
    }

    fn push_segment(&mut self, point: DVec2) {
        if let Some(start) = self.anchor.take() {
            self.builder.move_to(start.as_vec2());
            self.points += 1;
        }
        self.builder.line_to(point.as_vec2());
        self.last_emitted = Some(point);
        self.points += 1;
        self.segments += 1;
    }

    /// Lift the pen; the next visible segment starts a new sub-path.
    fn lift(&mut self) {
        self.flush_pending();
        self.anchor = None;
        self.pen = None;
    }

    /// Extend the current sub-path to its true end point.
    ///
    /// A sub-path whose points all coalesced has no segment and stays empty.
    fn flush_pending(&mut self) {
        if let Some(point) = self.pending.take()
            && self.anchor.is_none()
            && self.last_emitted != Some(point)
        {
            self.push_segment(point);
        }
    }
}

/// Draws polylines and filled bands for chart series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRenderer {
    /// Screen points closer than this on both axes are merged.
    pub coalesce_tolerance: f64,
    /// Radius of the dot drawn for a single visible sample.
    pub dot_radius: f32,
    /// Alpha multiplier applied to band fills.
    pub area_alpha: f32,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl LineRenderer {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            coalesce_tolerance: config.coalesce_tolerance as f64,
            dot_radius: config.dot_radius,
            area_alpha: config.area_alpha,
        }
    }

    /// Stroke `y` against `x`, splitting at NaN samples and clipping to `viewport`.
    pub fn render_line<F>(
        &self,
        x: &[f64],
        y: &[f64],
        to_screen: F,
        viewport: &ClipRegion,
        stroke: &Stroke,
        surface: &mut dyn DrawSurface,
    ) -> LineStats
    where
        F: Fn(DVec2) -> DVec2,
    {
        profile_function!();

        let mut stats = LineStats::default();
        let mut state = RunState::SeekingStart;
        let mut polyline = Polyline::new(self.coalesce_tolerance);
        let mut previous = DVec2::ZERO;
        let mut run_start = DVec2::ZERO;
        let mut run_len = 0usize;

        let n = x.len().min(y.len());
        for i in 0..n {
            let screen = to_screen(DVec2::new(x[i], y[i]));
            // Log scales map non-positive data to NaN; infinities cannot be clipped.
            let missing = !screen.is_finite();

            match (state, missing) {
                (RunState::SeekingStart, true) => {}
                (RunState::Stroking, true) => {
                    self.finish_run(&mut polyline, run_start, run_len, viewport, stroke, surface, &mut stats);
                    state = RunState::SeekingStart;
                }
                (RunState::SeekingStart, false) => {
                    run_start = screen;
                    run_len = 1;
                    state = RunState::Stroking;
                }
                (RunState::Stroking, false) => {
                    run_len += 1;
                    match viewport.clip_segment(previous, screen) {
                        Some((a, b)) => {
                            if polyline.pen != Some(a) {
                                polyline.emit_move(a);
                            }
                            polyline.emit_line(b);
                            if b != screen {
                                polyline.lift();
                            }
                        }
                        None => {
                            stats.rejected_segments += 1;
                            polyline.lift();
                        }
                    }
                }
            }
            previous = screen;
        }

        if state == RunState::Stroking {
            self.finish_run(&mut polyline, run_start, run_len, viewport, stroke, surface, &mut stats);
        }

        tracing::trace!(?stats, "line rendered");
        stats
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_run(
        &self,
        polyline: &mut Polyline,
        run_start: DVec2,
        run_len: usize,
        viewport: &ClipRegion,
        stroke: &Stroke,
        surface: &mut dyn DrawSurface,
        stats: &mut LineStats,
    ) {
        let mut done = std::mem::replace(polyline, Polyline::new(self.coalesce_tolerance));
        done.flush_pending();

        // One sample, or samples that all coalesced into one pixel: no segment exists.
        if run_len == 1 || done.segments == 0 {
            if viewport.contains(run_start) {
                surface.fill_circle(run_start.as_vec2(), self.dot_radius, &Fill::solid(stroke.color));
                stats.dots += 1;
            }
            return;
        }

        stats.points += done.points;
        stats.paths += 1;
        surface.stroke_path(&done.builder.build(), stroke);
    }

    /// Fill the band between `y1` and `y2`, one polygon per NaN-free run.
    ///
    /// The fill uses `fill_color` with its alpha scaled by `area_alpha`.
    /// Runs whose screen bounding box misses the viewport are skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn render_area<F>(
        &self,
        x: &[f64],
        y1: &[f64],
        y2: &[f64],
        fill_color: Color,
        to_screen: F,
        viewport: &ClipRegion,
        surface: &mut dyn DrawSurface,
    ) -> LineStats
    where
        F: Fn(DVec2) -> DVec2,
    {
        profile_function!();

        let mut stats = LineStats::default();
        let fill = Fill::solid(fill_color.with_alpha(fill_color.a * self.area_alpha));
        let n = x.len().min(y1.len()).min(y2.len());

        let upper: Vec<DVec2> = (0..n).map(|i| to_screen(DVec2::new(x[i], y1[i]))).collect();
        let lower: Vec<DVec2> = (0..n).map(|i| to_screen(DVec2::new(x[i], y2[i]))).collect();
        let valid = |i: usize| upper[i].is_finite() && lower[i].is_finite();

        let mut start = 0;
        while start < n {
            if !valid(start) {
                start += 1;
                continue;
            }
            let mut end = start;
            while end < n && valid(end) {
                end += 1;
            }

            let run = start..end;
            start = end;
            if run.len() < 2 {
                continue;
            }

            let (mut min, mut max) = (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY));
            for point in upper[run.clone()].iter().chain(&lower[run.clone()]) {
                min = min.min(*point);
                max = max.max(*point);
            }
            if !viewport.intersects(min, max) {
                stats.culled_runs += 1;
                continue;
            }

            let polygon: Vec<_> = upper[run.clone()]
                .iter()
                .chain(lower[run].iter().rev())
                .map(|point| point.as_vec2())
                .collect();
            let mut builder = PathBuilder::with_capacity(polygon.len() + 1);
            builder.polygon(&polygon);
            surface.fill_path(&builder.build(), &fill);
            stats.polygons += 1;
        }

        tracing::trace!(?stats, "area rendered");
        stats
    }
}
