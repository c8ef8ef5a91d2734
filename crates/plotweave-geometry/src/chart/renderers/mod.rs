//! Per-kind plot renderers.
//!
//! Each plot kind implements [`PlotRenderer`]. A definition may need more than
//! one renderer (a band plot is its fills plus its median line); the
//! [`RendererRegistry`](super::RendererRegistry) factory returns them in draw
//! order.

mod band;
mod fallback;
mod heatmap;
mod line;
mod markers;

pub use band::BandRenderer;
pub use fallback::FallbackRenderer;
pub use heatmap::HeatmapRenderer;
pub use line::LineSeriesRenderer;
pub use markers::MarkersRenderer;

use super::clip::ClipRegion;
use super::definition::PlotDefinition;
use super::error::ChartError;
use super::format::NumericFormat;
use super::scale::{DataBounds, PlotTransform};
use crate::DrawSurface;
use glam::DVec2;
use plotweave_core::config::ViewerConfig;

/// A hover query resolved against every plot.
#[derive(Debug, Clone, Copy)]
pub struct TooltipQuery<'a> {
    /// Cursor in screen space.
    pub screen: DVec2,
    /// Cursor in data space.
    pub data: DVec2,
    /// Hit radius in pixels.
    pub radius_px: f64,
    pub transform: &'a PlotTransform,
    pub plot_area: &'a ClipRegion,
    /// Formats for the visible x and y ranges.
    pub x_format: NumericFormat,
    pub y_format: NumericFormat,
}

impl TooltipQuery<'_> {
    /// Screen distance from the cursor to a data point.
    pub fn screen_distance(&self, data: DVec2) -> f64 {
        self.transform.to_screen(data).distance(self.screen)
    }

    /// `(x, y)` formatted with the query's formats.
    pub fn format_point(&self, x: f64, y: f64) -> String {
        format!(
            "({}, {})",
            self.x_format.format_with_exponent(x),
            self.y_format.format_with_exponent(y)
        )
    }

    /// Index of the finite sample nearest to the cursor within the hit radius.
    pub fn nearest(&self, x: &[f64], y: &[f64]) -> Option<usize> {
        x.iter()
            .zip(y)
            .enumerate()
            .filter(|(_, (xv, yv))| xv.is_finite() && yv.is_finite())
            .map(|(i, (&xv, &yv))| (i, self.screen_distance(DVec2::new(xv, yv))))
            .filter(|&(_, distance)| distance <= self.radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

/// What a renderer factory gets to know about the plot it builds for.
#[derive(Debug, Clone, Copy)]
pub struct FactoryContext<'a> {
    pub config: &'a ViewerConfig,
    /// Stacking slot of the plot; also picks its default series color.
    pub z_order: u32,
}

/// Draws one aspect of a plot definition.
pub trait PlotRenderer {
    /// Short name for logging.
    fn kind(&self) -> &'static str;

    /// Rebuild internal state from `definition`.
    ///
    /// Called once after creation and again whenever a merge changed the
    /// definition. On error the renderer is discarded.
    fn draw(&mut self, definition: &PlotDefinition) -> Result<(), ChartError>;

    /// Data extents this renderer covers, if it has any finite data.
    fn compute_bounds(&self) -> Option<DataBounds>;

    /// Paint onto `surface` for the current view.
    fn render_core(&self, surface: &mut dyn DrawSurface, transform: &PlotTransform, clip: &ClipRegion);

    /// Tooltip text for a hover query, if this renderer was hit.
    fn tooltip(&self, query: &TooltipQuery<'_>) -> Option<String>;

    /// Release anything held outside the renderer itself.
    fn dispose(&mut self) {}
}
