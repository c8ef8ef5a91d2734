use super::{FactoryContext, PlotRenderer, TooltipQuery};
use crate::chart::clip::ClipRegion;
use crate::chart::definition::{PlotDefinition, reorder};
use crate::chart::error::ChartError;
use crate::chart::line::LineRenderer;
use crate::chart::palette::series_color;
use crate::chart::scale::{DataBounds, PlotTransform};
use crate::{Color, DrawSurface, Stroke};

const DEFAULT_THICKNESS: f64 = 1.5;

/// Polyline through `x` and `y` (or the median of an uncertain `y`).
///
/// Without `x` the samples sit at their indices. Unless the plot is a
/// trajectory, samples are drawn in `x` order.
pub struct LineSeriesRenderer {
    line: LineRenderer,
    default_color: Color,
    label: String,
    x: Vec<f64>,
    y: Vec<f64>,
    stroke: Stroke,
}

impl LineSeriesRenderer {
    pub fn new(ctx: &FactoryContext<'_>) -> Self {
        let default_color = series_color(ctx.z_order);
        Self {
            line: LineRenderer::from_config(ctx.config),
            default_color,
            label: String::new(),
            x: Vec::new(),
            y: Vec::new(),
            stroke: Stroke::solid(default_color, DEFAULT_THICKNESS as f32),
        }
    }

    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }
}

impl PlotRenderer for LineSeriesRenderer {
    fn kind(&self) -> &'static str {
        "line"
    }

    fn draw(&mut self, definition: &PlotDefinition) -> Result<(), ChartError> {
        let y = definition.require_y()?.central();
        definition.check_length("y", y)?;

        let color = PlotDefinition::color_or(&definition.stroke, self.default_color)?;
        let width = definition.thickness.unwrap_or(DEFAULT_THICKNESS).max(0.0) as f32;

        let x = definition.positions(y.len());
        let order = definition.function_order(&x);
        self.stroke = Stroke::solid(color, width);
        self.label = definition.label().to_string();
        self.x = reorder(&x, order.as_deref());
        self.y = reorder(y, order.as_deref());
        Ok(())
    }

    fn compute_bounds(&self) -> Option<DataBounds> {
        DataBounds::from_xy(&self.x, &self.y)
    }

    fn render_core(&self, surface: &mut dyn DrawSurface, transform: &PlotTransform, clip: &ClipRegion) {
        self.line
            .render_line(&self.x, &self.y, |p| transform.to_screen(p), clip, &self.stroke, surface);
    }

    fn tooltip(&self, query: &TooltipQuery<'_>) -> Option<String> {
        let i = query.nearest(&self.x, &self.y)?;
        Some(format!("{}: {}", self.label, query.format_point(self.x[i], self.y[i])))
    }
}
