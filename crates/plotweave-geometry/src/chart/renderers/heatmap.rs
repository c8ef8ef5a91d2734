use super::{FactoryContext, PlotRenderer, TooltipQuery};
use crate::chart::clip::ClipRegion;
use crate::chart::definition::{GridValues, PlotDefinition, TreatAs};
use crate::chart::error::ChartError;
use crate::chart::format::{NumericFormat, NumericFormatter};
use crate::chart::grid::{Grid, GridBuilder, GridSamples};
use crate::chart::palette::Palette;
use crate::chart::scale::{DataBounds, PlotTransform};
use crate::{DrawSurface, Fill};
use glam::{DVec2, Vec2};
use plotweave_core::profiling::profile_scope;

/// Colored cells of a [`Grid`] built from sparse samples.
pub struct HeatmapRenderer {
    palette: Palette,
    label: String,
    grid: Grid,
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    value_range: Option<(f64, f64)>,
}

impl HeatmapRenderer {
    pub fn new(_ctx: &FactoryContext<'_>) -> Self {
        Self {
            palette: Palette::default(),
            label: String::new(),
            grid: Grid::empty(),
            x_edges: Vec::new(),
            y_edges: Vec::new(),
            value_range: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell index along an axis whose edges are `edges`.
    fn locate(edges: &[f64], value: f64) -> Option<usize> {
        if edges.len() < 2 {
            return None;
        }
        let (first, last) = (edges[0], edges[edges.len() - 1]);
        if !(value >= first && value <= last) {
            return None;
        }
        let upper = edges.partition_point(|&edge| edge <= value);
        Some(upper.saturating_sub(1).min(edges.len() - 2))
    }
}

impl PlotRenderer for HeatmapRenderer {
    fn kind(&self) -> &'static str {
        "heatmap"
    }

    fn draw(&mut self, definition: &PlotDefinition) -> Result<(), ChartError> {
        let values = definition
            .values
            .as_ref()
            .ok_or(ChartError::MissingField("values"))?;
        let y = definition.require_y()?.central();

        self.palette = match &definition.palette {
            Some(name) => name.parse()?,
            None => Palette::default(),
        };

        let samples = match values {
            GridValues::Plain(plain) => GridSamples::Plain { v: &plain.v },
            GridValues::Uncertain(grid) => GridSamples::Uncertain {
                m: &grid.m,
                lb68: &grid.lb68,
                ub68: &grid.ub68,
            },
        };
        let discrete = definition.treat_as == Some(TreatAs::Discrete);

        self.grid = GridBuilder::new().discrete(discrete).build(&definition.x, y, samples);
        self.x_edges = self.grid.x_edges();
        self.y_edges = self.grid.y_edges();
        self.value_range = self.grid.value_range();
        self.label = definition.label().to_string();
        Ok(())
    }

    fn compute_bounds(&self) -> Option<DataBounds> {
        DataBounds::from_axes(&self.x_edges, &self.y_edges)
    }

    fn render_core(&self, surface: &mut dyn DrawSurface, transform: &PlotTransform, clip: &ClipRegion) {
        profile_scope!("heatmap_cells");
        let Some((min, max)) = self.value_range else {
            return;
        };

        for ((xi, yi), &value) in self.grid.values.indexed_iter() {
            if !value.is_finite() {
                continue;
            }
            let a = transform.to_screen(DVec2::new(self.x_edges[xi], self.y_edges[yi]));
            let b = transform.to_screen(DVec2::new(self.x_edges[xi + 1], self.y_edges[yi + 1]));
            let (lo, hi) = (a.min(b), a.max(b));
            if !lo.is_finite() || !hi.is_finite() || !clip.intersects(lo, hi) {
                continue;
            }

            // Clamp to the viewport so huge cells stay within f32 range.
            let lo = lo.max(clip.min);
            let hi = hi.min(clip.max);
            let color = self.palette.sample_range(value, min, max);
            surface.fill_rect(lo.as_vec2(), (hi - lo).as_vec2().max(Vec2::ZERO), &Fill::solid(color));
        }
    }

    fn tooltip(&self, query: &TooltipQuery<'_>) -> Option<String> {
        let xi = Self::locate(&self.x_edges, query.data.x)?;
        let yi = Self::locate(&self.y_edges, query.data.y)?;
        let value = self.grid.value(xi, yi)?;
        if value.is_nan() {
            return None;
        }

        let format = self
            .value_range
            .map(|(min, max)| NumericFormatter::format(min, max, (max - min) / 4.0))
            .unwrap_or(NumericFormat::Identity);

        let mut text = format!("{}: {}", self.label, format.format_with_exponent(value));
        if let (Some(lower), Some(upper)) = (&self.grid.lower, &self.grid.upper)
            && let (Some(&lo), Some(&hi)) = (lower.get([xi, yi]), upper.get([xi, yi]))
        {
            text.push_str(&format!(
                " [{}, {}]",
                format.format_with_exponent(lo),
                format.format_with_exponent(hi)
            ));
        }
        Some(text)
    }
}
