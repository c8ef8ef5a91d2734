use super::{PlotRenderer, TooltipQuery};
use crate::chart::clip::ClipRegion;
use crate::chart::definition::PlotDefinition;
use crate::chart::error::ChartError;
use crate::chart::scale::{DataBounds, PlotTransform};
use crate::{Color, DrawSurface, Fill, PathBuilder, Stroke};
use glam::{DVec2, Vec2};

const GLYPH_SIZE: f64 = 14.0;
const GLYPH_MARGIN: f64 = 6.0;
const WARNING: Color = Color::rgb(0.902, 0.494, 0.133);

/// Stand-in for a plot whose definition could not be drawn.
///
/// Shows a warning glyph in the top-left corner of the plot area (one slot
/// per failed plot) and reports the error message as its tooltip.
pub struct FallbackRenderer {
    message: String,
    slot: u32,
}

impl FallbackRenderer {
    pub fn new(message: impl Into<String>, slot: u32) -> Self {
        Self {
            message: message.into(),
            slot,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn glyph_origin(&self, area: &ClipRegion) -> DVec2 {
        area.min + DVec2::new(GLYPH_MARGIN + self.slot as f64 * (GLYPH_SIZE + GLYPH_MARGIN), GLYPH_MARGIN)
    }
}

impl PlotRenderer for FallbackRenderer {
    fn kind(&self) -> &'static str {
        "fallback"
    }

    fn draw(&mut self, _definition: &PlotDefinition) -> Result<(), ChartError> {
        Ok(())
    }

    fn compute_bounds(&self) -> Option<DataBounds> {
        None
    }

    fn render_core(&self, surface: &mut dyn DrawSurface, _transform: &PlotTransform, clip: &ClipRegion) {
        let origin = self.glyph_origin(clip).as_vec2();
        let size = GLYPH_SIZE as f32;

        let mut triangle = PathBuilder::with_capacity(4);
        triangle.polygon(&[
            origin + Vec2::new(size * 0.5, 0.0),
            origin + Vec2::new(size, size),
            origin + Vec2::new(0.0, size),
        ]);
        surface.stroke_path(&triangle.build(), &Stroke::solid(WARNING, 1.5));

        let bar = Vec2::new(size * 0.5 - 1.0, size * 0.3);
        surface.fill_rect(origin + bar, Vec2::new(2.0, size * 0.4), &Fill::solid(WARNING));
        surface.fill_rect(origin + Vec2::new(bar.x, size * 0.8), Vec2::splat(2.0), &Fill::solid(WARNING));
    }

    fn tooltip(&self, query: &TooltipQuery<'_>) -> Option<String> {
        let origin = self.glyph_origin(query.plot_area);
        let glyph = ClipRegion::new(origin, origin + DVec2::splat(GLYPH_SIZE));
        glyph.contains(query.screen).then(|| self.message.clone())
    }
}
