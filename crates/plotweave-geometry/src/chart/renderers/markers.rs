use super::{FactoryContext, PlotRenderer, TooltipQuery};
use crate::chart::clip::ClipRegion;
use crate::chart::definition::{Channel, MarkerShape, PlotDefinition, UncertainSeries};
use crate::chart::error::ChartError;
use crate::chart::palette::{Palette, series_color};
use crate::chart::scale::{AxisRange, DataBounds, PlotTransform};
use crate::{Color, DrawSurface, Fill, PathBuilder, Stroke};
use glam::{DVec2, Vec2};

const DEFAULT_SIZE: f64 = 8.0;

/// Pixel sizes that per-sample `size` values are mapped onto.
const SIZE_RANGE: (f32, f32) = (5.0, 50.0);

/// Palette for per-sample colors when the definition names none.
const DEFAULT_MARKER_PALETTE: Palette = Palette::Grays;

/// Confidence bounds drawn by box and whisker glyphs. Empty vectors are
/// bounds that were left out.
#[derive(Default)]
struct Spread {
    lower68: Vec<f64>,
    upper68: Vec<f64>,
    lower95: Vec<f64>,
    upper95: Vec<f64>,
}

impl Spread {
    fn from_series(definition: &PlotDefinition, series: &UncertainSeries) -> Result<Self, ChartError> {
        let checked = |field: &'static str, values: &[f64]| -> Result<Vec<f64>, ChartError> {
            if !values.is_empty() {
                definition.check_length(field, values)?;
            }
            Ok(values.to_vec())
        };
        Ok(Self {
            lower68: checked("lower68", &series.lower68)?,
            upper68: checked("upper68", &series.upper68)?,
            lower95: checked("lower95", &series.lower95)?,
            upper95: checked("upper95", &series.upper95)?,
        })
    }

    fn interval(lower: &[f64], upper: &[f64], i: usize) -> Option<(f64, f64)> {
        let (lo, hi) = (*lower.get(i)?, *upper.get(i)?);
        (lo.is_finite() && hi.is_finite()).then(|| (lo.min(hi), lo.max(hi)))
    }

    fn band68(&self, i: usize) -> Option<(f64, f64)> {
        Self::interval(&self.lower68, &self.upper68, i)
    }

    fn band95(&self, i: usize) -> Option<(f64, f64)> {
        Self::interval(&self.lower95, &self.upper95, i)
    }

    fn bounds(&self, x: &[f64]) -> Option<DataBounds> {
        [&self.lower68, &self.upper68, &self.lower95, &self.upper95]
            .into_iter()
            .filter_map(|values| DataBounds::from_xy(x, values))
            .reduce(|a, b| a.union(&b))
    }
}

/// Value range a per-sample channel is normalized over. A constant channel
/// is widened by half a unit on both sides.
fn channel_range(values: &[f64]) -> Option<AxisRange> {
    let range: AxisRange = values.iter().copied().collect();
    if range.is_empty() {
        None
    } else if range.span() == 0.0 {
        Some(AxisRange::new(range.min - 0.5, range.max + 0.5))
    } else {
        Some(range)
    }
}

/// A marker glyph at every finite `(x, y)` sample.
///
/// `color` and `size` are either one value for every marker or one value per
/// sample; per-sample colors go through the plot's palette and per-sample
/// sizes are scaled onto a fixed pixel range. An uncertain `y` is drawn with
/// box and whisker glyphs.
pub struct MarkersRenderer {
    default_color: Color,
    label: String,
    x: Vec<f64>,
    y: Vec<f64>,
    spread: Option<Spread>,
    shape: MarkerShape,
    colors: Vec<Color>,
    sizes: Vec<f32>,
}

impl MarkersRenderer {
    pub fn new(ctx: &FactoryContext<'_>) -> Self {
        Self {
            default_color: series_color(ctx.z_order),
            label: String::new(),
            x: Vec::new(),
            y: Vec::new(),
            spread: None,
            shape: MarkerShape::default(),
            colors: Vec::new(),
            sizes: Vec::new(),
        }
    }

    fn resolve_colors(&self, definition: &PlotDefinition, n: usize) -> Result<Vec<Color>, ChartError> {
        match &definition.color {
            Some(Channel::PerSample(values)) => {
                definition.check_length("color", values)?;
                let palette = match &definition.palette {
                    Some(name) => name.parse()?,
                    None => DEFAULT_MARKER_PALETTE,
                };
                let range = channel_range(values);
                Ok(values
                    .iter()
                    .map(|&v| match range {
                        Some(range) => palette.sample_range(v, range.min, range.max),
                        None => Color::TRANSPARENT,
                    })
                    .collect())
            }
            Some(Channel::Uniform(text)) => {
                let color = Color::parse(text).ok_or_else(|| ChartError::InvalidColor(text.clone()))?;
                Ok(vec![color; n])
            }
            None => Ok(vec![PlotDefinition::color_or(&definition.stroke, self.default_color)?; n]),
        }
    }

    fn resolve_sizes(definition: &PlotDefinition, n: usize) -> Result<Vec<f32>, ChartError> {
        match &definition.size {
            Some(Channel::PerSample(values)) => {
                definition.check_length("size", values)?;
                let (lo, hi) = SIZE_RANGE;
                let range: AxisRange = values.iter().copied().collect();
                Ok(values
                    .iter()
                    .map(|&v| {
                        if !v.is_finite() {
                            f32::NAN
                        } else if range.span() > 0.0 {
                            lo + ((v - range.min) / range.span()) as f32 * (hi - lo)
                        } else {
                            lo
                        }
                    })
                    .collect())
            }
            Some(Channel::Uniform(size)) => Ok(vec![size.max(0.0) as f32; n]),
            None => Ok(vec![DEFAULT_SIZE as f32; n]),
        }
    }

    fn draw_marker(&self, surface: &mut dyn DrawSurface, center: Vec2, size: f32, color: Color) {
        let half = size * 0.5;
        let fill = Fill::solid(color);
        match self.shape {
            MarkerShape::Circle => surface.fill_circle(center, half, &fill),
            MarkerShape::Triangle => {
                let mut builder = PathBuilder::with_capacity(4);
                builder.polygon(&[
                    center + Vec2::new(0.0, -half),
                    center + Vec2::new(half, half),
                    center + Vec2::new(-half, half),
                ]);
                surface.fill_path(&builder.build(), &fill);
            }
            MarkerShape::Diamond => {
                let mut builder = PathBuilder::with_capacity(5);
                builder.polygon(&[
                    center + Vec2::new(0.0, -half),
                    center + Vec2::new(half, 0.0),
                    center + Vec2::new(0.0, half),
                    center + Vec2::new(-half, 0.0),
                ]);
                surface.fill_path(&builder.build(), &fill);
            }
            MarkerShape::Cross => {
                let mut builder = PathBuilder::with_capacity(4);
                builder
                    .move_to(center + Vec2::new(-half, -half))
                    .line_to(center + Vec2::new(half, half))
                    .move_to(center + Vec2::new(-half, half))
                    .line_to(center + Vec2::new(half, -half));
                let width = (size / 4.0).max(1.0);
                surface.stroke_path(&builder.build(), &Stroke::solid(color, width));
            }
            // Uncertainty glyphs only reach here for a plain `y`.
            MarkerShape::Square | MarkerShape::BoxWhisker | MarkerShape::BoxNoWhisker | MarkerShape::Whisker => {
                surface.fill_rect(center - Vec2::splat(half), Vec2::splat(size), &fill)
            }
        }
    }

    /// Box and whisker glyph for sample `i`, in screen space.
    fn draw_spread(
        &self,
        surface: &mut dyn DrawSurface,
        spread: &Spread,
        i: usize,
        transform: &PlotTransform,
        size: f32,
        color: Color,
    ) {
        let sx = transform.x.to_screen(self.x[i]);
        let to_y = |value: f64| transform.y.to_screen(value) as f32;
        let half = size * 0.5;
        let stroke = Stroke::solid(color, 1.0);

        let whiskers = matches!(self.shape, MarkerShape::BoxWhisker | MarkerShape::Whisker);
        let boxed = matches!(self.shape, MarkerShape::BoxWhisker | MarkerShape::BoxNoWhisker);
        let cx = sx as f32;

        if whiskers && let Some((lo, hi)) = spread.band95(i) {
            let (top, bottom) = (to_y(hi), to_y(lo));
            let cap = half * 0.5;
            let mut builder = PathBuilder::with_capacity(6);
            builder
                .move_to(Vec2::new(cx, top))
                .line_to(Vec2::new(cx, bottom))
                .move_to(Vec2::new(cx - cap, top))
                .line_to(Vec2::new(cx + cap, top))
                .move_to(Vec2::new(cx - cap, bottom))
                .line_to(Vec2::new(cx + cap, bottom));
            surface.stroke_path(&builder.build(), &stroke);
        }

        if boxed && let Some((lo, hi)) = spread.band68(i) {
            let (top, bottom) = (to_y(hi).min(to_y(lo)), to_y(hi).max(to_y(lo)));
            let position = Vec2::new(cx - half, top);
            let extent = Vec2::new(size, bottom - top);
            surface.fill_rect(position, extent, &Fill::solid(color.with_alpha(color.a * 0.5)));
            let mut outline = PathBuilder::with_capacity(5);
            outline.rect(position, extent);
            surface.stroke_path(&outline.build(), &stroke);
        }

        let median = to_y(self.y[i]);
        if median.is_finite() {
            let mut bar = PathBuilder::with_capacity(2);
            bar.move_to(Vec2::new(cx - half, median)).line_to(Vec2::new(cx + half, median));
            surface.stroke_path(&bar.build(), &Stroke::solid(color, 2.0));
        }
    }
}

impl PlotRenderer for MarkersRenderer {
    fn kind(&self) -> &'static str {
        "markers"
    }

    fn draw(&mut self, definition: &PlotDefinition) -> Result<(), ChartError> {
        let series = definition.require_y()?;
        let y = series.central();
        definition.check_length("y", y)?;

        let spread = series
            .uncertain()
            .map(|uncertain| Spread::from_series(definition, uncertain))
            .transpose()?;
        let shape = definition.shape.unwrap_or_default();
        self.shape = match (&spread, shape.is_uncertainty_glyph()) {
            (Some(_), true) | (None, false) => shape,
            (Some(_), false) => MarkerShape::BoxWhisker,
            (None, true) => MarkerShape::Square,
        };

        self.colors = self.resolve_colors(definition, y.len())?;
        self.sizes = Self::resolve_sizes(definition, y.len())?;
        self.spread = spread;
        self.label = definition.label().to_string();
        self.x = definition.positions(y.len());
        self.y = y.to_vec();
        Ok(())
    }

    fn compute_bounds(&self) -> Option<DataBounds> {
        let points = DataBounds::from_xy(&self.x, &self.y);
        let spread = self.spread.as_ref().and_then(|spread| spread.bounds(&self.x));
        match (points, spread) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    fn render_core(&self, surface: &mut dyn DrawSurface, transform: &PlotTransform, clip: &ClipRegion) {
        for (i, (&x, &y)) in self.x.iter().zip(&self.y).enumerate() {
            let center = transform.to_screen(DVec2::new(x, y));
            let size = self.sizes.get(i).copied().unwrap_or(DEFAULT_SIZE as f32);
            let color = self.colors.get(i).copied().unwrap_or(self.default_color);
            if !clip.contains(center) || !(size > 0.0) {
                continue;
            }
            match &self.spread {
                Some(spread) => self.draw_spread(surface, spread, i, transform, size, color),
                None => self.draw_marker(surface, center.as_vec2(), size, color),
            }
        }
    }

    fn tooltip(&self, query: &TooltipQuery<'_>) -> Option<String> {
        let i = query.nearest(&self.x, &self.y)?;
        let mut text = format!("{}: {}", self.label, query.format_point(self.x[i], self.y[i]));
        if let Some(spread) = &self.spread {
            for (name, interval) in [("68%", spread.band68(i)), ("95%", spread.band95(i))] {
                if let Some((lo, hi)) = interval {
                    text.push_str(&format!(
                        "\n{name}: [{}, {}]",
                        query.y_format.format_with_exponent(lo),
                        query.y_format.format_with_exponent(hi)
                    ));
                }
            }
        }
        Some(text)
    }
}
