use super::{FactoryContext, PlotRenderer, TooltipQuery};
use crate::chart::clip::ClipRegion;
use crate::chart::definition::{PlotDefinition, reorder};
use crate::chart::error::ChartError;
use crate::chart::line::LineRenderer;
use crate::chart::palette::series_color;
use crate::chart::scale::{DataBounds, PlotTransform};
use crate::{Color, DrawSurface};

/// One confidence interval: bounds and fill color.
struct Interval {
    lower: Vec<f64>,
    upper: Vec<f64>,
    color: Color,
}

impl Interval {
    fn empty(color: Color) -> Self {
        Self {
            lower: Vec::new(),
            upper: Vec::new(),
            color,
        }
    }

    fn is_empty(&self) -> bool {
        self.lower.is_empty() && self.upper.is_empty()
    }

    fn reorder(&mut self, order: Option<&[usize]>) {
        if !self.is_empty() {
            self.lower = reorder(&self.lower, order);
            self.upper = reorder(&self.upper, order);
        }
    }
}

/// Confidence fills of an uncertain series: the 95% band under the 68% band.
///
/// The median line is a separate [`LineSeriesRenderer`](super::LineSeriesRenderer)
/// drawn after this one.
pub struct BandRenderer {
    line: LineRenderer,
    default_color: Color,
    /// A plain `y` is an error rather than a series without fills.
    require_bands: bool,
    x: Vec<f64>,
    band68: Interval,
    band95: Interval,
}

impl BandRenderer {
    /// Fills for a `band` plot, which must have an uncertain `y`.
    pub fn new(ctx: &FactoryContext<'_>) -> Self {
        let default_color = series_color(ctx.z_order);
        Self {
            line: LineRenderer::from_config(ctx.config),
            default_color,
            require_bands: true,
            x: Vec::new(),
            band68: Interval::empty(default_color.with_alpha(0.6)),
            band95: Interval::empty(default_color.with_alpha(0.3)),
        }
    }

    /// Fills under a `line` plot; draws nothing while `y` is plain.
    pub fn optional(ctx: &FactoryContext<'_>) -> Self {
        Self {
            require_bands: false,
            ..Self::new(ctx)
        }
    }

    fn clear(&mut self) {
        self.x.clear();
        self.band68 = Interval::empty(self.band68.color);
        self.band95 = Interval::empty(self.band95.color);
    }
}

fn checked_interval(
    definition: &PlotDefinition,
    (lower_field, lower): (&'static str, &[f64]),
    (upper_field, upper): (&'static str, &[f64]),
    color: Color,
) -> Result<Interval, ChartError> {
    // An interval may be left out entirely, but not half of it.
    if lower.is_empty() && upper.is_empty() {
        return Ok(Interval::empty(color));
    }
    definition.check_length(lower_field, lower)?;
    definition.check_length(upper_field, upper)?;
    Ok(Interval {
        lower: lower.to_vec(),
        upper: upper.to_vec(),
        color,
    })
}

impl PlotRenderer for BandRenderer {
    fn kind(&self) -> &'static str {
        "band"
    }

    fn draw(&mut self, definition: &PlotDefinition) -> Result<(), ChartError> {
        let Some(series) = definition.require_y()?.uncertain() else {
            if self.require_bands {
                return Err(ChartError::InvalidShape {
                    field: "y",
                    reason: "band plots need {median, lower68, upper68, lower95, upper95}".to_string(),
                });
            }
            self.clear();
            return Ok(());
        };

        let fill68 = PlotDefinition::color_or(&definition.fill68, self.default_color.with_alpha(0.6))?;
        let fill95 = PlotDefinition::color_or(&definition.fill95, self.default_color.with_alpha(0.3))?;

        let mut band68 = checked_interval(
            definition,
            ("lower68", &*series.lower68),
            ("upper68", &*series.upper68),
            fill68,
        )?;
        let mut band95 = checked_interval(
            definition,
            ("lower95", &*series.lower95),
            ("upper95", &*series.upper95),
            fill95,
        )?;

        let x = definition.positions(definition.sample_count().unwrap_or_default());
        let order = definition.function_order(&x);
        band68.reorder(order.as_deref());
        band95.reorder(order.as_deref());
        self.x = reorder(&x, order.as_deref());
        self.band68 = band68;
        self.band95 = band95;
        Ok(())
    }

    fn compute_bounds(&self) -> Option<DataBounds> {
        [&self.band95, &self.band68]
            .into_iter()
            .filter(|band| !band.is_empty())
            .flat_map(|band| {
                [
                    DataBounds::from_xy(&self.x, &band.lower),
                    DataBounds::from_xy(&self.x, &band.upper),
                ]
            })
            .flatten()
            .reduce(|a, b| a.union(&b))
    }

    fn render_core(&self, surface: &mut dyn DrawSurface, transform: &PlotTransform, clip: &ClipRegion) {
        for band in [&self.band95, &self.band68] {
            if band.is_empty() {
                continue;
            }
            self.line.render_area(
                &self.x,
                &band.upper,
                &band.lower,
                band.color,
                |p| transform.to_screen(p),
                clip,
                surface,
            );
        }
    }

    fn tooltip(&self, query: &TooltipQuery<'_>) -> Option<String> {
        if self.band68.is_empty() {
            return None;
        }

        // Hit when the cursor is inside the 68% band at the nearest sample column.
        let (i, _) = self
            .x
            .iter()
            .enumerate()
            .filter(|(_, x)| x.is_finite())
            .map(|(i, &x)| (i, (query.transform.x.to_screen(x) - query.screen.x).abs()))
            .filter(|&(_, dx)| dx <= query.radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let (lo, hi) = (self.band68.lower[i], self.band68.upper[i]);
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        if !(query.data.y >= lo && query.data.y <= hi) {
            return None;
        }

        let mut text = format!(
            "68%: [{}, {}]",
            query.y_format.format_with_exponent(lo),
            query.y_format.format_with_exponent(hi)
        );
        if !self.band95.is_empty() {
            text.push_str(&format!(
                "\n95%: [{}, {}]",
                query.y_format.format_with_exponent(self.band95.lower[i]),
                query.y_format.format_with_exponent(self.band95.upper[i])
            ));
        }
        Some(text)
    }
}
