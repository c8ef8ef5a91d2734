//! Declarative plot definitions as submitted by the host.
//!
//! A definition set maps plot ids to [`PlotDefinition`]s (or `null`, which
//! leaves the retained plot untouched). Definitions are plain serde types
//! with a camelCase JSON shape; `null` inside numeric arrays stands for a
//! missing sample and becomes NaN.

use super::error::{ChartError, DefinitionError};
use crate::Color;
use plotweave_core::alloc::{OrderedMap, ordered_map};
use plotweave_core::sync::{ChangeLog, SyncProps};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::Deref;

/// Submitted definitions keyed by plot id, in submission order.
/// `None` is the explicit "leave as is" marker.
pub type DefinitionSet = OrderedMap<String, Option<PlotDefinition>>;

/// Parse a JSON object of `id → definition | null`.
pub fn parse_definition_set(json: &str) -> Result<DefinitionSet, DefinitionError> {
    Ok(serde_json::from_str(json)?)
}

/// An empty [`DefinitionSet`].
pub fn definition_set() -> DefinitionSet {
    ordered_map()
}

/// Numeric samples; JSON `null` entries are read as NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Samples(pub Vec<f64>);

impl<'de> Deserialize<'de> for Samples {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(Samples(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()))
    }
}

impl Deref for Samples {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Samples {
    fn from(values: Vec<f64>) -> Self {
        Samples(values)
    }
}

impl SyncProps for Samples {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        self.0.sync_props(&source.0, log)
    }
}

/// Median series with 68% and 95% confidence bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, plotweave_core::SyncProps)]
#[serde(rename_all = "camelCase")]
pub struct UncertainSeries {
    #[serde(default)]
    pub median: Samples,
    #[serde(default)]
    pub lower68: Samples,
    #[serde(default)]
    pub upper68: Samples,
    #[serde(default)]
    pub lower95: Samples,
    #[serde(default)]
    pub upper95: Samples,
}

/// The `y` of a series: plain samples or an uncertain series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesValues {
    Plain(Samples),
    Uncertain(UncertainSeries),
}

impl SeriesValues {
    /// The central series: the samples themselves or the median.
    pub fn central(&self) -> &Samples {
        match self {
            Self::Plain(samples) => samples,
            Self::Uncertain(series) => &series.median,
        }
    }

    pub fn uncertain(&self) -> Option<&UncertainSeries> {
        match self {
            Self::Uncertain(series) => Some(series),
            Self::Plain(_) => None,
        }
    }
}

impl SyncProps for SeriesValues {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        match (self, source) {
            (Self::Plain(target), Self::Plain(source)) => target.sync_props(source, log),
            (Self::Uncertain(target), Self::Uncertain(source)) => target.sync_props(source, log),
            (target, source) => {
                *target = source.clone();
                log.record();
                true
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, plotweave_core::SyncProps)]
pub struct PlainGrid {
    pub v: Samples,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, plotweave_core::SyncProps)]
pub struct UncertainGrid {
    pub m: Samples,
    pub lb68: Samples,
    pub ub68: Samples,
}

/// Heatmap cell values: `{v}` or `{m, lb68, ub68}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridValues {
    Plain(PlainGrid),
    Uncertain(UncertainGrid),
}

impl SyncProps for GridValues {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        match (self, source) {
            (Self::Plain(target), Self::Plain(source)) => target.sync_props(source, log),
            (Self::Uncertain(target), Self::Uncertain(source)) => target.sync_props(source, log),
            (target, source) => {
                *target = source.clone();
                log.record();
                true
            }
        }
    }
}

/// Marker glyph. The box and whisker shapes apply to uncertain `y`; with a
/// plain `y` they are drawn as squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Circle,
    #[serde(alias = "box")]
    Square,
    Triangle,
    Diamond,
    Cross,
    /// 68% box with 95% whiskers and a median bar.
    BoxWhisker,
    /// 68% box with a median bar.
    BoxNoWhisker,
    /// 95% whiskers with a median bar.
    Whisker,
}

impl MarkerShape {
    pub fn is_uncertainty_glyph(&self) -> bool {
        matches!(self, Self::BoxWhisker | Self::BoxNoWhisker | Self::Whisker)
    }
}

/// How sample coordinates are interpreted.
///
/// Heatmaps use `continuous`/`discrete`; lines use `function`/`trajectory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatAs {
    /// Coordinates are cell centers of a continuous field.
    #[default]
    #[serde(alias = "gradient")]
    Continuous,
    /// Coordinates are categories; axes become cell boundaries.
    Discrete,
    /// `y` is a function of `x`; samples are drawn in `x` order.
    Function,
    /// Samples are drawn in the order given, so the line may turn back.
    Trajectory,
}

/// A marker attribute given once for every sample or once per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channel<T> {
    Uniform(T),
    PerSample(Samples),
}

impl<T: SyncProps + Clone> SyncProps for Channel<T> {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        match (self, source) {
            (Self::Uniform(target), Self::Uniform(source)) => target.sync_props(source, log),
            (Self::PerSample(target), Self::PerSample(source)) => target.sync_props(source, log),
            (target, source) => {
                *target = source.clone();
                log.record();
                true
            }
        }
    }
}

plotweave_core::sync_scalar!(MarkerShape, TreatAs);

/// One plot as described by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, plotweave_core::SyncProps)]
#[serde(rename_all = "camelCase")]
pub struct PlotDefinition {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub x: Samples,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<SeriesValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<GridValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Channel<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill68: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill95: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<MarkerShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Channel<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_as: Option<TreatAs>,
    /// Redraw counter kept by the reconciler; never merged or serialized.
    #[serde(skip)]
    #[sync(skip)]
    pub revision: u64,
}

impl PlotDefinition {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_x(mut self, x: Vec<f64>) -> Self {
        self.x = Samples(x);
        self
    }

    pub fn with_y(mut self, y: Vec<f64>) -> Self {
        self.y = Some(SeriesValues::Plain(Samples(y)));
        self
    }

    pub fn with_uncertain_y(mut self, series: UncertainSeries) -> Self {
        self.y = Some(SeriesValues::Uncertain(series));
        self
    }

    pub fn with_values(mut self, values: GridValues) -> Self {
        self.values = Some(values);
        self
    }

    pub fn with_stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = Some(color.into());
        self
    }

    /// Name shown in tooltips; falls back to the kind.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.kind)
    }

    /// Parse an optional color field, using `default` when it is absent.
    pub fn color_or(field: &Option<String>, default: Color) -> Result<Color, ChartError> {
        match field {
            Some(text) => Color::parse(text).ok_or_else(|| ChartError::InvalidColor(text.clone())),
            None => Ok(default),
        }
    }

    /// The `y` series, or an error naming the missing field.
    pub fn require_y(&self) -> Result<&SeriesValues, ChartError> {
        self.y.as_ref().ok_or(ChartError::MissingField("y"))
    }

    /// Number of samples every series must have: the length of `x`, or of
    /// the central `y` when `x` is left out.
    pub fn sample_count(&self) -> Option<usize> {
        if !self.x.is_empty() {
            Some(self.x.len())
        } else {
            self.y.as_ref().map(|y| y.central().len())
        }
    }

    /// Sample positions: `x`, or the indices `0..n` when `x` is left out.
    pub fn positions(&self, n: usize) -> Vec<f64> {
        if self.x.is_empty() {
            (0..n).map(|i| i as f64).collect()
        } else {
            self.x.to_vec()
        }
    }

    /// Draw order for a series that is a function of `x`.
    ///
    /// `None` keeps the submitted order: for trajectories and for positions
    /// that are already monotonic. Otherwise the indices sorted by position,
    /// with non-finite positions dropped.
    pub fn function_order(&self, x: &[f64]) -> Option<Vec<usize>> {
        if !matches!(self.treat_as, None | Some(TreatAs::Function)) || is_monotonic(x) {
            return None;
        }
        let mut order: Vec<usize> = (0..x.len()).filter(|&i| x[i].is_finite()).collect();
        order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
        Some(order)
    }

    /// Check that `series` has as many samples as the plot.
    pub fn check_length(&self, field: &'static str, series: &[f64]) -> Result<(), ChartError> {
        let expected = self.sample_count().unwrap_or(series.len());
        if series.len() == expected {
            Ok(())
        } else {
            Err(ChartError::SeriesLengthMismatch {
                field,
                expected,
                actual: series.len(),
            })
        }
    }
}

/// Whether the finite values never change direction.
pub fn is_monotonic(values: &[f64]) -> bool {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let Some(mut previous) = finite.next() else {
        return true;
    };
    let mut direction = 0.0;
    for value in finite {
        let step = value - previous;
        if step * direction < 0.0 {
            return false;
        }
        if step != 0.0 {
            direction = step;
        }
        previous = value;
    }
    true
}

/// `values` permuted by `order`, or copied as is without one.
/// Indices past the end read as NaN.
pub fn reorder(values: &[f64], order: Option<&[usize]>) -> Vec<f64> {
    match order {
        Some(order) => order
            .iter()
            .map(|&i| values.get(i).copied().unwrap_or(f64::NAN))
            .collect(),
        None => values.to_vec(),
    }
}
