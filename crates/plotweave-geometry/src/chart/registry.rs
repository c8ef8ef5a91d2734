//! Maps plot kinds to renderer factories.

use super::definition::PlotDefinition;
use super::error::ChartError;
use super::renderers::{
    BandRenderer, FactoryContext, HeatmapRenderer, LineSeriesRenderer, MarkersRenderer,
    PlotRenderer,
};
use plotweave_core::alloc::HashMap;

/// Renderers for one definition, in draw order.
pub type RendererSet = Vec<Box<dyn PlotRenderer>>;

/// Builds the renderers for a definition of one kind.
pub type RendererFactory = Box<dyn Fn(&FactoryContext<'_>) -> Result<RendererSet, ChartError>>;

/// Kind tag → renderer factory.
///
/// Each viewer owns its registry, so hosts can add kinds without touching
/// global state.
#[derive(Default)]
pub struct RendererRegistry {
    factories: HashMap<String, RendererFactory>,
}

impl RendererRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in `line`, `band`, `heatmap` and `markers` kinds.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        // Fills first so the median line sits on top. A `line` always carries
        // a fill renderer; it stays idle while `y` is plain.
        registry.register("line", |ctx| {
            Ok(vec![
                Box::new(BandRenderer::optional(ctx)) as Box<dyn PlotRenderer>,
                Box::new(LineSeriesRenderer::new(ctx)),
            ])
        });
        registry.register("band", |ctx| {
            Ok(vec![
                Box::new(BandRenderer::new(ctx)) as Box<dyn PlotRenderer>,
                Box::new(LineSeriesRenderer::new(ctx)),
            ])
        });
        registry.register("heatmap", |ctx| Ok(vec![Box::new(HeatmapRenderer::new(ctx)) as Box<dyn PlotRenderer>]));
        registry.register("markers", |ctx| Ok(vec![Box::new(MarkersRenderer::new(ctx)) as Box<dyn PlotRenderer>]));
        registry
    }

    /// Register (or replace) the factory for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&FactoryContext<'_>) -> Result<RendererSet, ChartError> + 'static,
    {
        let kind = kind.into();
        if self.factories.insert(kind.clone(), Box::new(factory)).is_some() {
            tracing::debug!(kind = %kind, "replaced renderer factory");
        }
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Create the renderers for `definition` (not yet drawn).
    pub fn create(
        &self,
        definition: &PlotDefinition,
        ctx: &FactoryContext<'_>,
    ) -> Result<RendererSet, ChartError> {
        let factory = self
            .factories
            .get(&definition.kind)
            .ok_or_else(|| ChartError::UnknownKind(definition.kind.clone()))?;
        factory(ctx)
    }
}
