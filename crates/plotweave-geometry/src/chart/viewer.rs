//! The chart viewer: registry, reconciler and view state behind one frame loop.

use super::definition::{DefinitionSet, parse_definition_set};
use super::dirty::ChartDirtyFlags;
use super::error::DefinitionError;
use super::reconcile::{DefinitionReconciler, ReconcileReport, ReconciliationRecord};
use super::registry::RendererRegistry;
use super::renderers::TooltipQuery;
use super::scale::{AxisRange, DataBounds, ScaleType};
use super::scheduler::FrameScheduler;
use super::state::{ListenerId, ViewField, ViewState};
use super::ticks::{AxisTicks, scaled_axis_ticks};
use crate::DrawSurface;
use glam::DVec2;
use plotweave_core::config::ViewerConfig;
use plotweave_core::profiling::{self, profile_function, profile_scope};
use std::cell::Cell;
use std::rc::Rc;

/// Fraction of the data span added on each side by [`ChartViewer::fit_to_data`].
const FIT_PADDING: f64 = 0.05;

/// What one call to [`ChartViewer::render_frame`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Whether the surface was painted.
    pub rendered: bool,
    /// Flags that triggered this frame, including view changes made by auto-fit.
    pub dirty: ChartDirtyFlags,
    /// Report of the reconciliation run for this frame, if a submission was pending.
    pub report: Option<ReconcileReport>,
}

/// Renders submitted definition sets once per frame.
///
/// Submissions are queued and only the latest one is reconciled at the next
/// [`render_frame`](Self::render_frame). The surface is painted only when the
/// definitions or the view changed since the last frame.
pub struct ChartViewer {
    registry: RendererRegistry,
    reconciler: DefinitionReconciler,
    view: ViewState,
    dirty: Rc<Cell<ChartDirtyFlags>>,
    scheduler: FrameScheduler<DefinitionSet>,
    auto_fit: bool,
    view_listener: ListenerId,
}

impl ChartViewer {
    /// Create a viewer with the builtin plot kinds.
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_registry(config, RendererRegistry::with_builtin())
    }

    pub fn with_registry(config: ViewerConfig, registry: RendererRegistry) -> Self {
        let dirty = Rc::new(Cell::new(ChartDirtyFlags::empty()));
        let mut view = ViewState::new();

        let flags = dirty.clone();
        let view_listener = view.subscribe(move |change| {
            let flag = match change.field {
                ViewField::PlotArea => ChartDirtyFlags::BOUNDS_CHANGED,
                ViewField::Cursor => return,
                _ => ChartDirtyFlags::VIEW_CHANGED,
            };
            flags.set(flags.get() | flag);
        });

        Self {
            registry,
            reconciler: DefinitionReconciler::new(config),
            view,
            dirty,
            scheduler: FrameScheduler::new(),
            auto_fit: true,
            view_listener,
        }
    }

    /// Fit the axes to the data whenever the definitions change (on by default).
    pub fn set_auto_fit(&mut self, auto_fit: bool) {
        self.auto_fit = auto_fit;
    }

    pub fn config(&self) -> &ViewerConfig {
        self.reconciler.config()
    }

    pub fn registry_mut(&mut self) -> &mut RendererRegistry {
        &mut self.registry
    }

    pub fn reconciler(&self) -> &DefinitionReconciler {
        &self.reconciler
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Id of the listener the viewer keeps on its own view state.
    pub fn view_listener(&self) -> ListenerId {
        self.view_listener
    }

    pub fn dirty(&self) -> ChartDirtyFlags {
        self.dirty.get()
    }

    fn mark(&self, flags: ChartDirtyFlags) {
        self.dirty.set(self.dirty.get() | flags);
    }

    /// Queue a definition set for the next frame.
    ///
    /// Returns `true` if it replaced a submission that was still pending.
    pub fn submit(&mut self, definitions: DefinitionSet) -> bool {
        let superseded = self.scheduler.submit(definitions);
        if superseded {
            tracing::trace!(total = self.scheduler.superseded(), "superseded pending submission");
        }
        superseded
    }

    /// Parse and queue a JSON definition set.
    pub fn submit_json(&mut self, json: &str) -> Result<bool, DefinitionError> {
        let definitions = parse_definition_set(json)?;
        Ok(self.submit(definitions))
    }

    pub fn has_pending(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Reconcile the pending submission, if any, and paint if anything is dirty.
    pub fn render_frame(&mut self, surface: &mut dyn DrawSurface) -> FrameOutcome {
        profile_function!();

        let mut report = None;
        if let Some(definitions) = self.scheduler.take() {
            let pass = self.reconciler.reconcile(&self.registry, definitions);
            if pass.has_changes() {
                self.mark(ChartDirtyFlags::DEFINITIONS_CHANGED);
            }
            report = Some(pass);
        }

        if self.auto_fit && self.dirty.get().needs_bounds_update() {
            self.fit_to_data();
        }

        let dirty = self.dirty.replace(ChartDirtyFlags::empty());
        if !dirty.needs_render() {
            return FrameOutcome {
                rendered: false,
                dirty,
                report,
            };
        }

        {
            profile_scope!("paint");
            let transform = self.view.transform();
            let clip = self.view.plot_area();
            self.reconciler.render(surface, &transform, &clip);
        }
        profiling::new_frame();

        FrameOutcome {
            rendered: true,
            dirty,
            report,
        }
    }

    /// Union of the data extents of every plot.
    pub fn compute_bounds(&self) -> Option<DataBounds> {
        self.reconciler.compute_bounds()
    }

    /// Set both axis ranges to the data extents, padded on linear axes.
    ///
    /// Returns `false` (and leaves the view alone) when no plot has finite data.
    pub fn fit_to_data(&mut self) -> bool {
        let Some(bounds) = self.compute_bounds() else {
            return false;
        };
        if let Some(x) = fit_range(bounds.x, bounds.x_positive, self.view.x_scale()) {
            self.view.set_x_range(x);
        }
        if let Some(y) = fit_range(bounds.y, bounds.y_positive, self.view.y_scale()) {
            self.view.set_y_range(y);
        }
        true
    }

    pub fn x_ticks(&self) -> AxisTicks {
        scaled_axis_ticks(self.view.x_range(), self.view.x_scale(), self.config().tick_count)
    }

    pub fn y_ticks(&self) -> AxisTicks {
        scaled_axis_ticks(self.view.y_range(), self.view.y_scale(), self.config().tick_count)
    }

    /// Tooltip of the topmost plot under a screen position.
    pub fn tooltip_at(&self, screen: DVec2) -> Option<String> {
        let plot_area = self.view.plot_area();
        if !plot_area.contains(screen) {
            return None;
        }
        let transform = self.view.transform();
        let query = TooltipQuery {
            screen,
            data: transform.to_data(screen),
            radius_px: self.config().tooltip_radius as f64,
            transform: &transform,
            plot_area: &plot_area,
            x_format: self.x_ticks().format,
            y_format: self.y_ticks().format,
        };
        self.reconciler.tooltip(&query)
    }

    /// Tooltip at the view's cursor, if it has one.
    pub fn cursor_tooltip(&self) -> Option<String> {
        self.view.cursor().and_then(|cursor| self.tooltip_at(cursor))
    }

    /// `(id, message)` for every plot that failed to draw.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.reconciler.failures()
    }

    pub fn record(&self, id: &str) -> Option<&ReconciliationRecord> {
        self.reconciler.get(id)
    }
}

/// Range an axis is fitted to. Log axes only cover the positive data and are
/// not padded; with no positive data they keep their current range.
fn fit_range(range: AxisRange, positive: AxisRange, scale: ScaleType) -> Option<AxisRange> {
    match scale {
        ScaleType::Linear => Some(range.padded(FIT_PADDING)),
        ScaleType::Logarithmic { base } => {
            if positive.is_empty() {
                None
            } else if positive.span() > 0.0 {
                Some(positive)
            } else {
                Some(AxisRange::new(positive.min / base, positive.max * base))
            }
        }
    }
}
