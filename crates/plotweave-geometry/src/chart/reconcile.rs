//! Incremental reconciliation of definition sets against retained renderers.
//!
//! [`DefinitionReconciler`] owns one [`ReconciliationRecord`] per plot id.
//! Every submission is diffed against them:
//!
//! - a new id is built through the registry and drawn;
//! - a `null` value leaves the record untouched;
//! - a definition of the same kind is merged in place with
//!   [`SyncProps`] and redrawn on the existing renderers only if the merge
//!   changed something;
//! - a definition of a different kind replaces the record's renderers;
//! - ids missing from the submission are handled by the [`RemovalPolicy`].
//!
//! Any draw error releases the record's renderers and substitutes a
//! [`FallbackRenderer`] that carries the message.

use super::clip::ClipRegion;
use super::definition::{DefinitionSet, PlotDefinition};
use super::error::ChartError;
use super::registry::{RendererRegistry, RendererSet};
use super::renderers::{FactoryContext, FallbackRenderer, PlotRenderer, TooltipQuery};
use super::scale::{DataBounds, PlotTransform};
use crate::DrawSurface;
use plotweave_core::alloc::{Handle, HandleArena, OrderedMap, ordered_map};
use plotweave_core::config::{RemovalPolicy, ViewerConfig};
use plotweave_core::profiling::profile_function;
use plotweave_core::sync::{ChangeLog, SyncProps};

/// Whether a record's renderers drew successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Ready,
    /// Drawing failed; a fallback renderer shows the message.
    Failed(String),
}

/// Retained state for one plot id.
#[derive(Debug)]
pub struct ReconciliationRecord {
    pub id: String,
    pub definition: PlotDefinition,
    /// Renderer handles in draw order.
    pub handles: Vec<Handle>,
    /// Stacking order among plots; higher draws later.
    pub z_order: u32,
    pub status: RecordStatus,
}

impl ReconciliationRecord {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, RecordStatus::Failed(_))
    }
}

/// What one reconciliation did, by plot id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    /// Merged in place and redrawn.
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    /// Renderers replaced (kind change or recovery from a failure).
    pub rebuilt: Vec<String>,
    pub removed: Vec<String>,
    /// Explicit `null` entries.
    pub skipped: Vec<String>,
    /// Ids whose renderers failed during this pass.
    pub failed: Vec<String>,
}

impl ReconcileReport {
    /// Whether anything visible changed.
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty()
            && self.updated.is_empty()
            && self.rebuilt.is_empty()
            && self.removed.is_empty())
    }
}

/// Diffs submitted definition sets against retained renderer state.
pub struct DefinitionReconciler {
    config: ViewerConfig,
    records: OrderedMap<String, ReconciliationRecord>,
    renderers: HandleArena<Box<dyn PlotRenderer>>,
    next_z: u32,
}

impl DefinitionReconciler {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            records: ordered_map(),
            renderers: HandleArena::new(),
            next_z: 0,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn set_removal_policy(&mut self, policy: RemovalPolicy) {
        self.config.removal_policy = policy;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ReconciliationRecord> {
        self.records.get(id)
    }

    /// Records in submission order.
    pub fn records(&self) -> impl Iterator<Item = &ReconciliationRecord> {
        self.records.values()
    }

    /// Number of live renderers across all records.
    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    pub fn renderer(&self, handle: Handle) -> Option<&dyn PlotRenderer> {
        self.renderers.get(handle).map(|renderer| renderer.as_ref())
    }

    /// `(id, message)` for every failed record.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.records
            .values()
            .filter_map(|record| match &record.status {
                RecordStatus::Failed(message) => Some((record.id.as_str(), message.as_str())),
                RecordStatus::Ready => None,
            })
            .collect()
    }

    /// Reconcile retained state against a submitted definition set.
    pub fn reconcile(&mut self, registry: &RendererRegistry, definitions: DefinitionSet) -> ReconcileReport {
        profile_function!();
        let mut report = ReconcileReport::default();

        if self.config.removal_policy == RemovalPolicy::RemoveAbsent {
            let absent: Vec<String> = self
                .records
                .keys()
                .filter(|id| !definitions.contains_key(*id))
                .cloned()
                .collect();
            for id in absent {
                if let Some(record) = self.records.shift_remove(&id) {
                    self.release(&record.handles);
                    tracing::debug!(id = %id, "removed plot");
                    report.removed.push(id);
                }
            }
        }

        for (id, definition) in definitions {
            let Some(definition) = definition else {
                report.skipped.push(id);
                continue;
            };

            let existing = self.records.get(&id).map(|record| {
                (record.definition.kind == definition.kind, record.is_failed(), record.z_order)
            });

            match existing {
                None => {
                    let z_order = self.take_z();
                    let record = self.build(registry, id.clone(), definition, z_order);
                    tracing::debug!(id = %id, kind = %record.definition.kind, z_order, "added plot");
                    if record.is_failed() {
                        report.failed.push(id.clone());
                    }
                    self.records.insert(id.clone(), record);
                    report.added.push(id);
                }
                Some((false, _, _)) => {
                    let z_order = self.take_z();
                    self.replace(registry, &id, definition, z_order, &mut report);
                    tracing::debug!(id = %id, "kind changed, rebuilt plot");
                }
                Some((true, true, z_order)) => {
                    if self.merge(&id, &definition) {
                        self.replace(registry, &id, definition, z_order, &mut report);
                        tracing::debug!(id = %id, "rebuilt failed plot");
                    } else {
                        report.unchanged.push(id);
                    }
                }
                Some((true, false, _)) => {
                    if self.merge(&id, &definition) {
                        self.redraw(&id, &mut report);
                    } else {
                        report.unchanged.push(id);
                    }
                }
            }
        }

        tracing::trace!(?report, "reconciled");
        report
    }

    fn take_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Merge `definition` into the retained one; true if anything changed.
    fn merge(&mut self, id: &str, definition: &PlotDefinition) -> bool {
        let Some(record) = self.records.get_mut(id) else {
            return false;
        };
        let mut log = ChangeLog::new();
        let changed = record.definition.sync_props(definition, &mut log);
        if changed {
            tracing::debug!(id, fields = ?log.changed(), "definition changed");
        }
        changed
    }

    /// Redraw a merged record on its existing renderers.
    fn redraw(&mut self, id: &str, report: &mut ReconcileReport) {
        let Some(record) = self.records.get_mut(id) else {
            return;
        };
        record.definition.revision += 1;

        let mut failure = None;
        for handle in &record.handles {
            if let Some(renderer) = self.renderers.get_mut(*handle)
                && let Err(err) = renderer.draw(&record.definition)
            {
                failure = Some(err);
                break;
            }
        }

        match failure {
            None => report.updated.push(id.to_string()),
            Some(err) => {
                let handles = std::mem::take(&mut record.handles);
                self.release(&handles);
                let (handles, status) = self.fallback(id, &err);
                if let Some(record) = self.records.get_mut(id) {
                    record.handles = handles;
                    record.status = status;
                }
                report.failed.push(id.to_string());
                report.updated.push(id.to_string());
            }
        }
    }

    /// Release a record's renderers and build fresh ones for `definition`.
    fn replace(
        &mut self,
        registry: &RendererRegistry,
        id: &str,
        definition: PlotDefinition,
        z_order: u32,
        report: &mut ReconcileReport,
    ) {
        if let Some(record) = self.records.get_mut(id) {
            let handles = std::mem::take(&mut record.handles);
            self.release(&handles);
        }
        // The merged definition is the one to build from when it exists.
        let definition = match self.records.get(id) {
            Some(record) if record.definition.kind == definition.kind => record.definition.clone(),
            _ => definition,
        };

        let record = self.build(registry, id.to_string(), definition, z_order);
        if record.is_failed() {
            report.failed.push(id.to_string());
        }
        self.records.insert(id.to_string(), record);
        report.rebuilt.push(id.to_string());
    }

    fn build(
        &mut self,
        registry: &RendererRegistry,
        id: String,
        definition: PlotDefinition,
        z_order: u32,
    ) -> ReconciliationRecord {
        let ctx = FactoryContext {
            config: &self.config,
            z_order,
        };

        let (handles, status) = match Self::create_drawn(registry, &definition, &ctx) {
            Ok(renderers) => (
                renderers.into_iter().map(|renderer| self.renderers.insert(renderer)).collect(),
                RecordStatus::Ready,
            ),
            Err(err) => self.fallback(&id, &err),
        };

        ReconciliationRecord {
            id,
            definition,
            handles,
            z_order,
            status,
        }
    }

    fn create_drawn(
        registry: &RendererRegistry,
        definition: &PlotDefinition,
        ctx: &FactoryContext<'_>,
    ) -> Result<RendererSet, ChartError> {
        let mut renderers = registry.create(definition, ctx)?;
        if let Some(err) = renderers.iter_mut().find_map(|renderer| renderer.draw(definition).err()) {
            for renderer in &mut renderers {
                renderer.dispose();
            }
            return Err(err);
        }
        Ok(renderers)
    }

    fn fallback(&mut self, id: &str, err: &ChartError) -> (Vec<Handle>, RecordStatus) {
        let message = err.to_string();
        tracing::warn!(id, error = %message, "plot failed to draw, showing fallback");
        let slot = self.failed_slot(id);
        let handle = self
            .renderers
            .insert(Box::new(FallbackRenderer::new(message.clone(), slot)));
        (vec![handle], RecordStatus::Failed(message))
    }

    /// Glyph slot for a failed plot: its position among failed records.
    fn failed_slot(&self, id: &str) -> u32 {
        self.records
            .values()
            .filter(|record| record.is_failed() && record.id != id)
            .count() as u32
    }

    fn release(&mut self, handles: &[Handle]) {
        for handle in handles {
            if let Some(mut renderer) = self.renderers.remove(*handle) {
                renderer.dispose();
            }
        }
    }

    /// Remove every record and release all renderers.
    pub fn clear(&mut self) {
        let records = std::mem::replace(&mut self.records, ordered_map());
        for record in records.values() {
            self.release(&record.handles);
        }
    }

    fn by_z_order(&self) -> Vec<&ReconciliationRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by_key(|record| record.z_order);
        records
    }

    /// Render every plot in z-order.
    pub fn render(&self, surface: &mut dyn DrawSurface, transform: &PlotTransform, clip: &ClipRegion) {
        profile_function!();
        for record in self.by_z_order() {
            for handle in &record.handles {
                if let Some(renderer) = self.renderers.get(*handle) {
                    renderer.render_core(surface, transform, clip);
                }
            }
        }
    }

    /// Union of every renderer's data bounds.
    pub fn compute_bounds(&self) -> Option<DataBounds> {
        self.renderers
            .iter()
            .filter_map(|(_, renderer)| renderer.compute_bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Tooltip of the topmost renderer hit by the query.
    pub fn tooltip(&self, query: &TooltipQuery<'_>) -> Option<String> {
        self.by_z_order().into_iter().rev().find_map(|record| {
            record
                .handles
                .iter()
                .rev()
                .filter_map(|handle| self.renderers.get(*handle))
                .find_map(|renderer| renderer.tooltip(query))
        })
    }
}

impl Drop for DefinitionReconciler {
    fn drop(&mut self) {
        self.clear();
    }
}
