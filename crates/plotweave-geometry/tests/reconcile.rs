//! Definition reconciliation tests.

use plotweave_core::config::{RemovalPolicy, ViewerConfig};
use plotweave_geometry::DrawSurface;
use plotweave_geometry::chart::{
    ChartError, ClipRegion, DataBounds, DefinitionReconciler, DefinitionSet, PlotDefinition, PlotRenderer,
    PlotTransform, RecordStatus, RendererRegistry, TooltipQuery, UncertainSeries, definition_set,
    parse_definition_set,
};
use plotweave_test_utils::{DrawCall, MockSurface};
use std::cell::Cell;
use std::rc::Rc;

fn line(y: Vec<f64>) -> PlotDefinition {
    let x = (0..y.len()).map(|i| i as f64).collect();
    PlotDefinition::new("line").with_x(x).with_y(y)
}

fn set(entries: Vec<(&str, Option<PlotDefinition>)>) -> DefinitionSet {
    let mut defs = definition_set();
    for (id, def) in entries {
        defs.insert(id.to_string(), def);
    }
    defs
}

fn setup() -> (RendererRegistry, DefinitionReconciler) {
    (RendererRegistry::with_builtin(), DefinitionReconciler::new(ViewerConfig::default()))
}

// ====================
// Add / Update / No-op
// ====================

#[test]
fn test_add_builds_records_in_submission_order() {
    let (registry, mut reconciler) = setup();
    let report = reconciler.reconcile(
        &registry,
        set(vec![("b", Some(line(vec![1.0, 2.0]))), ("a", Some(line(vec![3.0, 4.0])))]),
    );

    assert_eq!(report.added, vec!["b".to_string(), "a".to_string()]);
    assert!(report.has_changes());
    let z: Vec<_> = reconciler.records().map(|r| (r.id.as_str(), r.z_order)).collect();
    assert_eq!(z, vec![("b", 0), ("a", 1)]);
    // Every line carries a fill renderer ahead of its stroke.
    assert_eq!(reconciler.renderer_count(), 4);
}

#[test]
fn test_identical_submission_is_noop() {
    let (registry, mut reconciler) = setup();
    let defs = set(vec![("temp", Some(line(vec![1.0, 2.0, 3.0]).with_stroke("#ff0000")))]);

    reconciler.reconcile(&registry, defs.clone());
    let handles = reconciler.get("temp").unwrap().handles.clone();

    let report = reconciler.reconcile(&registry, defs.clone());
    assert!(!report.has_changes());
    assert_eq!(report.unchanged, vec!["temp".to_string()]);

    let record = reconciler.get("temp").unwrap();
    assert_eq!(record.handles, handles);
    assert_eq!(record.definition.revision, 0);
    assert_eq!(Some(&record.definition), defs["temp"].as_ref());
}

#[test]
fn test_changed_definition_redraws_in_place() {
    let (registry, mut reconciler) = setup();
    reconciler.reconcile(&registry, set(vec![("temp", Some(line(vec![1.0, 2.0])))]));
    let handles = reconciler.get("temp").unwrap().handles.clone();

    let report = reconciler.reconcile(&registry, set(vec![("temp", Some(line(vec![1.0, 5.0])))]));

    assert_eq!(report.updated, vec!["temp".to_string()]);
    let record = reconciler.get("temp").unwrap();
    assert_eq!(record.handles, handles, "existing renderers are reused");
    assert_eq!(record.definition.revision, 1);
    let bounds = reconciler.compute_bounds().unwrap();
    assert_eq!(bounds.y.max, 5.0);
}

#[test]
fn test_null_entry_leaves_record_untouched() {
    let (registry, mut reconciler) = setup();
    reconciler.reconcile(&registry, set(vec![("temp", Some(line(vec![1.0, 2.0])))]));

    let report = reconciler.reconcile(&registry, parse_definition_set(r#"{ "temp": null }"#).unwrap());

    assert_eq!(report.skipped, vec!["temp".to_string()]);
    assert!(report.removed.is_empty());
    assert_eq!(reconciler.len(), 1);
    assert_eq!(reconciler.get("temp").unwrap().status, RecordStatus::Ready);
}

// ====================
// Rebuild / Remove
// ====================

#[test]
fn test_kind_change_releases_old_renderers() {
    let (registry, mut reconciler) = setup();
    reconciler.reconcile(&registry, set(vec![("temp", Some(line(vec![1.0, 2.0])))]));
    let old = reconciler.get("temp").unwrap().handles[0];

    let mut markers = line(vec![1.0, 2.0]);
    markers.kind = "markers".to_string();
    let report = reconciler.reconcile(&registry, set(vec![("temp", Some(markers))]));

    assert_eq!(report.rebuilt, vec!["temp".to_string()]);
    assert!(reconciler.renderer(old).is_none(), "stale handle must not resolve");
    let record = reconciler.get("temp").unwrap();
    assert_eq!(record.definition.kind, "markers");
    assert_eq!(record.z_order, 1);
    assert_eq!(reconciler.renderer(record.handles[0]).unwrap().kind(), "markers");
    assert_eq!(reconciler.renderer_count(), 1);
}

#[test]
fn test_absent_ids_removed_by_default() {
    let (registry, mut reconciler) = setup();
    reconciler.reconcile(
        &registry,
        set(vec![("a", Some(line(vec![1.0]))), ("b", Some(line(vec![2.0])))]),
    );

    let report = reconciler.reconcile(&registry, set(vec![("b", Some(line(vec![2.0])))]));

    assert_eq!(report.removed, vec!["a".to_string()]);
    assert!(reconciler.get("a").is_none());
    assert_eq!(reconciler.renderer_count(), 2);
}

#[test]
fn test_retain_absent_policy() {
    let registry = RendererRegistry::with_builtin();
    let mut reconciler =
        DefinitionReconciler::new(ViewerConfig::default().with_removal_policy(RemovalPolicy::RetainAbsent));
    reconciler.reconcile(
        &registry,
        set(vec![("a", Some(line(vec![1.0]))), ("b", Some(line(vec![2.0])))]),
    );

    let report = reconciler.reconcile(&registry, set(vec![("b", Some(line(vec![2.0])))]));

    assert!(report.removed.is_empty());
    assert_eq!(reconciler.len(), 2);
}

// ====================
// Failures
// ====================

#[test]
fn test_length_mismatch_substitutes_fallback() {
    let (registry, mut reconciler) = setup();
    let bad = PlotDefinition::new("line").with_x(vec![0.0, 1.0, 2.0]).with_y(vec![1.0, 2.0]);

    let report = reconciler.reconcile(&registry, set(vec![("bad", Some(bad))]));

    assert_eq!(report.failed, vec!["bad".to_string()]);
    let message = "series `y` has 2 samples but x has 3";
    assert_eq!(reconciler.failures(), vec![("bad", message)]);
    let record = reconciler.get("bad").unwrap();
    assert_eq!(record.status, RecordStatus::Failed(message.to_string()));
    assert_eq!(reconciler.renderer(record.handles[0]).unwrap().kind(), "fallback");
}

#[test]
fn test_unknown_kind_substitutes_fallback() {
    let (registry, mut reconciler) = setup();
    reconciler.reconcile(&registry, set(vec![("pie", Some(PlotDefinition::new("pie")))]));

    assert_eq!(
        reconciler.failures(),
        vec![("pie", "no renderer registered for kind `pie`")]
    );
    assert!(reconciler.compute_bounds().is_none());
}

#[test]
fn test_failed_record_recovers_when_fixed() {
    let (registry, mut reconciler) = setup();
    let bad = PlotDefinition::new("line").with_x(vec![0.0, 1.0]).with_y(vec![1.0]);
    reconciler.reconcile(&registry, set(vec![("temp", Some(bad))]));
    assert!(reconciler.get("temp").unwrap().is_failed());

    let report = reconciler.reconcile(&registry, set(vec![("temp", Some(line(vec![1.0, 2.0])))]));

    assert_eq!(report.rebuilt, vec!["temp".to_string()]);
    assert!(reconciler.failures().is_empty());
    let record = reconciler.get("temp").unwrap();
    let kinds: Vec<_> = record
        .handles
        .iter()
        .map(|&handle| reconciler.renderer(handle).unwrap().kind())
        .collect();
    assert_eq!(kinds, vec!["band", "line"]);
}

#[test]
fn test_redraw_failure_falls_back() {
    let (registry, mut reconciler) = setup();
    reconciler.reconcile(&registry, set(vec![("temp", Some(line(vec![1.0, 2.0])))]));

    let bad = PlotDefinition::new("line").with_x(vec![0.0, 1.0]).with_y(vec![1.0, 2.0, 3.0]);
    let report = reconciler.reconcile(&registry, set(vec![("temp", Some(bad))]));

    assert_eq!(report.failed, vec!["temp".to_string()]);
    assert_eq!(reconciler.renderer_count(), 1);
    assert!(reconciler.get("temp").unwrap().is_failed());
}

// ====================
// Custom Kinds and Draw Order
// ====================

struct Probe {
    draws: Rc<Cell<usize>>,
}

impl PlotRenderer for Probe {
    fn kind(&self) -> &'static str {
        "probe"
    }

    fn draw(&mut self, _definition: &PlotDefinition) -> Result<(), ChartError> {
        self.draws.set(self.draws.get() + 1);
        Ok(())
    }

    fn compute_bounds(&self) -> Option<DataBounds> {
        None
    }

    fn render_core(&self, _surface: &mut dyn DrawSurface, _transform: &PlotTransform, _clip: &ClipRegion) {}

    fn tooltip(&self, _query: &TooltipQuery<'_>) -> Option<String> {
        None
    }
}

#[test]
fn test_unchanged_plots_are_not_redrawn() {
    let draws = Rc::new(Cell::new(0));
    let mut registry = RendererRegistry::new();
    let counter = draws.clone();
    registry.register("probe", move |_ctx| {
        Ok(vec![Box::new(Probe {
            draws: counter.clone(),
        }) as Box<dyn PlotRenderer>])
    });
    let mut reconciler = DefinitionReconciler::new(ViewerConfig::default());

    let probe = PlotDefinition::new("probe").with_name("p");
    reconciler.reconcile(&registry, set(vec![("p", Some(probe.clone()))]));
    reconciler.reconcile(&registry, set(vec![("p", Some(probe.clone()))]));
    assert_eq!(draws.get(), 1);

    reconciler.reconcile(&registry, set(vec![("p", Some(probe.with_name("renamed")))]));
    assert_eq!(draws.get(), 2);
}

#[test]
fn test_band_fills_drawn_before_median() {
    let (registry, mut reconciler) = setup();
    let band = PlotDefinition::new("band")
        .with_x(vec![0.0, 1.0, 2.0])
        .with_uncertain_y(UncertainSeries {
            median: vec![0.5, 0.6, 0.7].into(),
            lower68: vec![0.4, 0.5, 0.6].into(),
            upper68: vec![0.6, 0.7, 0.8].into(),
            lower95: vec![0.3, 0.4, 0.5].into(),
            upper95: vec![0.7, 0.8, 0.9].into(),
        });
    reconciler.reconcile(&registry, set(vec![("band", Some(band))]));
    assert!(reconciler.failures().is_empty());

    let mut surface = MockSurface::new();
    let clip = ClipRegion::from_origin_size(0.0, 0.0, 200.0, 100.0);
    let bounds = reconciler.compute_bounds().unwrap();
    let transform = PlotTransform::linear(bounds.x, bounds.y, &clip);
    reconciler.render(&mut surface, &transform, &clip);

    let calls = surface.calls();
    assert_eq!(surface.count_fills(), 2);
    assert!(matches!(calls[0], DrawCall::FillPath { .. }));
    assert!(matches!(calls[1], DrawCall::FillPath { .. }));
    assert!(matches!(calls.last(), Some(DrawCall::StrokePath { .. })));
}
