//! Line and marker renderers driven through the reconciler.

use plotweave_core::config::ViewerConfig;
use plotweave_geometry::Color;
use plotweave_geometry::chart::{
    Channel, ClipRegion, DefinitionReconciler, MarkerShape, PlotDefinition, PlotTransform, RendererRegistry,
    Samples, TreatAs, UncertainSeries, definition_set, parse_definition_set,
};
use plotweave_test_utils::{DrawCall, MockSurface};

fn reconcile(json: &str) -> DefinitionReconciler {
    let registry = RendererRegistry::with_builtin();
    let mut reconciler = DefinitionReconciler::new(ViewerConfig::default());
    reconciler.reconcile(&registry, parse_definition_set(json).unwrap());
    reconciler
}

fn reconcile_one(id: &str, definition: PlotDefinition) -> DefinitionReconciler {
    let registry = RendererRegistry::with_builtin();
    let mut reconciler = DefinitionReconciler::new(ViewerConfig::default());
    let mut defs = definition_set();
    defs.insert(id.to_string(), Some(definition));
    reconciler.reconcile(&registry, defs);
    reconciler
}

/// Render every plot fitted into a 200x100 area with some padding.
fn render(reconciler: &DefinitionReconciler) -> MockSurface {
    let mut surface = MockSurface::new();
    let clip = ClipRegion::from_origin_size(0.0, 0.0, 200.0, 100.0);
    let bounds = reconciler.compute_bounds().unwrap();
    let transform = PlotTransform::linear(bounds.x.padded(0.1), bounds.y.padded(0.1), &clip);
    reconciler.render(&mut surface, &transform, &clip);
    surface
}

fn uncertain(median: Vec<f64>, spread: f64) -> UncertainSeries {
    let shifted = |d: f64| -> Samples { median.iter().map(|m| m + d).collect::<Vec<_>>().into() };
    UncertainSeries {
        lower68: shifted(-spread),
        upper68: shifted(spread),
        lower95: shifted(-2.0 * spread),
        upper95: shifted(2.0 * spread),
        median: median.into(),
    }
}

// ====================
// Lines
// ====================

#[test]
fn test_uncertain_line_draws_fills_under_median() {
    let mut line = PlotDefinition::new("line")
        .with_x(vec![0.0, 1.0, 2.0])
        .with_uncertain_y(uncertain(vec![1.0, 2.0, 1.5], 0.25));
    line.fill68 = Some("#ff0000".to_string());

    let reconciler = reconcile_one("forecast", line);
    assert!(reconciler.failures().is_empty());

    let surface = render(&reconciler);
    let calls = surface.calls();
    assert_eq!(surface.count_fills(), 2, "95% and 68% bands");
    assert_eq!(surface.count_strokes(), 1);
    assert!(matches!(calls[0], DrawCall::FillPath { .. }));
    assert_eq!(calls[1].color(), Color::RED.with_alpha(0.5));
    assert!(matches!(calls.last(), Some(DrawCall::StrokePath { .. })));
}

#[test]
fn test_plain_line_has_no_fills() {
    let reconciler = reconcile_one("temp", PlotDefinition::new("line").with_x(vec![0.0, 1.0]).with_y(vec![1.0, 2.0]));
    let surface = render(&reconciler);
    assert_eq!(surface.count_fills(), 0);
    assert_eq!(surface.count_strokes(), 1);
}

#[test]
fn test_line_without_x_uses_indices() {
    let reconciler = reconcile(r#"{ "temp": { "kind": "line", "y": [4, 5, 6] } }"#);

    assert!(reconciler.failures().is_empty());
    let bounds = reconciler.compute_bounds().unwrap();
    assert_eq!((bounds.x.min, bounds.x.max), (0.0, 2.0));
}

#[test]
fn test_unsorted_function_drawn_in_x_order() {
    let reconciler = reconcile_one(
        "f",
        PlotDefinition::new("line").with_x(vec![2.0, 0.0, 1.0]).with_y(vec![2.0, 0.0, 1.0]),
    );

    let paths = render(&reconciler).stroked_paths();
    assert_eq!(paths.len(), 1);
    let xs: Vec<f32> = paths[0].iter().map(|p| p.x).collect();
    assert!(xs.windows(2).all(|pair| pair[0] < pair[1]), "zig-zag path {xs:?}");
}

#[test]
fn test_trajectory_keeps_submitted_order() {
    let mut trajectory = PlotDefinition::new("line").with_x(vec![2.0, 0.0, 1.0]).with_y(vec![2.0, 0.0, 1.0]);
    trajectory.treat_as = Some(TreatAs::Trajectory);
    let reconciler = reconcile_one("t", trajectory);

    let paths = render(&reconciler).stroked_paths();
    let xs: Vec<f32> = paths[0].iter().map(|p| p.x).collect();
    assert!(xs[0] > xs[1] && xs[1] < xs[2], "expected the submitted order, got {xs:?}");
}

// ====================
// Markers
// ====================

#[test]
fn test_markers_without_x_use_indices() {
    let reconciler = reconcile(r#"{ "m": { "kind": "markers", "y": [1, 2, 3] } }"#);

    assert!(reconciler.failures().is_empty());
    assert_eq!(render(&reconciler).count_circles(), 3);
}

#[test]
fn test_per_sample_color_and_size() {
    let reconciler = reconcile(
        r#"{ "m": {
            "kind": "markers",
            "x": [0, 1],
            "y": [0, 1],
            "color": [10, 20],
            "palette": "grays",
            "size": [1, 2]
        } }"#,
    );
    assert!(reconciler.failures().is_empty());

    let surface = render(&reconciler);
    let circles: Vec<_> = surface
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            DrawCall::FillCircle { radius, color, .. } => Some((radius, color)),
            _ => None,
        })
        .collect();
    assert_eq!(circles, vec![(2.5, Color::BLACK), (25.0, Color::WHITE)]);
}

#[test]
fn test_uniform_color_and_size() {
    let mut markers = PlotDefinition::new("markers").with_x(vec![0.0, 1.0]).with_y(vec![0.0, 1.0]);
    markers.color = Some(Channel::Uniform("#ff0000".to_string()));
    markers.size = Some(Channel::Uniform(4.0));
    markers.shape = Some(MarkerShape::Square);
    let reconciler = reconcile_one("m", markers);

    let surface = render(&reconciler);
    assert_eq!(surface.count_rects(), 2);
    assert!(surface.calls().iter().all(|call| call.color() == Color::RED));
}

#[test]
fn test_per_sample_length_is_checked() {
    let reconciler = reconcile(r#"{ "m": { "kind": "markers", "x": [0, 1], "y": [0, 1], "color": [5] } }"#);
    assert_eq!(
        reconciler.failures(),
        vec![("m", "series `color` has 1 samples but x has 2")]
    );
}

#[test]
fn test_uncertain_markers_draw_box_and_whiskers() {
    let markers = PlotDefinition::new("markers")
        .with_x(vec![0.0, 1.0])
        .with_uncertain_y(uncertain(vec![1.0, 2.0], 0.25));
    let reconciler = reconcile_one("m", markers);
    assert!(reconciler.failures().is_empty());

    let surface = render(&reconciler);
    // Per sample: the 68% box, plus whiskers, box outline and median bar.
    assert_eq!(surface.count_rects(), 2);
    assert_eq!(surface.count_strokes(), 6);
    assert_eq!(surface.count_circles(), 0);

    let bounds = reconciler.compute_bounds().unwrap();
    assert_eq!((bounds.y.min, bounds.y.max), (0.5, 2.5));
}

#[test]
fn test_whisker_shape_only_draws_whiskers_and_median() {
    let mut markers = PlotDefinition::new("markers")
        .with_x(vec![0.0, 1.0])
        .with_uncertain_y(uncertain(vec![1.0, 2.0], 0.25));
    markers.shape = Some(MarkerShape::Whisker);
    let reconciler = reconcile_one("m", markers);

    let surface = render(&reconciler);
    assert_eq!(surface.count_rects(), 0);
    assert_eq!(surface.count_strokes(), 4);
}

#[test]
fn test_whisker_shape_with_plain_y_draws_squares() {
    let mut markers = PlotDefinition::new("markers").with_x(vec![0.0, 1.0]).with_y(vec![0.0, 1.0]);
    markers.shape = Some(MarkerShape::BoxWhisker);
    let reconciler = reconcile_one("m", markers);

    assert_eq!(render(&reconciler).count_rects(), 2);
}
