//! Chart viewer frame loop tests.

use glam::DVec2;
use plotweave_core::config::ViewerConfig;
use plotweave_geometry::chart::{AxisRange, ChartDirtyFlags, ChartViewer, ScaleType};
use plotweave_test_utils::MockSurface;

const TEMP: &str = r#"{
    "temp": { "kind": "line", "displayName": "temp", "x": [0, 1, 2], "y": [0, 1, 4] }
}"#;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn rendered_viewer() -> (ChartViewer, MockSurface) {
    let mut viewer = ChartViewer::new(ViewerConfig::default());
    let mut surface = MockSurface::new();
    viewer.submit_json(TEMP).unwrap();
    let outcome = viewer.render_frame(&mut surface);
    assert!(outcome.rendered);
    (viewer, surface)
}

// ====================
// Frame Loop
// ====================

#[test]
fn test_first_frame_reconciles_and_fits() {
    let (viewer, surface) = rendered_viewer();

    assert_eq!(surface.count_strokes(), 1);
    let x = viewer.view().x_range();
    let y = viewer.view().y_range();
    assert!(approx(x.min, -0.1) && approx(x.max, 2.1), "x range {x:?}");
    assert!(approx(y.min, -0.2) && approx(y.max, 4.2), "y range {y:?}");
}

#[test]
fn test_clean_frame_is_skipped() {
    let (mut viewer, surface) = rendered_viewer();
    surface.clear_calls();

    let outcome = viewer.render_frame(&mut surface.clone());

    assert!(!outcome.rendered);
    assert!(outcome.report.is_none());
    assert_eq!(surface.call_count(), 0);
}

#[test]
fn test_identical_resubmission_does_not_repaint() {
    let (mut viewer, mut surface) = rendered_viewer();
    viewer.submit_json(TEMP).unwrap();

    let outcome = viewer.render_frame(&mut surface);

    assert!(!outcome.rendered);
    let report = outcome.report.expect("submission was reconciled");
    assert_eq!(report.unchanged, vec!["temp".to_string()]);
}

#[test]
fn test_submissions_coalesce_to_last() {
    let mut viewer = ChartViewer::new(ViewerConfig::default());
    let mut surface = MockSurface::new();

    assert!(!viewer.submit_json(r#"{ "a": { "kind": "line", "x": [0], "y": [1] } }"#).unwrap());
    assert!(viewer.submit_json(r#"{ "b": { "kind": "line", "x": [0], "y": [1] } }"#).unwrap());

    let report = viewer.render_frame(&mut surface).report.unwrap();
    assert_eq!(report.added, vec!["b".to_string()]);
    assert!(viewer.record("a").is_none());
    assert!(!viewer.has_pending());
}

#[test]
fn test_view_change_repaints() {
    let (mut viewer, mut surface) = rendered_viewer();

    viewer.view_mut().set_x_range(AxisRange::new(0.0, 1.0));
    let outcome = viewer.render_frame(&mut surface);
    assert!(outcome.rendered);
    assert_eq!(outcome.dirty, ChartDirtyFlags::VIEW_CHANGED);

    viewer.view_mut().set_cursor(Some(DVec2::new(10.0, 10.0)));
    assert!(!viewer.render_frame(&mut surface).rendered, "cursor moves only affect tooltips");
}

#[test]
fn test_malformed_json_is_rejected() {
    let mut viewer = ChartViewer::new(ViewerConfig::default());
    assert!(viewer.submit_json("{ not json").is_err());
    assert!(!viewer.has_pending());
}

// ====================
// Tooltips and Ticks
// ====================

#[test]
fn test_tooltip_near_sample() {
    let (viewer, _) = rendered_viewer();
    let screen = viewer.view().transform().to_screen(DVec2::new(1.0, 1.0));

    let tip = viewer.tooltip_at(screen).expect("hit the middle sample");
    assert!(tip.starts_with("temp: ("), "got {tip}");

    let far = viewer.view().transform().to_screen(DVec2::new(0.0, 4.0));
    assert_eq!(viewer.tooltip_at(far), None);
    assert_eq!(viewer.tooltip_at(DVec2::new(-5.0, -5.0)), None);
}

#[test]
fn test_failed_plot_reports_through_glyph() {
    let mut viewer = ChartViewer::new(ViewerConfig::default());
    let mut surface = MockSurface::new();
    viewer
        .submit_json(r#"{ "bad": { "kind": "line", "x": [0, 1], "y": [1] } }"#)
        .unwrap();
    assert!(viewer.render_frame(&mut surface).rendered);

    let message = "series `y` has 1 samples but x has 2";
    assert_eq!(viewer.failures(), vec![("bad", message)]);
    assert!(surface.call_count() > 0, "the warning glyph is drawn");
    assert_eq!(viewer.tooltip_at(DVec2::new(13.0, 13.0)).as_deref(), Some(message));
}

#[test]
fn test_linear_ticks() {
    let mut viewer = ChartViewer::new(ViewerConfig::default());
    viewer.view_mut().set_x_range(AxisRange::new(0.0, 10.0));

    let ticks = viewer.x_ticks();
    let values: Vec<f64> = ticks.values().collect();
    assert_eq!(values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    assert_eq!(ticks.ticks[1].label, "2.00");
}

#[test]
fn test_log_ticks_and_fit() {
    let mut viewer = ChartViewer::new(ViewerConfig::default());
    let mut surface = MockSurface::new();
    viewer.view_mut().set_y_scale(ScaleType::log10());
    viewer
        .submit_json(r#"{ "decay": { "kind": "line", "x": [0, 1, 2, 3], "y": [1000, 100, 10, 1] } }"#)
        .unwrap();
    viewer.render_frame(&mut surface);

    // Log axes are fitted without padding so the range stays positive.
    let y = viewer.view().y_range();
    assert_eq!((y.min, y.max), (1.0, 1000.0));
    let labels: Vec<_> = viewer.y_ticks().ticks.into_iter().map(|t| t.label).collect();
    assert_eq!(labels, vec!["1", "10", "100", "1000"]);
    assert_eq!(surface.count_strokes(), 1);
}

#[test]
fn test_log_fit_skips_non_positive_samples() {
    let mut viewer = ChartViewer::new(ViewerConfig::default());
    let mut surface = MockSurface::new();
    viewer.view_mut().set_y_scale(ScaleType::log10());
    viewer
        .submit_json(r#"{ "counts": { "kind": "line", "x": [0, 1, 2, 3], "y": [0, 100, 10, 1] } }"#)
        .unwrap();
    viewer.render_frame(&mut surface);

    let y = viewer.view().y_range();
    assert_eq!((y.min, y.max), (1.0, 100.0));
    assert_eq!(surface.count_strokes(), 1, "the positive samples are still drawn");
}

#[test]
fn test_log_fit_without_positive_data_keeps_range() {
    let mut viewer = ChartViewer::new(ViewerConfig::default());
    let mut surface = MockSurface::new();
    viewer.view_mut().set_y_scale(ScaleType::log10());
    viewer.view_mut().set_y_range(AxisRange::new(1.0, 10.0));
    viewer
        .submit_json(r#"{ "flat": { "kind": "line", "x": [0, 1], "y": [-1, 0] } }"#)
        .unwrap();
    viewer.render_frame(&mut surface);

    assert_eq!(viewer.view().y_range(), AxisRange::new(1.0, 10.0));
}
