//! Clipped polyline and band rendering tests.
//!
//! Samples go through an identity transform so data and screen coordinates
//! coincide, and draw calls are captured with a `MockSurface`.

use glam::{DVec2, Vec2};
use plotweave_geometry::chart::{ClipRegion, LineRenderer};
use plotweave_geometry::{Color, Stroke};
use plotweave_test_utils::{DrawCall, MockSurface};

fn viewport() -> ClipRegion {
    ClipRegion::from_origin_size(0.0, 0.0, 100.0, 100.0)
}

fn stroke() -> Stroke {
    Stroke::solid(Color::BLUE, 1.0)
}

fn identity(p: DVec2) -> DVec2 {
    p
}

// ====================
// Segmentation
// ====================

#[test]
fn test_nan_splits_into_two_paths() {
    let mut surface = MockSurface::new();
    let x = [10.0, 20.0, 30.0, 40.0, 50.0];
    let y = [10.0, 20.0, f64::NAN, 40.0, 50.0];

    let stats = LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(stats.paths, 2);
    assert_eq!(surface.count_strokes(), 2);
    assert_eq!(surface.count_circles(), 0);
    assert_eq!(
        surface.stroked_paths(),
        vec![
            vec![Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0)],
            vec![Vec2::new(40.0, 40.0), Vec2::new(50.0, 50.0)],
        ]
    );
}

#[test]
fn test_isolated_samples_become_dots() {
    let mut surface = MockSurface::new();
    let x = [10.0, 20.0, 30.0];
    let y = [10.0, f64::NAN, 30.0];

    let stats = LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(stats.dots, 2);
    assert_eq!(surface.count_strokes(), 0);
    let centers: Vec<_> = surface.calls().iter().flat_map(DrawCall::points).collect();
    assert_eq!(centers, vec![Vec2::new(10.0, 10.0), Vec2::new(30.0, 30.0)]);
}

#[test]
fn test_isolated_sample_outside_viewport_not_drawn() {
    let mut surface = MockSurface::new();
    LineRenderer::default().render_line(&[200.0], &[200.0], identity, &viewport(), &stroke(), &mut surface);
    assert_eq!(surface.call_count(), 0);
}

#[test]
fn test_leading_and_trailing_nans() {
    let mut surface = MockSurface::new();
    let x = [f64::NAN, 10.0, 20.0, f64::NAN];
    let y = [5.0, 10.0, 20.0, f64::NAN];

    let stats = LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(stats.paths, 1);
    assert_eq!(surface.count_strokes(), 1);
}

// ====================
// Clipping
// ====================

#[test]
fn test_fully_clipped_draws_nothing() {
    let mut surface = MockSurface::new();
    let x = [-50.0, -40.0, -30.0];
    let y = [10.0, 20.0, 30.0];

    let stats = LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(surface.call_count(), 0);
    assert_eq!(stats.rejected_segments, 2);
    assert_eq!(stats.paths, 0);
}

#[test]
fn test_segment_clipped_at_boundary() {
    let mut surface = MockSurface::new();
    let x = [50.0, 150.0];
    let y = [50.0, 50.0];

    LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(
        surface.stroked_paths(),
        vec![vec![Vec2::new(50.0, 50.0), Vec2::new(100.0, 50.0)]]
    );
}

#[test]
fn test_extreme_values_stay_finite() {
    let mut surface = MockSurface::new();
    let x = [50.0, 50.0];
    let y = [50.0, 1e300];

    LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    let paths = surface.stroked_paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].iter().all(|p| p.is_finite()));
    assert_eq!(paths[0][1], Vec2::new(50.0, 100.0));
}

// ====================
// Coalescing
// ====================

#[test]
fn test_close_points_coalesced() {
    let mut surface = MockSurface::new();
    let x = [0.0, 0.1, 0.2, 10.0];
    let y = [0.0, 0.1, 0.2, 10.0];

    let stats = LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(stats.points, 2);
    assert_eq!(
        surface.stroked_paths(),
        vec![vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)]]
    );
}

#[test]
fn test_last_point_always_emitted() {
    let mut surface = MockSurface::new();
    let x = [0.0, 10.0, 10.1];
    let y = [0.0, 10.0, 10.1];

    LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    let paths = surface.stroked_paths();
    assert_eq!(paths[0].len(), 3);
    assert_eq!(paths[0].last(), Some(&Vec2::new(10.1, 10.1)));
}

#[test]
fn test_coincident_samples_draw_dot_not_stroke() {
    let mut surface = MockSurface::new();
    let x = [f64::NAN, 3.0, 3.0, f64::NAN];
    let y = [f64::NAN, 3.0, 3.0, f64::NAN];

    let stats = LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(stats.dots, 1);
    assert_eq!(stats.paths, 0);
    assert_eq!(surface.count_strokes(), 0);
    assert_eq!(surface.count_circles(), 1);
}

#[test]
fn test_run_within_one_pixel_draws_dot() {
    let mut surface = MockSurface::new();
    let x = [20.0, 20.3, 20.6];
    let y = [20.0, 20.2, 20.4];

    let stats = LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(stats.dots, 1);
    assert_eq!(surface.count_strokes(), 0);
    let centers: Vec<_> = surface.calls().iter().flat_map(DrawCall::points).collect();
    assert_eq!(centers, vec![Vec2::new(20.0, 20.0)]);
}

#[test]
fn test_stroked_paths_have_no_zero_length_segments() {
    let mut surface = MockSurface::new();
    let x = [10.0, 10.0, 30.0, 30.0, f64::NAN, 50.0, 50.0];
    let y = [10.0, 10.0, 30.0, 30.0, f64::NAN, 50.0, 50.0];

    LineRenderer::default().render_line(&x, &y, identity, &viewport(), &stroke(), &mut surface);

    assert_eq!(surface.count_strokes(), 1);
    assert_eq!(surface.count_circles(), 1);
    for path in surface.stroked_paths() {
        assert!(path.windows(2).all(|pair| pair[0] != pair[1]), "degenerate segment in {path:?}");
    }
}

// ====================
// Bands
// ====================

#[test]
fn test_band_polygon_per_run() {
    let mut surface = MockSurface::new();
    let x = [10.0, 20.0, 30.0, 40.0];
    let y1 = [10.0, 10.0, f64::NAN, 10.0];
    let y2 = [20.0, 20.0, 20.0, 20.0];

    let stats =
        LineRenderer::default().render_area(&x, &y1, &y2, Color::BLUE, identity, &viewport(), &mut surface);

    assert_eq!(stats.polygons, 1);
    match &surface.calls()[..] {
        [DrawCall::FillPath { points, closed, color }] => {
            assert!(closed);
            assert_eq!(
                points,
                &vec![
                    Vec2::new(10.0, 10.0),
                    Vec2::new(20.0, 10.0),
                    Vec2::new(20.0, 20.0),
                    Vec2::new(10.0, 20.0),
                ]
            );
            assert_eq!(color.a, 0.5);
        }
        other => panic!("unexpected calls {other:?}"),
    }
}

#[test]
fn test_band_outside_viewport_culled() {
    let mut surface = MockSurface::new();
    let x = [200.0, 300.0];
    let y1 = [10.0, 10.0];
    let y2 = [20.0, 20.0];

    let stats =
        LineRenderer::default().render_area(&x, &y1, &y2, Color::BLUE, identity, &viewport(), &mut surface);

    assert_eq!(stats.culled_runs, 1);
    assert_eq!(surface.call_count(), 0);
}
