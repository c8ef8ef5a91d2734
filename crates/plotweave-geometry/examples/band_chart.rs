//! Renders a forecast band over a heatmap and prints what the host would upload.
//!
//! Run with `RUST_LOG=plotweave_geometry=debug cargo run --example band_chart`
//! to see the reconciler decisions.

use glam::DVec2;
use plotweave_core::config::ViewerConfig;
use plotweave_core::logging;
use plotweave_core::profiling::{ProfilingBackend, init_profiling};
use plotweave_geometry::TessellatingSurface;
use plotweave_geometry::chart::ChartViewer;

const FIRST: &str = r##"{
    "forecast": {
        "kind": "band",
        "displayName": "forecast",
        "x": [0, 1, 2, 3, 4, 5],
        "y": {
            "median":  [10, 11, 12.5, null, 14, 15],
            "lower68": [9, 10, 11, null, 12, 12.5],
            "upper68": [11, 12, 14, null, 16, 17.5],
            "lower95": [8, 9, 10, null, 10.5, 11],
            "upper95": [12, 13, 15, null, 17.5, 19]
        },
        "stroke": "#1f77b4"
    },
    "observed": {
        "kind": "markers",
        "x": [0, 1, 2, 3],
        "y": [10.2, 10.7, 12.9, 13.1],
        "shape": "diamond",
        "size": 6
    }
}"##;

// Only the observed markers change; the forecast is left alone with `null`.
const SECOND: &str = r#"{
    "forecast": null,
    "observed": {
        "kind": "markers",
        "x": [0, 1, 2, 3, 4],
        "y": [10.2, 10.7, 12.9, 13.1, 14.4],
        "shape": "diamond",
        "size": 6
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    init_profiling(ProfilingBackend::InProcess);

    let config = ViewerConfig::from_json_str(r#"{ "tickCount": 6 }"#)?;
    let mut viewer = ChartViewer::new(config);
    let mut surface = TessellatingSurface::new();

    for (frame, json) in [FIRST, SECOND].into_iter().enumerate() {
        viewer.submit_json(json)?;
        let outcome = viewer.render_frame(&mut surface);
        let mesh = surface.take_mesh();

        println!("frame {frame}: rendered={} dirty={:?}", outcome.rendered, outcome.dirty);
        if let Some(report) = &outcome.report {
            println!(
                "  added={:?} updated={:?} unchanged={:?} skipped={:?}",
                report.added, report.updated, report.unchanged, report.skipped
            );
        }
        println!(
            "  {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }

    let y_ticks = viewer.y_ticks();
    let labels: Vec<_> = y_ticks.ticks.iter().map(|tick| tick.label.as_str()).collect();
    println!("y ticks: {labels:?}");

    let hover = viewer.view().transform().to_screen(DVec2::new(2.0, 12.5));
    if let Some(tip) = viewer.tooltip_at(hover) {
        println!("tooltip at {hover}: {tip}");
    }

    for (id, message) in viewer.failures() {
        println!("plot {id} failed: {message}");
    }

    Ok(())
}
