//! Plotweave Geometry - 2D primitives and declarative chart rendering
//!
//! This crate provides:
//! - Path primitives, strokes, fills and colors
//! - The [`DrawSurface`] abstraction renderers paint onto
//! - Tessellation of draw calls into colored triangle meshes (Lyon)
//! - Declarative charts with incremental reconciliation (optional "chart" feature)
//!
//! # Example
//!
//! ```ignore
//! use plotweave_geometry::chart::ChartViewer;
//! use plotweave_geometry::TessellatingSurface;
//!
//! let mut viewer = ChartViewer::new(Default::default());
//! viewer.submit_json(r#"{ "temp": { "kind": "line", "x": [0, 1, 2], "y": [20, 21, 22.5] } }"#)?;
//!
//! let mut surface = TessellatingSurface::new();
//! viewer.render_frame(&mut surface);
//! let mesh = surface.take_mesh();
//! ```

// Core primitives
mod color;
mod path;

// Styling
mod fill;
mod stroke;

// Output
mod surface;
mod tessellator;
mod vertex;

// Chart module (optional)
#[cfg(feature = "chart")]
pub mod chart;

// Re-exports
pub use color::*;
pub use path::*;

pub use fill::*;
pub use stroke::*;

pub use surface::*;
pub use tessellator::*;
pub use vertex::*;
