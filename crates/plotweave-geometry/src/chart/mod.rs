//! Declarative chart rendering.
//!
//! Callers submit a [`DefinitionSet`] (plot id → [`PlotDefinition`]) and the
//! [`ChartViewer`] keeps a retained renderer per plot in sync with it:
//! - Line, band (confidence intervals plus median), heatmap and marker plots
//! - Incremental reconciliation: unchanged plots keep their renderers
//! - Viewport clipping with gap-aware line segmentation
//! - Adaptive number formatting for ticks and tooltips
//! - Linear and logarithmic axes
//!
//! # Example
//!
//! ```ignore
//! use plotweave_geometry::chart::*;
//!
//! let mut defs = definition_set();
//! defs.insert(
//!     "indoor".into(),
//!     Some(PlotDefinition::new("line").with_x(vec![0.0, 1.0, 2.0]).with_y(vec![20.0, 21.0, 22.5])),
//! );
//!
//! let mut viewer = ChartViewer::new(Default::default());
//! viewer.submit(defs);
//! viewer.render_frame(&mut surface);
//! ```

// Numeric kernels
mod clip;
mod format;
mod grid;
mod line;
mod scale;
mod ticks;

// Definitions
mod definition;
mod error;
mod palette;

// Renderers and reconciliation
mod reconcile;
mod registry;
pub mod renderers;

// Viewer
mod dirty;
mod scheduler;
mod state;
mod viewer;

// Re-exports
pub use clip::*;
pub use definition::*;
pub use dirty::*;
pub use error::*;
pub use format::*;
pub use grid::*;
pub use line::*;
pub use palette::*;
pub use reconcile::*;
pub use registry::*;
pub use renderers::*;
pub use scale::*;
pub use scheduler::*;
pub use state::*;
pub use ticks::*;
pub use viewer::*;
