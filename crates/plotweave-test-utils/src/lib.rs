//! Test utilities for Plotweave.
//!
//! The main component is [`MockSurface`], a [`DrawSurface`] that records
//! every draw call instead of painting, so renderer tests can assert on
//! exactly what was drawn.
//!
//! # Example
//!
//! ```rust
//! use plotweave_geometry::{Color, DrawSurface, Fill};
//! use plotweave_test_utils::MockSurface;
//!
//! let mut surface = MockSurface::new();
//! surface.fill_circle(glam::Vec2::new(10.0, 10.0), 2.0, &Fill::solid(Color::RED));
//!
//! assert_eq!(surface.count_circles(), 1);
//! ```
//!
//! [`DrawSurface`]: plotweave_geometry::DrawSurface

pub mod mock_surface;

pub use mock_surface::*;
