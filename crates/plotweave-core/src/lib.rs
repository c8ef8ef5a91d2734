//! Plotweave Core
//!
//! Shared plumbing for the Plotweave chart crates: collections and renderer
//! handles, logging, profiling, viewer configuration and the typed property
//! merge used by definition reconciliation.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod profiling;
pub mod sync;

pub use plotweave_core_macros::SyncProps;
