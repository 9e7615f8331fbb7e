//! Error module orchestrator.
//!
//! Call sites import [`FrameError`] and [`Result`] from here; the variants
//! live in the private `types` module.

mod types;

pub use types::{FrameError, Result};
