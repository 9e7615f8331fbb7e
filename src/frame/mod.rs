//! Frame facade orchestrator.
//!
//! Application code talks to a [`Frame`]: it composes one panel layer and
//! one window layer, forwards block/unblock signals to the input gate, and
//! drives screen transitions from explicit `update` ticks.

mod core;

pub use core::{Frame, FrameBuilder, LayerKind};
