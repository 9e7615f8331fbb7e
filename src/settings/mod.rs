//! Settings module orchestrator.
//!
//! [`FrameSettings`] is the declarative description of a frame: which para
//! layers exist, which screens to instantiate, and whether their nodes start
//! inactive. [`FrameScaffold`] turns it into a scene hierarchy and two fully
//! initialized layers; [`FrameSettings::create_frame`] wires everything into
//! a [`crate::Frame`].

mod core;
mod scaffold;

pub use core::{FrameSettings, LogSettings, ParaLayerBlueprint, ScreenBlueprint, ScreenFactory};
pub use scaffold::FrameScaffold;
