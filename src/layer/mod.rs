//! Layer module orchestrator.
//!
//! A layer owns a registry of screens of one kind and decides how they are
//! shown, hidden and parented. [`PanelLayer`] handles independent panels;
//! [`WindowLayer`] runs the exclusive window state machine.

mod panel;
mod para;
mod registry;
mod window;

pub use panel::{PanelLayer, PriorityLayerEntry, PriorityLayerList};
pub use para::WindowParaLayer;
pub use registry::{RegisteredScreen, ScreenLayer, ScreenRegistry};
pub use window::{BlockSignal, HistoryEntry, WindowLayer};
