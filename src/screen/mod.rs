//! Screen module orchestrator.
//!
//! Screens are the units the layers register, show and hide. This module
//! holds the controller contract, the capability tags resolved at
//! registration, the properties passed on show, and the event channel
//! screens use to report transition completion back to their layer.

mod basic;
mod controller;
mod events;
mod kind;

pub use basic::BasicScreen;
pub use controller::{ScreenController, ScreenHandle};
pub use events::{ScreenEvent, ScreenEventKind, ScreenEventReceiver, ScreenEventSender, screen_channel};
pub use kind::{
    PanelPriority, PanelProperties, PanelTraits, ScreenKind, ScreenProperties, WindowPriority,
    WindowProperties, WindowTraits,
};
