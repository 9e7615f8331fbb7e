//! Screen-management frame for layered UIs.
//!
//! A [`Frame`] owns two layers. The [`PanelLayer`] shows and hides panels
//! independently and routes each one to a priority para layer. The
//! [`WindowLayer`] keeps one foreground window at a time, a FIFO queue of
//! deferred windows, and a history stack; popups are parented to an overlay
//! with a darken background. Screens report transition completion through a
//! channel that the frame drains on every `update`, and the frame blocks
//! input while any window is transitioning.
//!
//! The modules follow the `mod.rs` orchestrator plus private `core.rs`
//! layout so each surface stays small at its re-export point.

pub mod error;
pub mod frame;
pub mod input;
pub mod layer;
pub mod logging;
pub mod metrics;
pub mod scene;
pub mod screen;
pub mod settings;
pub mod transition;

pub use error::{FrameError, Result};
pub use frame::{Frame, FrameBuilder, LayerKind};
pub use input::InputGate;
pub use layer::{
    BlockSignal, HistoryEntry, PanelLayer, PriorityLayerEntry, PriorityLayerList,
    RegisteredScreen, ScreenLayer, ScreenRegistry, WindowLayer, WindowParaLayer,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{FrameMetrics, MetricSnapshot};
pub use scene::{NodeId, SceneNode, SceneTree, SharedScene, read_scene, shared_scene, write_scene};
pub use screen::{
    BasicScreen, PanelPriority, PanelProperties, PanelTraits, ScreenController, ScreenEvent,
    ScreenEventKind, ScreenEventSender, ScreenHandle, ScreenKind, ScreenProperties,
    WindowPriority, WindowProperties, WindowTraits,
};
pub use settings::{
    FrameScaffold, FrameSettings, LogSettings, ParaLayerBlueprint, ScreenBlueprint, ScreenFactory,
};
pub use transition::{FadeDirection, FadeTransition, TransitionAnimator, TransitionCallback};
