use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::error::{FrameError, Result};
use crate::input::InputGate;
use crate::layer::{PanelLayer, RegisteredScreen, ScreenLayer, WindowLayer};
use crate::logging::{LogLevel, Logger, json_kv, report};
use crate::metrics::{FrameMetrics, MetricSnapshot};
use crate::scene::NodeId;
use crate::screen::{PanelProperties, ScreenHandle, ScreenKind, WindowProperties};

const TARGET: &str = "frame::facade";

/// Which layer a screen id is registered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Panel,
    Window,
}

/// Assembles a [`Frame`] from fully-constructed layers.
#[derive(Default)]
pub struct FrameBuilder {
    panels: Option<PanelLayer>,
    windows: Option<WindowLayer>,
    logger: Option<Logger>,
    input: Option<InputGate>,
    metrics: Option<Arc<Mutex<FrameMetrics>>>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel_layer(mut self, layer: PanelLayer) -> Self {
        self.panels = Some(layer);
        self
    }

    pub fn window_layer(mut self, layer: WindowLayer) -> Self {
        self.windows = Some(layer);
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn input_gate(mut self, gate: InputGate) -> Self {
        self.input = Some(gate);
        self
    }

    pub fn metrics(mut self, metrics: Arc<Mutex<FrameMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Initializes both layers. Fails when either layer is missing.
    pub fn build(self) -> Result<Frame> {
        let mut panels = self
            .panels
            .ok_or(FrameError::MissingCollaborator("panel layer"))?;
        let mut windows = self
            .windows
            .ok_or(FrameError::MissingCollaborator("window layer"))?;
        let metrics = self
            .metrics
            .unwrap_or_else(|| Arc::new(Mutex::new(FrameMetrics::new())));

        panels.initialize();
        windows.initialize();
        for registry in [panels.registry_mut(), windows.registry_mut()] {
            registry.set_logger(self.logger.clone());
            registry.set_metrics(Some(metrics.clone()));
        }

        Ok(Frame {
            panels,
            windows,
            input: self.input.unwrap_or_default(),
            logger: self.logger,
            metrics,
        })
    }
}

/// Single entry point for showing, hiding and registering screens.
///
/// Requests never fail loudly: lookup misses, rejected hides and type
/// mismatches are logged and ignored. Query the frame afterwards
/// (`is_window_open`, `is_screen_registered`, ...) to observe the outcome.
pub struct Frame {
    panels: PanelLayer,
    windows: WindowLayer,
    input: InputGate,
    logger: Option<Logger>,
    metrics: Arc<Mutex<FrameMetrics>>,
}

impl Frame {
    pub fn builder() -> FrameBuilder {
        FrameBuilder::new()
    }

    pub fn panel_layer(&self) -> &PanelLayer {
        &self.panels
    }

    pub fn window_layer(&self) -> &WindowLayer {
        &self.windows
    }

    pub fn input_gate(&self) -> &InputGate {
        &self.input
    }

    pub fn is_input_blocked(&self) -> bool {
        self.input.is_blocked()
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.metrics
            .lock()
            .map(|guard| guard.snapshot())
            .unwrap_or_else(|poisoned| poisoned.into_inner().snapshot())
    }

    pub fn current_window_id(&self) -> Option<&str> {
        self.windows.current_window_id()
    }

    pub fn show_panel(&mut self, id: &str, properties: Option<PanelProperties>) {
        let _ = self.panels.show_screen_by_id(id, properties.map(Into::into));
    }

    pub fn hide_panel(&mut self, id: &str) {
        let _ = self.panels.hide_screen_by_id(id);
    }

    pub fn open_window(&mut self, id: &str, properties: Option<WindowProperties>) {
        let _ = self.windows.show_screen_by_id(id, properties.map(Into::into));
        self.sync_input_gate();
    }

    pub fn close_window(&mut self, id: &str) {
        let _ = self.windows.hide_screen_by_id(id);
        self.sync_input_gate();
    }

    pub fn close_current_window(&mut self) {
        if let Some(id) = self.windows.current_window_id().map(str::to_string) {
            self.close_window(&id);
        }
    }

    /// Open a window or show a panel, whichever layer knows `id`.
    pub fn show_screen(&mut self, id: &str) {
        match self.registered_kind(id) {
            Some(LayerKind::Window) => self.open_window(id, None),
            Some(LayerKind::Panel) => self.show_panel(id, None),
            None => self.report(
                LogLevel::Error,
                "screen_not_registered",
                [json_kv("screen_id", id)],
            ),
        }
    }

    /// Register on the layer matching the controller's kind, then parent
    /// `node` into that layer when given.
    pub fn register_screen(&mut self, id: &str, handle: ScreenHandle, node: Option<NodeId>) {
        let screen = RegisteredScreen::resolve(id, handle);
        let result = match screen.kind {
            ScreenKind::Window(_) => Self::register_on(&mut self.windows, &screen, node),
            ScreenKind::Panel(_) => Self::register_on(&mut self.panels, &screen, node),
        };
        if let Err(err) = result {
            self.report_error(&err);
        }
    }

    fn register_on<L: ScreenLayer>(
        layer: &mut L,
        screen: &RegisteredScreen,
        node: Option<NodeId>,
    ) -> Result<()> {
        layer.register_screen(&screen.id, screen.handle.clone())?;
        if let Some(node) = node {
            layer.reparent_screen(screen, node)?;
        }
        Ok(())
    }

    pub fn register_panel(&mut self, id: &str, handle: ScreenHandle) {
        let _ = self.panels.register_screen(id, handle);
    }

    pub fn unregister_panel(&mut self, id: &str, handle: &ScreenHandle) {
        self.panels.unregister_screen(id, handle);
    }

    pub fn register_window(&mut self, id: &str, handle: ScreenHandle) {
        let _ = self.windows.register_screen(id, handle);
    }

    pub fn unregister_window(&mut self, id: &str, handle: &ScreenHandle) {
        self.windows.unregister_screen(id, handle);
    }

    /// Unregister from whichever layer holds `id` under `handle`.
    pub fn unregister_screen(&mut self, id: &str, handle: &ScreenHandle) {
        if !self.windows.unregister_screen(id, handle) {
            self.panels.unregister_screen(id, handle);
        }
    }

    pub fn is_panel_open(&self, id: &str) -> bool {
        self.panels.is_panel_visible(id)
    }

    pub fn is_window_open(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.windows.current_window_id() == Some(id)
    }

    pub fn hide_all(&mut self, animate: bool) {
        self.close_all_windows(animate);
        self.hide_all_panels(animate);
    }

    pub fn hide_all_panels(&mut self, animate: bool) {
        self.panels.hide_all(animate);
    }

    pub fn close_all_windows(&mut self, animate: bool) {
        self.windows.hide_all(animate);
        self.sync_input_gate();
    }

    pub fn is_screen_registered(&self, id: &str) -> bool {
        self.registered_kind(id).is_some()
    }

    /// Layer holding `id`, windows checked first.
    pub fn registered_kind(&self, id: &str) -> Option<LayerKind> {
        if self.windows.is_screen_registered(id) {
            Some(LayerKind::Window)
        } else if self.panels.is_screen_registered(id) {
            Some(LayerKind::Panel)
        } else {
            None
        }
    }

    /// Drive one scheduler tick: advance every screen's transitions, then
    /// deliver the resulting events to both layers.
    pub fn update(&mut self, dt: Duration) {
        let screens = self
            .windows
            .registry()
            .entries()
            .into_iter()
            .chain(self.panels.registry().entries());
        for screen in screens {
            screen.handle.tick(dt);
        }
        self.process_events();
    }

    /// Deliver pending screen events without ticking. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let handled = self.windows.process_events() + self.panels.process_events();
        self.sync_input_gate();
        handled
    }

    fn sync_input_gate(&mut self) {
        for signal in self.windows.take_signals() {
            self.input.apply(signal);
        }
    }

    fn report<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        report(self.logger.as_ref(), level, TARGET, message, fields);
    }

    fn report_error(&self, error: &FrameError) {
        self.report(
            LogLevel::Error,
            "request_rejected",
            [json_kv("error", error.to_string())],
        );
    }
}
