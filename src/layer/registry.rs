use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::{FrameError, Result};
use crate::logging::{LogLevel, Logger, json_kv, report};
use crate::metrics::FrameMetrics;
use crate::scene::{NodeId, SharedScene, write_scene};
use crate::screen::{
    ScreenEvent, ScreenEventKind, ScreenEventReceiver, ScreenEventSender, ScreenHandle,
    ScreenKind, ScreenProperties, screen_channel,
};

/// Registry entry: the controller plus the capability tag resolved when it
/// was registered.
#[derive(Debug, Clone)]
pub struct RegisteredScreen {
    pub id: String,
    pub handle: ScreenHandle,
    pub kind: ScreenKind,
}

impl RegisteredScreen {
    pub fn resolve(id: impl Into<String>, handle: ScreenHandle) -> Self {
        let kind = handle.kind();
        Self {
            id: id.into(),
            handle,
            kind,
        }
    }
}

/// Id → controller table shared by both layer kinds.
pub struct ScreenRegistry {
    layer: &'static str,
    target: &'static str,
    screens: HashMap<String, RegisteredScreen>,
    scene: SharedScene,
    root: NodeId,
    sender: ScreenEventSender,
    receiver: ScreenEventReceiver,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<FrameMetrics>>>,
}

impl ScreenRegistry {
    pub fn new(layer: &'static str, target: &'static str, scene: SharedScene, root: NodeId) -> Self {
        let (sender, receiver) = screen_channel();
        Self {
            layer,
            target,
            screens: HashMap::new(),
            scene,
            root,
            sender,
            receiver,
            logger: None,
            metrics: None,
        }
    }

    pub fn layer_name(&self) -> &'static str {
        self.layer
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }

    pub fn set_logger(&mut self, logger: Option<Logger>) {
        self.logger = logger;
    }

    pub fn set_metrics(&mut self, metrics: Option<Arc<Mutex<FrameMetrics>>>) {
        self.metrics = metrics;
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        for screen in self.screens.values() {
            screen.handle.unbind();
        }
        self.screens.clear();
    }

    /// Register `handle` under `id`; a previous entry under the same id is replaced.
    pub fn insert(&mut self, id: &str, handle: ScreenHandle) -> Option<RegisteredScreen> {
        handle.bind(id, self.sender.clone());
        let entry = RegisteredScreen::resolve(id, handle);
        let previous = self.screens.insert(id.to_string(), entry);
        if let Some(previous) = previous.as_ref() {
            if !previous.handle.ptr_eq(&self.screens[id].handle) {
                previous.handle.unbind();
            }
            self.report(
                LogLevel::Debug,
                "screen_replaced",
                [json_kv("screen_id", id)],
            );
        }
        previous
    }

    /// Remove `id` only while it still maps to `handle`.
    pub fn remove(&mut self, id: &str, handle: &ScreenHandle) -> Option<RegisteredScreen> {
        match self.screens.get(id) {
            Some(entry) if entry.handle.ptr_eq(handle) => {
                let removed = self.screens.remove(id);
                handle.unbind();
                removed
            }
            Some(_) => {
                self.report(
                    LogLevel::Warn,
                    "unregister_mismatch",
                    [json_kv("screen_id", id)],
                );
                None
            }
            None => None,
        }
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredScreen> {
        self.screens.get(id)
    }

    pub fn lookup(&self, id: &str) -> Result<RegisteredScreen> {
        self.screens
            .get(id)
            .cloned()
            .ok_or_else(|| FrameError::ScreenNotFound {
                layer: self.layer,
                id: id.to_string(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.screens.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.screens.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn entries(&self) -> Vec<RegisteredScreen> {
        self.screens.values().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn event_sender(&self) -> ScreenEventSender {
        self.sender.clone()
    }

    pub fn next_event(&self) -> Option<ScreenEvent> {
        self.receiver.try_next()
    }

    /// Parent `node` directly under the layer root.
    pub fn place_under_root(&self, node: NodeId) -> Result<()> {
        write_scene(&self.scene).set_parent(node, self.root)
    }

    pub(crate) fn report<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        report(self.logger.as_ref(), level, self.target, message, fields);
    }

    pub(crate) fn report_error(&self, error: &FrameError) {
        self.report(
            LogLevel::Error,
            "request_rejected",
            [json_kv("error", error.to_string())],
        );
        self.record(FrameMetrics::record_rejected);
    }

    pub(crate) fn record(&self, update: impl FnOnce(&mut FrameMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }
}

/// Behaviour shared by the panel and window layers.
///
/// Implementors supply the registry plus their own show/hide semantics; the
/// id-based entry points, registration and event pumping are provided.
pub trait ScreenLayer {
    fn registry(&self) -> &ScreenRegistry;

    fn registry_mut(&mut self) -> &mut ScreenRegistry;

    /// Whether a screen of `kind` belongs on this layer.
    fn accepts(&self, kind: &ScreenKind) -> bool;

    fn show_screen(
        &mut self,
        screen: &RegisteredScreen,
        properties: Option<ScreenProperties>,
    ) -> Result<()>;

    fn hide_screen(&mut self, screen: &RegisteredScreen) -> Result<()>;

    /// Reset to an empty registry. Must run before the layer is used.
    fn initialize(&mut self) {
        self.registry_mut().clear();
    }

    fn register_screen(&mut self, id: &str, handle: ScreenHandle) -> Result<()> {
        let kind = handle.kind();
        if !self.accepts(&kind) {
            let err = match kind {
                ScreenKind::Panel(_) => FrameError::NotAWindow(id.to_string()),
                ScreenKind::Window(_) => FrameError::NotAPanel(id.to_string()),
            };
            self.registry().report_error(&err);
            return Err(err);
        }
        self.registry_mut().insert(id, handle);
        self.registry().report(
            LogLevel::Debug,
            "screen_registered",
            [json_kv("screen_id", id)],
        );
        Ok(())
    }

    /// Returns true when the entry was removed.
    fn unregister_screen(&mut self, id: &str, handle: &ScreenHandle) -> bool {
        self.registry_mut().remove(id, handle).is_some()
    }

    fn show_screen_by_id(&mut self, id: &str, properties: Option<ScreenProperties>) -> Result<()> {
        let screen = match self.registry().lookup(id) {
            Ok(screen) => screen,
            Err(err) => {
                self.registry().report_error(&err);
                return Err(err);
            }
        };
        self.show_screen(&screen, properties)
    }

    fn hide_screen_by_id(&mut self, id: &str) -> Result<()> {
        let screen = match self.registry().lookup(id) {
            Ok(screen) => screen,
            Err(err) => {
                self.registry().report_error(&err);
                return Err(err);
            }
        };
        self.hide_screen(&screen)
    }

    fn reparent_screen(&mut self, _screen: &RegisteredScreen, node: NodeId) -> Result<()> {
        self.registry().place_under_root(node)
    }

    /// Hide every registered screen that is currently visible.
    fn hide_all(&mut self, animate: bool) {
        for screen in self.registry().entries() {
            if screen.handle.is_visible() {
                screen.handle.hide(animate);
            }
        }
    }

    fn is_screen_registered(&self, id: &str) -> bool {
        self.registry().contains(id)
    }

    fn handle_event(&mut self, event: ScreenEvent) {
        if event.kind == ScreenEventKind::Destroyed {
            if let Some(screen) = self.registry().get(&event.screen_id).cloned() {
                self.unregister_screen(&screen.id, &screen.handle);
            }
        }
    }

    /// Deliver every pending screen event, including ones raised while
    /// handling earlier events. Returns how many were handled.
    fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.registry().next_event() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }
}
