use std::collections::{HashSet, VecDeque};

use crate::error::{FrameError, Result};
use crate::logging::{LogLevel, json_kv};
use crate::metrics::FrameMetrics;
use crate::scene::{NodeId, SharedScene};
use crate::screen::{
    ScreenEvent, ScreenEventKind, ScreenHandle, ScreenKind, ScreenProperties, WindowPriority,
    WindowProperties, WindowTraits,
};

use super::para::WindowParaLayer;
use super::registry::{RegisteredScreen, ScreenLayer, ScreenRegistry};

/// Request to disable or re-enable input while screens are transitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSignal {
    Block,
    Unblock,
}

/// A window paired with the properties it was opened with.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    screen_id: String,
    handle: ScreenHandle,
    properties: Option<WindowProperties>,
    traits: WindowTraits,
}

impl HistoryEntry {
    fn new(screen: &RegisteredScreen, properties: Option<WindowProperties>) -> Self {
        let declared = screen.kind.as_window().copied().unwrap_or_default();
        let traits = properties
            .as_ref()
            .map(|props| props.effective_traits(declared))
            .unwrap_or(declared);
        Self {
            screen_id: screen.id.clone(),
            handle: screen.handle.clone(),
            properties,
            traits,
        }
    }

    pub fn screen_id(&self) -> &str {
        &self.screen_id
    }

    pub fn handle(&self) -> &ScreenHandle {
        &self.handle
    }

    pub fn properties(&self) -> Option<&WindowProperties> {
        self.properties.as_ref()
    }

    pub fn traits(&self) -> WindowTraits {
        self.traits
    }

    fn show(&self) {
        let properties = self.properties.clone().map(ScreenProperties::Window);
        self.handle.show(properties.as_ref());
    }
}

/// Exclusive screens: one foreground window, a pending queue, and a history
/// stack for back navigation. Popups are routed into the overlay para-layer.
pub struct WindowLayer {
    registry: ScreenRegistry,
    para_layer: WindowParaLayer,
    current: Option<HistoryEntry>,
    history: Vec<HistoryEntry>,
    queue: VecDeque<HistoryEntry>,
    transitioning: HashSet<String>,
    closing_popups: HashSet<String>,
    signals: Vec<BlockSignal>,
}

impl WindowLayer {
    pub const TARGET: &'static str = "frame::window";

    pub fn new(scene: SharedScene, root: NodeId, para_layer: WindowParaLayer) -> Self {
        Self {
            registry: ScreenRegistry::new("window", Self::TARGET, scene, root),
            para_layer,
            current: None,
            history: Vec::new(),
            queue: VecDeque::new(),
            transitioning: HashSet::new(),
            closing_popups: HashSet::new(),
            signals: Vec::new(),
        }
    }

    pub fn current_window(&self) -> Option<&HistoryEntry> {
        self.current.as_ref()
    }

    pub fn current_window_id(&self) -> Option<&str> {
        self.current.as_ref().map(HistoryEntry::screen_id)
    }

    /// History from bottom to top.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_ids(&self) -> Vec<&str> {
        self.history.iter().map(HistoryEntry::screen_id).collect()
    }

    pub fn queue_ids(&self) -> Vec<&str> {
        self.queue.iter().map(HistoryEntry::screen_id).collect()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_transition_in_progress(&self) -> bool {
        !self.transitioning.is_empty()
    }

    pub fn is_transitioning(&self, id: &str) -> bool {
        self.transitioning.contains(id)
    }

    pub fn para_layer(&self) -> &WindowParaLayer {
        &self.para_layer
    }

    /// Block/unblock requests raised since the last call.
    pub fn take_signals(&mut self) -> Vec<BlockSignal> {
        std::mem::take(&mut self.signals)
    }

    fn should_enqueue(&self, screen: &RegisteredScreen, properties: Option<&WindowProperties>) -> bool {
        if self.current.is_none() && self.queue.is_empty() {
            return false;
        }

        if let Some(props) = properties.filter(|props| props.suppress_defaults) {
            return props.priority != WindowPriority::ForceForeground;
        }

        let declared = screen.kind.as_window().map(|traits| traits.priority);
        declared != Some(WindowPriority::ForceForeground)
    }

    fn do_show(&mut self, entry: HistoryEntry) {
        if let Some(current) = self.current.as_ref() {
            if current.handle.ptr_eq(&entry.handle) {
                self.registry.report(
                    LogLevel::Warn,
                    "duplicate_open",
                    [json_kv("screen_id", entry.screen_id.as_str())],
                );
            } else if current.traits.hide_on_foreground_lost && !entry.traits.is_popup {
                if current.traits.is_popup {
                    self.closing_popups.insert(current.screen_id.clone());
                }
                current.handle.hide(true);
                self.registry.record(FrameMetrics::record_window_hidden);
            }
        }

        self.history.push(entry.clone());
        self.add_transition(&entry.screen_id);

        if entry.traits.is_popup {
            self.para_layer.darken_bg();
        }

        entry.show();
        self.registry.record(FrameMetrics::record_window_shown);
        self.registry.report(
            LogLevel::Debug,
            "window_shown",
            [
                json_kv("screen_id", entry.screen_id.as_str()),
                json_kv("history", self.history.len()),
                json_kv("popup", entry.traits.is_popup),
            ],
        );
        self.current = Some(entry);
    }

    fn add_transition(&mut self, id: &str) {
        if self.transitioning.insert(id.to_string()) && self.transitioning.len() == 1 {
            self.signals.push(BlockSignal::Block);
            self.registry.record(FrameMetrics::record_input_block);
            self.registry.report(LogLevel::Debug, "input_blocked", [json_kv("screen_id", id)]);
        }
    }

    fn remove_transition(&mut self, id: &str) {
        if self.transitioning.remove(id) && self.transitioning.is_empty() {
            self.signals.push(BlockSignal::Unblock);
            self.registry.report(LogLevel::Debug, "input_unblocked", [json_kv("screen_id", id)]);
        }
    }

    /// Popup-ness follows the traits the window was opened with, which may
    /// differ from the declared kind when properties suppress defaults.
    fn on_out_transition_finished(&mut self, id: &str) {
        self.remove_transition(id);
        let opened_as_popup = self.closing_popups.remove(id);
        let declared_popup = self
            .registry
            .get(id)
            .is_some_and(|screen| screen.kind.is_popup());
        if opened_as_popup || declared_popup {
            self.para_layer.refresh_darken();
        }
    }

    fn on_close_requested(&mut self, id: &str) {
        let Some(screen) = self.registry.get(id).cloned() else {
            return;
        };
        // Rejections are already reported by hide_screen.
        let _ = self.hide_screen(&screen);
    }
}

impl ScreenLayer for WindowLayer {
    fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut ScreenRegistry {
        &mut self.registry
    }

    fn accepts(&self, kind: &ScreenKind) -> bool {
        matches!(kind, ScreenKind::Window(_))
    }

    fn initialize(&mut self) {
        self.registry.clear();
        self.current = None;
        self.history.clear();
        self.queue.clear();
        self.transitioning.clear();
        self.closing_popups.clear();
        self.signals.clear();
    }

    fn show_screen(
        &mut self,
        screen: &RegisteredScreen,
        properties: Option<ScreenProperties>,
    ) -> Result<()> {
        let properties = match properties {
            Some(ScreenProperties::Window(props)) => Some(props),
            _ => None,
        };

        if self.should_enqueue(screen, properties.as_ref()) {
            self.queue.push_back(HistoryEntry::new(screen, properties));
            self.registry.record(FrameMetrics::record_window_enqueued);
            self.registry.report(
                LogLevel::Debug,
                "window_enqueued",
                [
                    json_kv("screen_id", screen.id.as_str()),
                    json_kv("queue", self.queue.len()),
                ],
            );
        } else {
            self.do_show(HistoryEntry::new(screen, properties));
        }
        Ok(())
    }

    fn hide_screen(&mut self, screen: &RegisteredScreen) -> Result<()> {
        let current_traits = self
            .current
            .as_ref()
            .filter(|current| current.handle.ptr_eq(&screen.handle))
            .map(HistoryEntry::traits);
        let Some(traits) = current_traits else {
            let err = FrameError::NotCurrentWindow {
                requested: screen.id.clone(),
                current: self.current_window_id().map(str::to_string),
            };
            self.registry.report_error(&err);
            return Err(err);
        };

        if traits.is_popup {
            self.closing_popups.insert(screen.id.clone());
        }
        self.history.pop();
        self.add_transition(&screen.id);
        screen.handle.hide(true);
        self.current = None;
        self.registry.record(FrameMetrics::record_window_hidden);
        self.registry.report(
            LogLevel::Debug,
            "window_hidden",
            [json_kv("screen_id", screen.id.as_str())],
        );

        if let Some(next) = self.queue.pop_front() {
            self.do_show(next);
        } else if let Some(previous) = self.history.pop() {
            self.do_show(previous);
        }
        Ok(())
    }

    fn reparent_screen(&mut self, screen: &RegisteredScreen, node: NodeId) -> Result<()> {
        match screen.kind {
            ScreenKind::Window(traits) if traits.is_popup => self.para_layer.add_screen(node),
            ScreenKind::Window(_) => self.registry.place_under_root(node),
            ScreenKind::Panel(_) => {
                self.registry
                    .report_error(&FrameError::NotAWindow(screen.id.clone()));
                self.registry.place_under_root(node)
            }
        }
    }

    /// Hides every visible window and resets the foreground and history.
    /// Queued windows are kept.
    fn hide_all(&mut self, animate: bool) {
        let popups = self
            .current
            .iter()
            .chain(self.history.iter())
            .filter(|entry| entry.traits.is_popup && entry.handle.is_visible())
            .map(|entry| entry.screen_id.clone())
            .collect::<Vec<_>>();
        self.closing_popups.extend(popups);
        for screen in self.registry.entries() {
            if screen.handle.is_visible() {
                screen.handle.hide(animate);
            }
        }
        self.current = None;
        self.para_layer.refresh_darken();
        self.history.clear();
    }

    fn handle_event(&mut self, event: ScreenEvent) {
        match event.kind {
            ScreenEventKind::InTransitionFinished => self.remove_transition(&event.screen_id),
            ScreenEventKind::OutTransitionFinished => {
                self.on_out_transition_finished(&event.screen_id)
            }
            ScreenEventKind::CloseRequest => self.on_close_requested(&event.screen_id),
            ScreenEventKind::Destroyed => {
                if let Some(screen) = self.registry.get(&event.screen_id).cloned() {
                    self.unregister_screen(&screen.id, &screen.handle);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{read_scene, shared_scene, write_scene};
    use crate::screen::{BasicScreen, PanelPriority};

    struct Fixture {
        scene: SharedScene,
        layer: WindowLayer,
    }

    impl Fixture {
        fn new() -> Self {
            let scene = shared_scene();
            let (window_root, para_root, darken) = {
                let mut tree = write_scene(&scene);
                let root = tree.create_node("UIFrame", None).unwrap();
                let window_root = tree.create_node("WindowLayer", Some(root)).unwrap();
                let para_root = tree.create_node("PriorityWindowLayer", Some(root)).unwrap();
                let darken = tree.create_node("DarkenBG", Some(para_root)).unwrap();
                tree.set_active(darken, false).unwrap();
                (window_root, para_root, darken)
            };
            let para = WindowParaLayer::new(scene.clone(), para_root, darken).unwrap();
            let mut layer = WindowLayer::new(scene.clone(), window_root, para);
            layer.initialize();
            Self { scene, layer }
        }

        fn window(&mut self, id: &str, traits: WindowTraits) -> ScreenHandle {
            self.screen(id, ScreenKind::window(traits))
        }

        fn screen(&mut self, id: &str, kind: ScreenKind) -> ScreenHandle {
            let node = {
                let mut tree = write_scene(&self.scene);
                let node = tree.create_node(id, None).unwrap();
                tree.set_active(node, false).unwrap();
                node
            };
            let handle = ScreenHandle::new(BasicScreen::new(kind, node, self.scene.clone()));
            if self.layer.register_screen(id, handle.clone()).is_ok() {
                let screen = self.layer.registry().lookup(id).unwrap();
                self.layer.reparent_screen(&screen, node).unwrap();
            }
            handle
        }
    }

    fn forced() -> WindowTraits {
        WindowTraits::default()
    }

    fn queued() -> WindowTraits {
        WindowTraits::default().with_priority(WindowPriority::Enqueue)
    }

    #[test]
    fn first_window_shows_immediately() {
        let mut fx = Fixture::new();
        fx.window("a", queued());
        fx.layer.show_screen_by_id("a", None).unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("a"));
        assert_eq!(fx.layer.history_ids(), vec!["a"]);
        assert_eq!(fx.layer.queue_len(), 0);
    }

    #[test]
    fn enqueued_window_waits_for_current_to_close() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.window("b", queued());

        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("b", None).unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("a"));
        assert_eq!(fx.layer.queue_ids(), vec!["b"]);

        fx.layer.hide_screen_by_id("a").unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("b"));
        assert_eq!(fx.layer.history_ids(), vec!["b"]);
        assert_eq!(fx.layer.queue_len(), 0);
    }

    #[test]
    fn force_foreground_replaces_current_and_hides_it() {
        let mut fx = Fixture::new();
        let a = fx.window("a", forced());
        fx.window("b", forced());

        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("b", None).unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("b"));
        assert_eq!(fx.layer.history_ids(), vec!["a", "b"]);
        assert!(!a.is_visible());
    }

    #[test]
    fn back_navigation_reshows_previous_without_growing_history() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.window("b", forced());

        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("b", None).unwrap();
        fx.layer.hide_screen_by_id("b").unwrap();

        assert_eq!(fx.layer.current_window_id(), Some("a"));
        assert_eq!(fx.layer.history_ids(), vec!["a"]);
    }

    #[test]
    fn queue_beats_history_on_close() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.window("b", forced());
        fx.window("c", queued());

        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("b", None).unwrap();
        fx.layer.show_screen_by_id("c", None).unwrap();
        assert_eq!(fx.layer.history_ids(), vec!["a", "b"]);

        fx.layer.hide_screen_by_id("b").unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("c"));
        assert_eq!(fx.layer.history_ids(), vec!["a", "c"]);
    }

    #[test]
    fn suppressed_properties_override_declared_priority() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.window("b", queued());
        fx.window("c", forced());

        fx.layer.show_screen_by_id("a", None).unwrap();
        let force = WindowProperties::new(WindowPriority::ForceForeground).suppressing_defaults();
        fx.layer.show_screen_by_id("b", Some(force.into())).unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("b"));

        let enqueue = WindowProperties::new(WindowPriority::Enqueue).suppressing_defaults();
        fx.layer.show_screen_by_id("c", Some(enqueue.into())).unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("b"));
        assert_eq!(fx.layer.queue_ids(), vec!["c"]);

        // Without suppression the declared priority decides.
        fx.window("d", queued());
        let ignored = WindowProperties::new(WindowPriority::ForceForeground);
        fx.layer.show_screen_by_id("d", Some(ignored.into())).unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("b"));
        assert_eq!(fx.layer.queue_ids(), vec!["c", "d"]);
    }

    #[test]
    fn non_empty_queue_enqueues_even_without_current() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.window("b", queued());
        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("b", None).unwrap();
        fx.layer.hide_all(false);
        assert_eq!(fx.layer.current_window_id(), None);
        assert_eq!(fx.layer.queue_ids(), vec!["b"]);

        fx.window("c", queued());
        fx.layer.show_screen_by_id("c", None).unwrap();
        assert_eq!(fx.layer.current_window_id(), None);
        assert_eq!(fx.layer.queue_ids(), vec!["b", "c"]);
    }

    #[test]
    fn hiding_a_background_window_is_rejected() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.window("b", forced());
        fx.layer.show_screen_by_id("a", None).unwrap();

        let err = fx.layer.hide_screen_by_id("b").unwrap_err();
        assert!(matches!(
            err,
            FrameError::NotCurrentWindow { ref requested, current: Some(ref current) }
                if requested == "b" && current == "a"
        ));
        assert_eq!(fx.layer.current_window_id(), Some("a"));
        assert_eq!(fx.layer.history_ids(), vec!["a"]);
    }

    #[test]
    fn duplicate_open_pushes_second_history_entry() {
        let mut fx = Fixture::new();
        let a = fx.window("a", forced());
        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("a", None).unwrap();
        assert_eq!(fx.layer.history_ids(), vec!["a", "a"]);
        assert!(a.is_visible());

        fx.layer.hide_screen_by_id("a").unwrap();
        assert_eq!(fx.layer.current_window_id(), Some("a"));
        assert_eq!(fx.layer.history_ids(), vec!["a"]);
    }

    #[test]
    fn popup_keeps_background_window_and_darkens() {
        let mut fx = Fixture::new();
        let a = fx.window("a", forced().with_hide_on_foreground_lost(false));
        fx.window("p", WindowTraits::popup());

        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("p", None).unwrap();

        assert_eq!(fx.layer.current_window_id(), Some("p"));
        assert!(a.is_visible());
        assert!(fx.layer.para_layer().is_darkened());

        let tree = read_scene(&fx.scene);
        let para_children = tree.children_of(fx.layer.para_layer().root()).unwrap();
        assert_eq!(para_children.len(), 2);
        assert_eq!(tree.node(*para_children.last().unwrap()).unwrap().name, "p");
    }

    #[test]
    fn closing_popup_refreshes_darken_after_out_transition() {
        let mut fx = Fixture::new();
        fx.window("a", forced().with_hide_on_foreground_lost(false));
        fx.window("p", WindowTraits::popup());
        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("p", None).unwrap();
        fx.layer.process_events();

        fx.layer.hide_screen_by_id("p").unwrap();
        fx.layer.process_events();
        assert!(!fx.layer.para_layer().is_darkened());
        assert_eq!(fx.layer.current_window_id(), Some("a"));
    }

    #[test]
    fn popup_opened_through_properties_clears_darken_on_close() {
        let mut fx = Fixture::new();
        fx.window("w", forced());
        let as_popup = WindowProperties::new(WindowPriority::ForceForeground)
            .with_popup(true)
            .suppressing_defaults();

        fx.layer.show_screen_by_id("w", Some(as_popup.clone().into())).unwrap();
        fx.layer.process_events();
        assert!(fx.layer.para_layer().is_darkened());

        fx.layer.hide_screen_by_id("w").unwrap();
        fx.layer.process_events();
        assert_eq!(fx.layer.current_window_id(), None);
        assert!(!fx.layer.para_layer().is_darkened());

        fx.layer.show_screen_by_id("w", Some(as_popup.into())).unwrap();
        fx.layer.process_events();
        assert!(fx.layer.para_layer().is_darkened());
        fx.layer.hide_all(true);
        fx.layer.process_events();
        assert!(!fx.layer.para_layer().is_darkened());
    }

    #[test]
    fn block_signals_follow_transitioning_set_edges() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.layer.show_screen_by_id("a", None).unwrap();
        assert!(fx.layer.is_transition_in_progress());
        assert_eq!(fx.layer.take_signals(), vec![BlockSignal::Block]);

        fx.layer.process_events();
        assert!(!fx.layer.is_transition_in_progress());
        assert_eq!(fx.layer.take_signals(), vec![BlockSignal::Unblock]);

        fx.layer.process_events();
        assert!(fx.layer.take_signals().is_empty());
    }

    #[test]
    fn close_request_routes_to_hide() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.window("b", forced());
        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("b", None).unwrap();
        fx.layer.process_events();

        let sender = fx.layer.registry().event_sender();
        sender.send("b", ScreenEventKind::CloseRequest);
        fx.layer.process_events();
        assert_eq!(fx.layer.current_window_id(), Some("a"));

        // A close request from a background window is rejected.
        fx.layer.show_screen_by_id("b", None).unwrap();
        sender.send("a", ScreenEventKind::CloseRequest);
        fx.layer.process_events();
        assert_eq!(fx.layer.current_window_id(), Some("b"));
    }

    #[test]
    fn panels_are_rejected_and_reparent_falls_back() {
        let mut fx = Fixture::new();
        let panel = fx.screen("hud", ScreenKind::panel(PanelPriority::None));
        assert!(!fx.layer.is_screen_registered("hud"));

        let node = write_scene(&fx.scene).create_node("stray", None).unwrap();
        let entry = RegisteredScreen::resolve("hud", panel);
        fx.layer.reparent_screen(&entry, node).unwrap();
        assert_eq!(
            read_scene(&fx.scene).parent_of(node).unwrap(),
            Some(fx.layer.registry().root())
        );
    }

    #[test]
    fn hide_all_twice_is_idempotent() {
        let mut fx = Fixture::new();
        fx.window("a", forced());
        fx.window("b", forced());
        fx.layer.show_screen_by_id("a", None).unwrap();
        fx.layer.show_screen_by_id("b", None).unwrap();

        fx.layer.hide_all(false);
        let first = (
            fx.layer.registry().ids(),
            fx.layer.current_window_id().map(str::to_string),
            fx.layer.history().len(),
        );
        fx.layer.hide_all(false);
        let second = (
            fx.layer.registry().ids(),
            fx.layer.current_window_id().map(str::to_string),
            fx.layer.history().len(),
        );
        assert_eq!(first, second);
        assert_eq!(second.1, None);
        assert_eq!(second.2, 0);
    }
}
