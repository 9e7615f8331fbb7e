use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::scene::{NodeId, SharedScene, read_scene, write_scene};
use crate::transition::{TransitionAnimator, TransitionCallback};

use super::controller::ScreenController;
use super::events::{ScreenEventKind, ScreenEventSender};
use super::kind::{ScreenKind, ScreenProperties};

/// Ready-made controller backed by a scene node and optional in/out animators.
///
/// Without an animator the node is toggled immediately and the matching
/// transition event is sent during the `show`/`hide` call itself.
pub struct BasicScreen {
    id: String,
    kind: ScreenKind,
    node: NodeId,
    scene: SharedScene,
    animation_in: Option<Box<dyn TransitionAnimator>>,
    animation_out: Option<Box<dyn TransitionAnimator>>,
    visible: Arc<AtomicBool>,
    events: Option<ScreenEventSender>,
    properties: Option<ScreenProperties>,
}

impl BasicScreen {
    pub fn new(kind: ScreenKind, node: NodeId, scene: SharedScene) -> Self {
        Self {
            id: String::new(),
            kind,
            node,
            scene,
            animation_in: None,
            animation_out: None,
            visible: Arc::new(AtomicBool::new(false)),
            events: None,
            properties: None,
        }
    }

    pub fn with_animation_in(mut self, animator: impl TransitionAnimator + 'static) -> Self {
        self.animation_in = Some(Box::new(animator));
        self
    }

    pub fn with_animation_out(mut self, animator: impl TransitionAnimator + 'static) -> Self {
        self.animation_out = Some(Box::new(animator));
        self
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Properties from the most recent `show` call that carried any.
    pub fn properties(&self) -> Option<&ScreenProperties> {
        self.properties.as_ref()
    }

    /// Ask the owning layer to close this screen.
    pub fn request_close(&self) {
        self.emit(ScreenEventKind::CloseRequest);
    }

    /// Tell the owning layer this screen is gone; it will be unregistered.
    pub fn destroy(&mut self) {
        self.emit(ScreenEventKind::Destroyed);
        self.events = None;
    }

    fn emit(&self, kind: ScreenEventKind) {
        if let Some(events) = self.events.as_ref() {
            events.send(&self.id, kind);
        }
    }

    fn completion(&self, becomes_visible: bool) -> TransitionCallback {
        let visible = self.visible.clone();
        let events = self.events.clone();
        let scene = self.scene.clone();
        let node = self.node;
        let id = self.id.clone();
        Box::new(move || {
            let kind = if becomes_visible {
                visible.store(true, Ordering::SeqCst);
                ScreenEventKind::InTransitionFinished
            } else {
                let _ = write_scene(&scene).set_active(node, false);
                visible.store(false, Ordering::SeqCst);
                ScreenEventKind::OutTransitionFinished
            };
            if let Some(events) = events {
                events.send(&id, kind);
            }
        })
    }

    fn run_transition(&mut self, becomes_visible: bool, animate: bool) {
        let on_finished = self.completion(becomes_visible);
        let animator = if becomes_visible {
            self.animation_in.as_mut()
        } else {
            self.animation_out.as_mut()
        };

        match animator {
            Some(animator) if animate => {
                if becomes_visible {
                    let _ = write_scene(&self.scene).set_active(self.node, true);
                }
                animator.animate(self.node, &self.scene, on_finished);
            }
            _ => {
                let _ = write_scene(&self.scene).set_active(self.node, becomes_visible);
                on_finished();
            }
        }
    }
}

impl ScreenController for BasicScreen {
    fn screen_id(&self) -> &str {
        &self.id
    }

    fn set_screen_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn kind(&self) -> ScreenKind {
        self.kind
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn show(&mut self, properties: Option<&ScreenProperties>) {
        if let Some(properties) = properties {
            self.properties = Some(properties.clone());
        }
        if matches!(self.kind, ScreenKind::Window(_)) {
            let _ = write_scene(&self.scene).set_as_last_sibling(self.node);
        }
        let already_active = read_scene(&self.scene).is_active(self.node).unwrap_or(false);
        if already_active {
            self.visible.store(true, Ordering::SeqCst);
            self.emit(ScreenEventKind::InTransitionFinished);
        } else {
            self.run_transition(true, true);
        }
    }

    fn hide(&mut self, animate: bool) {
        self.run_transition(false, animate);
    }

    fn attach(&mut self, events: ScreenEventSender) {
        self.events = Some(events);
    }

    fn detach(&mut self) {
        self.events = None;
    }

    fn tick(&mut self, dt: Duration) {
        if let Some(animator) = self.animation_in.as_mut() {
            animator.tick(dt);
        }
        if let Some(animator) = self.animation_out.as_mut() {
            animator.tick(dt);
        }
    }
}
