#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use ui_frame::{
    Frame, FrameScaffold, Logger, MemorySink, NodeId, PanelPriority, ParaLayerBlueprint,
    ScreenController, ScreenEventKind, ScreenEventSender, ScreenHandle, ScreenKind,
    ScreenProperties, SharedScene, shared_scene, write_scene,
};

#[derive(Default)]
struct ProbeState {
    id: String,
    visible: bool,
    calls: Vec<String>,
    events: Option<ScreenEventSender>,
    last_properties: Option<ScreenProperties>,
}

/// Test-side view of a [`RecordingScreen`]. Clones share state with the
/// controller registered in the frame.
#[derive(Clone, Default)]
pub struct Probe {
    state: Arc<Mutex<ProbeState>>,
}

impl Probe {
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().unwrap().visible
    }

    pub fn last_properties(&self) -> Option<ScreenProperties> {
        self.state.lock().unwrap().last_properties.clone()
    }

    /// Report an event to the owning layer as the screen would.
    pub fn emit(&self, kind: ScreenEventKind) {
        let state = self.state.lock().unwrap();
        if let Some(events) = state.events.as_ref() {
            events.send(&state.id, kind);
        }
    }

    pub fn finish_in(&self) {
        self.emit(ScreenEventKind::InTransitionFinished);
    }

    pub fn finish_out(&self) {
        self.state.lock().unwrap().visible = false;
        self.emit(ScreenEventKind::OutTransitionFinished);
    }
}

/// Controller that records every call. With `deferred` set, transitions
/// only finish when the test calls [`Probe::finish_in`] / [`Probe::finish_out`].
pub struct RecordingScreen {
    id: String,
    kind: ScreenKind,
    deferred: bool,
    probe: Probe,
}

impl RecordingScreen {
    pub fn new(kind: ScreenKind) -> (Self, Probe) {
        let probe = Probe::default();
        (
            Self {
                id: String::new(),
                kind,
                deferred: false,
                probe: probe.clone(),
            },
            probe,
        )
    }

    pub fn deferred(kind: ScreenKind) -> (Self, Probe) {
        let (mut screen, probe) = Self::new(kind);
        screen.deferred = true;
        (screen, probe)
    }

    fn record(&self, call: &str) {
        self.probe.state.lock().unwrap().calls.push(call.to_string());
    }
}

impl ScreenController for RecordingScreen {
    fn screen_id(&self) -> &str {
        &self.id
    }

    fn set_screen_id(&mut self, id: &str) {
        self.id = id.to_string();
        self.probe.state.lock().unwrap().id = id.to_string();
    }

    fn kind(&self) -> ScreenKind {
        self.kind
    }

    fn is_visible(&self) -> bool {
        self.probe.is_visible()
    }

    fn show(&mut self, properties: Option<&ScreenProperties>) {
        self.record("show");
        {
            let mut state = self.probe.state.lock().unwrap();
            state.visible = true;
            state.last_properties = properties.cloned();
        }
        if !self.deferred {
            self.probe.finish_in();
        }
    }

    fn hide(&mut self, animate: bool) {
        self.record(if animate { "hide" } else { "hide_now" });
        if !self.deferred {
            self.probe.finish_out();
        }
    }

    fn attach(&mut self, events: ScreenEventSender) {
        self.record("attach");
        self.probe.state.lock().unwrap().events = Some(events);
    }

    fn detach(&mut self) {
        self.record("detach");
        self.probe.state.lock().unwrap().events = None;
    }
}

pub struct Harness {
    pub scene: SharedScene,
    pub frame: Frame,
    pub sink: MemorySink,
}

impl Harness {
    pub fn new() -> Self {
        let scene = shared_scene();
        let scaffold = FrameScaffold::build(
            &scene,
            &[
                ParaLayerBlueprint::new(PanelPriority::None, "PanelLayer"),
                ParaLayerBlueprint::new(PanelPriority::Prioritary, "PriorityPanelLayer"),
            ],
        )
        .unwrap();
        let sink = MemorySink::new();
        let frame = Frame::builder()
            .panel_layer(scaffold.panel_layer)
            .window_layer(scaffold.window_layer)
            .logger(Logger::new(sink.clone()))
            .build()
            .unwrap();
        Self { scene, frame, sink }
    }

    pub fn register(&mut self, id: &str, kind: ScreenKind) -> (ScreenHandle, Probe) {
        let (screen, probe) = RecordingScreen::new(kind);
        let handle = ScreenHandle::new(screen);
        self.frame.register_screen(id, handle.clone(), None);
        (handle, probe)
    }

    pub fn register_deferred(&mut self, id: &str, kind: ScreenKind) -> (ScreenHandle, Probe) {
        let (screen, probe) = RecordingScreen::deferred(kind);
        let handle = ScreenHandle::new(screen);
        self.frame.register_screen(id, handle.clone(), None);
        (handle, probe)
    }

    /// Node created inactive and unparented, ready for registration.
    pub fn node(&self, name: &str) -> NodeId {
        let mut tree = write_scene(&self.scene);
        let node = tree.create_node(name, None).unwrap();
        tree.set_active(node, false).unwrap();
        node
    }
}
