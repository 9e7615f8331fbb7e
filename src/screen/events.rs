use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Lifecycle notification a screen sends back to the layer that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEventKind {
    InTransitionFinished,
    OutTransitionFinished,
    CloseRequest,
    Destroyed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenEvent {
    pub screen_id: String,
    pub kind: ScreenEventKind,
}

impl ScreenEvent {
    pub fn new(screen_id: impl Into<String>, kind: ScreenEventKind) -> Self {
        Self {
            screen_id: screen_id.into(),
            kind,
        }
    }
}

/// Sending half handed to each screen on registration.
#[derive(Debug, Clone)]
pub struct ScreenEventSender {
    inner: Sender<ScreenEvent>,
}

impl ScreenEventSender {
    /// Returns false once the owning layer is gone.
    pub fn send(&self, screen_id: &str, kind: ScreenEventKind) -> bool {
        self.inner.send(ScreenEvent::new(screen_id, kind)).is_ok()
    }
}

/// Receiving half kept by the layer.
#[derive(Debug)]
pub struct ScreenEventReceiver {
    inner: Receiver<ScreenEvent>,
}

impl ScreenEventReceiver {
    pub fn try_next(&self) -> Option<ScreenEvent> {
        match self.inner.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

pub fn screen_channel() -> (ScreenEventSender, ScreenEventReceiver) {
    let (tx, rx) = mpsc::channel();
    (
        ScreenEventSender { inner: tx },
        ScreenEventReceiver { inner: rx },
    )
}
