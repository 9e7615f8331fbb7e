//! Input hit-test gate.
//!
//! The window layer raises block/unblock signals while screens transition;
//! the frame applies them here. Hosts consult the gate before routing
//! pointer and key input to screens.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::Event;

use crate::layer::BlockSignal;

/// Shared enable/disable flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct InputGate {
    blocked: Arc<AtomicBool>,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, signal: BlockSignal) {
        let blocked = matches!(signal, BlockSignal::Block);
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Whether `event` may reach screens. Key, mouse and paste input is held
    /// back while blocked; focus and resize always pass.
    pub fn admit(&self, event: &Event) -> bool {
        match event {
            Event::Key(_) | Event::Mouse(_) | Event::Paste(_) => !self.is_blocked(),
            Event::FocusGained | Event::FocusLost | Event::Resize(_, _) => true,
        }
    }
}
