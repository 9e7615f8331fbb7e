use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::events::ScreenEventSender;
use super::kind::{ScreenKind, ScreenProperties};

/// Contract implemented by every screen the layers manage.
///
/// Controllers never call back into a layer directly. Transition completion,
/// close requests and destruction are reported through the
/// [`ScreenEventSender`] the layer attaches on registration, exactly once
/// per occurrence.
pub trait ScreenController: Send {
    fn screen_id(&self) -> &str;

    fn set_screen_id(&mut self, id: &str);

    fn kind(&self) -> ScreenKind;

    fn is_visible(&self) -> bool;

    fn show(&mut self, properties: Option<&ScreenProperties>);

    fn hide(&mut self, animate: bool);

    fn attach(&mut self, events: ScreenEventSender);

    fn detach(&mut self) {}

    /// Advance any running transition.
    fn tick(&mut self, _dt: Duration) {}
}

/// Shared, identity-comparable handle to a screen controller.
#[derive(Clone)]
pub struct ScreenHandle {
    inner: Arc<Mutex<dyn ScreenController>>,
}

impl ScreenHandle {
    pub fn new<C>(controller: C) -> Self
    where
        C: ScreenController + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, dyn ScreenController + 'static> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ptr_eq(&self, other: &ScreenHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn kind(&self) -> ScreenKind {
        self.lock().kind()
    }

    pub fn is_visible(&self) -> bool {
        self.lock().is_visible()
    }

    pub fn show(&self, properties: Option<&ScreenProperties>) {
        self.lock().show(properties);
    }

    pub fn hide(&self, animate: bool) {
        self.lock().hide(animate);
    }

    pub fn tick(&self, dt: Duration) {
        self.lock().tick(dt);
    }

    pub(crate) fn bind(&self, id: &str, events: ScreenEventSender) {
        let mut guard = self.lock();
        guard.set_screen_id(id);
        guard.attach(events);
    }

    pub(crate) fn unbind(&self) {
        self.lock().detach();
    }
}

impl<C> From<Arc<Mutex<C>>> for ScreenHandle
where
    C: ScreenController + 'static,
{
    fn from(inner: Arc<Mutex<C>>) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for ScreenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self.inner.try_lock() {
            Ok(guard) => guard.screen_id().to_string(),
            Err(_) => "<locked>".to_string(),
        };
        f.debug_struct("ScreenHandle").field("id", &id).finish()
    }
}
