//! Transition animators.
//!
//! An animator receives a scene node and a completion callback, drives a
//! visual effect from explicit [`TransitionAnimator::tick`] calls, and
//! invokes the callback exactly once when the effect ends.

mod fade;

pub use fade::{FadeDirection, FadeTransition};

use std::time::Duration;

use crate::scene::{NodeId, SharedScene};

pub type TransitionCallback = Box<dyn FnOnce() + Send>;

pub trait TransitionAnimator: Send {
    fn animate(&mut self, target: NodeId, scene: &SharedScene, on_finished: TransitionCallback);

    fn tick(&mut self, dt: Duration);

    fn is_running(&self) -> bool;
}
