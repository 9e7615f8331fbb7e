use std::time::Duration;

use crate::scene::{NodeId, SharedScene, write_scene};

use super::{TransitionAnimator, TransitionCallback};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

struct RunningFade {
    target: NodeId,
    scene: SharedScene,
    remaining: Duration,
    on_finished: TransitionCallback,
}

/// Interpolates a node's opacity between 0 and 1 over a fixed duration.
pub struct FadeTransition {
    duration: Duration,
    direction: FadeDirection,
    running: Option<RunningFade>,
}

impl FadeTransition {
    pub fn new(duration: Duration, direction: FadeDirection) -> Self {
        Self {
            duration,
            direction,
            running: None,
        }
    }

    pub fn fade_in(duration: Duration) -> Self {
        Self::new(duration, FadeDirection::In)
    }

    pub fn fade_out(duration: Duration) -> Self {
        Self::new(duration, FadeDirection::Out)
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    fn endpoints(&self) -> (f32, f32) {
        match self.direction {
            FadeDirection::In => (0.0, 1.0),
            FadeDirection::Out => (1.0, 0.0),
        }
    }

    fn set_alpha(fade: &RunningFade, alpha: f32) {
        let _ = write_scene(&fade.scene).set_alpha(fade.target, alpha);
    }
}

impl TransitionAnimator for FadeTransition {
    fn animate(&mut self, target: NodeId, scene: &SharedScene, on_finished: TransitionCallback) {
        let (start, end) = self.endpoints();

        // A fade still in flight is snapped to its end value and completed first.
        if let Some(previous) = self.running.take() {
            Self::set_alpha(&previous, end);
            (previous.on_finished)();
        }

        let fade = RunningFade {
            target,
            scene: scene.clone(),
            remaining: self.duration,
            on_finished,
        };
        Self::set_alpha(&fade, start);
        self.running = Some(fade);
    }

    fn tick(&mut self, dt: Duration) {
        let (start, end) = self.endpoints();
        let Some(fade) = self.running.as_mut() else {
            return;
        };

        fade.remaining = fade.remaining.saturating_sub(dt);
        if !fade.remaining.is_zero() {
            let t = fade.remaining.as_secs_f32() / self.duration.as_secs_f32();
            Self::set_alpha(fade, end + (start - end) * t);
            return;
        }

        if let Some(fade) = self.running.take() {
            Self::set_alpha(&fade, 1.0);
            (fade.on_finished)();
        }
    }

    fn is_running(&self) -> bool {
        self.running.is_some()
    }
}
