//! Camera shake
//!
//! Perturbs the camera around its rest pose with a linearly fading random
//! offset. Only one shake runs at a time; a new trigger cancels the old
//! one first, and both completion and cancellation snap the camera back to
//! the exact rest pose.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::clamp01;
use crate::consts::SHAKE_RNG_STREAM;
use crate::sim::task::{TaskSlot, TaskStatus};
use crate::size::{SizeClass, SizeTable};
use crate::tuning::ShakePreset;

/// One running shake
#[derive(Debug, Clone, PartialEq)]
pub struct ShakeTask {
    pub elapsed: f32,
    pub duration: f32,
    pub magnitude: f32,
}

impl ShakeTask {
    fn new(duration: f32, magnitude: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            magnitude,
        }
    }

    /// 1 at the start, 0 once `duration` has elapsed
    pub fn damper(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        1.0 - clamp01(self.elapsed / self.duration)
    }
}

/// Owns the camera offset while a shake is running
#[derive(Debug, Clone)]
pub struct ShakeController {
    rest: Vec3,
    position: Vec3,
    presets: SizeTable<ShakePreset>,
    task: TaskSlot<ShakeTask>,
    rng: Pcg32,
    triggers: u32,
}

impl ShakeController {
    pub fn new(rest: Vec3, presets: SizeTable<ShakePreset>, seed: u64) -> Self {
        Self {
            rest,
            position: rest,
            presets,
            task: TaskSlot::new(),
            rng: Pcg32::new(seed, SHAKE_RNG_STREAM),
            triggers: 0,
        }
    }

    /// Current camera pose (rest pose when idle)
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rest_position(&self) -> Vec3 {
        self.rest
    }

    /// Move the rest pose; an idle camera follows immediately
    pub fn set_rest_position(&mut self, rest: Vec3) {
        self.rest = rest;
        if !self.is_shaking() {
            self.position = rest;
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.task.is_active()
    }

    pub fn active(&self) -> Option<&ShakeTask> {
        self.task.get()
    }

    /// Number of shakes started since construction
    pub fn trigger_count(&self) -> u32 {
        self.triggers
    }

    pub fn shake(&mut self, size: SizeClass) {
        let preset = *self.presets.get(size);
        self.trigger(preset.duration, preset.magnitude);
    }

    pub fn shake_small(&mut self) {
        self.shake(SizeClass::Small);
    }

    pub fn shake_medium(&mut self) {
        self.shake(SizeClass::Medium);
    }

    pub fn shake_big(&mut self) {
        self.shake(SizeClass::Big);
    }

    /// Start a shake, cancelling any shake already running
    pub fn trigger(&mut self, duration: f32, magnitude: f32) {
        self.cancel();
        self.task.start(ShakeTask::new(duration, magnitude));
        self.triggers += 1;
        log::debug!("Shake started ({duration:.2}s, magnitude {magnitude:.2})");
    }

    /// Stop the running shake and restore the rest pose
    pub fn cancel(&mut self) {
        if self.task.cancel().is_some() {
            self.position = self.rest;
        }
    }

    /// One frame of shake. The offset is computed from the elapsed time
    /// before this frame's `dt` is added.
    pub fn advance(&mut self, dt: f32) -> TaskStatus {
        let Self {
            rest,
            position,
            task,
            rng,
            ..
        } = self;
        task.advance(|shake| {
            if shake.elapsed < shake.duration {
                let x = rng.random_range(-1.0f32..=1.0) * shake.magnitude;
                let y = rng.random_range(-1.0f32..=1.0) * shake.magnitude;
                let damper = shake.damper();
                *position = *rest + Vec3::new(x * damper, y * damper, 0.0);
                shake.elapsed += dt;
                TaskStatus::Continuing
            } else {
                *position = *rest;
                TaskStatus::Done
            }
        })
    }
}
