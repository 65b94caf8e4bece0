//! Tick-driven animation tasks
//!
//! Every timed effect is an explicit task object advanced once per frame.
//! A task reports `Continuing` until its last frame, then `Done`. Services
//! that allow a single active effect keep it in a `TaskSlot`.

/// Result of advancing a task by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Continuing,
    Done,
}

impl TaskStatus {
    pub fn is_done(&self) -> bool {
        *self == TaskStatus::Done
    }
}

/// Frame timing handed to every service
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Simulation seconds (affected by time scale)
    pub delta: f32,
    /// Wall-clock seconds (ignores time scale)
    pub unscaled_delta: f32,
}

impl FrameTime {
    /// Frame with no time scaling
    pub fn fixed(dt: f32) -> Self {
        Self {
            delta: dt,
            unscaled_delta: dt,
        }
    }

    /// Frame with simulation time scaled by `time_scale`
    pub fn scaled(dt: f32, time_scale: f32) -> Self {
        Self {
            delta: dt * time_scale,
            unscaled_delta: dt,
        }
    }
}

/// Holds at most one active task
#[derive(Debug, Clone)]
pub struct TaskSlot<T> {
    active: Option<T>,
}

impl<T> Default for TaskSlot<T> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<T> TaskSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.active.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.active.as_mut()
    }

    /// Install `task`, handing back the task it replaced (already cancelled:
    /// it is no longer reachable from the slot and will never tick again)
    pub fn start(&mut self, task: T) -> Option<T> {
        self.active.replace(task)
    }

    /// Drop the active task without running it
    pub fn cancel(&mut self) -> Option<T> {
        self.active.take()
    }

    /// Advance the active task; the slot empties when it reports `Done`
    pub fn advance(&mut self, step: impl FnOnce(&mut T) -> TaskStatus) -> TaskStatus {
        let Some(task) = self.active.as_mut() else {
            return TaskStatus::Done;
        };
        let status = step(task);
        if status.is_done() {
            self.active = None;
        }
        status
    }
}

/// Fires once every `interval` seconds of accumulated time
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatTimer {
    interval: f32,
    waited: f32,
}

impl RepeatTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            waited: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn waited(&self) -> f32 {
        self.waited
    }

    pub fn reset(&mut self) {
        self.waited = 0.0;
    }

    /// Accumulate `dt`; true on the frame the interval elapses.
    /// Fires at most once per call; whole missed intervals are dropped.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.waited += dt;
        if self.waited < self.interval {
            return false;
        }
        self.waited = if self.interval > 0.0 {
            (self.waited - self.interval) % self.interval
        } else {
            0.0
        };
        true
    }
}
