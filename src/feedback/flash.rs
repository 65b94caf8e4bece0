//! Full-screen color flash
//!
//! The overlay alpha ramps 0 -> intensity over the first 10% of the flash
//! and back to 0 over the remaining 90%, on wall-clock time so slow motion
//! does not stretch it. The overlay is hidden whenever no flash is drawing.
//!
//! Under `FlashPolicy::Overlap` (the default) a new flash does not cancel
//! flashes already in flight. Tasks advance in start order, so the newest
//! flash writes the overlay last each frame; the first one to finish hides
//! the overlay even if another is still running.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::consts::FLASH_FADE_IN_SHARE;
use crate::lerp;
use crate::sim::task::TaskStatus;
use crate::tuning::{FlashPolicy, FlashSettings};

/// What the host draws over the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub visible: bool,
    /// Overlay color; `a` is the current flash alpha
    pub color: Rgba,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            visible: false,
            color: Rgba::WHITE.with_alpha(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FlashPhase {
    FadeIn { elapsed: f32 },
    FadeOut { elapsed: f32 },
}

/// One running flash
#[derive(Debug, Clone, PartialEq)]
pub struct FlashTask {
    color: Rgba,
    intensity: f32,
    fade_in: f32,
    fade_out: f32,
    phase: FlashPhase,
}

impl FlashTask {
    fn new(color: Rgba, intensity: f32, duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            color,
            intensity,
            fade_in: duration * FLASH_FADE_IN_SHARE,
            fade_out: duration * (1.0 - FLASH_FADE_IN_SHARE),
            phase: FlashPhase::FadeIn { elapsed: 0.0 },
        }
    }

    fn step(&mut self, dt: f32, overlay: &mut Overlay) -> TaskStatus {
        if let FlashPhase::FadeIn { elapsed } = &mut self.phase {
            if *elapsed < self.fade_in {
                *elapsed += dt;
                let alpha = lerp(0.0, self.intensity, *elapsed / self.fade_in);
                overlay.color = self.color.with_alpha(alpha);
                return TaskStatus::Continuing;
            }
            // Hold at full intensity, then start fading out this same frame
            overlay.color = self.color.with_alpha(self.intensity);
            self.phase = FlashPhase::FadeOut { elapsed: 0.0 };
        }

        let FlashPhase::FadeOut { elapsed } = &mut self.phase else {
            return TaskStatus::Continuing;
        };
        if *elapsed < self.fade_out {
            *elapsed += dt;
            let alpha = lerp(self.intensity, 0.0, *elapsed / self.fade_out);
            overlay.color = self.color.with_alpha(alpha);
            TaskStatus::Continuing
        } else {
            overlay.color = self.color.with_alpha(0.0);
            overlay.visible = false;
            TaskStatus::Done
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreenFlash {
    overlay: Overlay,
    settings: FlashSettings,
    tasks: Vec<FlashTask>,
    started: u32,
}

impl ScreenFlash {
    pub fn new(settings: FlashSettings) -> Self {
        Self {
            overlay: Overlay::default(),
            settings,
            tasks: Vec::new(),
            started: 0,
        }
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn policy(&self) -> FlashPolicy {
        self.settings.policy
    }

    /// Flashes currently in flight
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Flashes started since construction
    pub fn flash_count(&self) -> u32 {
        self.started
    }

    /// Flash with the configured default color, intensity and duration
    pub fn flash_default(&mut self) {
        let FlashSettings {
            color,
            intensity,
            duration,
            ..
        } = self.settings;
        self.flash(color, intensity, duration);
    }

    pub fn flash(&mut self, color: Rgba, intensity: f32, duration: f32) {
        if self.settings.policy == FlashPolicy::Restart {
            self.cancel();
        }
        self.overlay.visible = true;
        self.overlay.color = color.with_alpha(0.0);
        self.tasks.push(FlashTask::new(color, intensity, duration));
        self.started += 1;
        log::debug!("Flash started ({intensity:.2} for {duration:.2}s)");
    }

    /// Short white flash
    pub fn white_flash(&mut self, intensity: f32) {
        self.flash(Rgba::WHITE, intensity, self.settings.white_duration);
    }

    /// Red damage flash
    pub fn damage_flash(&mut self, intensity: f32) {
        self.flash(self.settings.damage_color, intensity, self.settings.damage_duration);
    }

    /// Drop every running flash and hide the overlay
    pub fn cancel(&mut self) {
        self.tasks.clear();
        self.overlay.color = self.overlay.color.with_alpha(0.0);
        self.overlay.visible = false;
    }

    /// Advance every flash by wall-clock `dt`, oldest first
    pub fn advance(&mut self, unscaled_dt: f32) -> TaskStatus {
        let overlay = &mut self.overlay;
        self.tasks
            .retain_mut(|task| task.step(unscaled_dt, overlay) == TaskStatus::Continuing);
        if self.tasks.is_empty() {
            TaskStatus::Done
        } else {
            TaskStatus::Continuing
        }
    }
}
