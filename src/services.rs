//! Service registry
//!
//! One `Services` value is built per arena and handed to everything that
//! produces feedback. It replaces process-wide singletons:
//! - the camera shake exists only after `install_camera` (there is nothing
//!   to shake without a camera), and requests made before that are skipped
//! - particle bursts and the screen flash are built on first use
//! - the score aggregator always exists
//!
//! Feedback requested through the registry is also journaled as
//! `FeedbackEvent`s in request order. The arena drains the journal every
//! tick.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::feedback::{BurstPreset, ParticleBurst, ScreenFlash, ShakeController};
use crate::score::{RainbowText, ScoreAggregator, ScoreDisplay};
use crate::sim::task::FrameTime;
use crate::size::{SizeClass, SizeTable};
use crate::tuning::Tuning;

/// One feedback request that reached its service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedbackEvent {
    Shake { duration: f32, magnitude: f32 },
    Burst { position: Vec2, color: Rgba, count: u32, force: f32 },
    Score { delta: u32, total: u64 },
    Flash { color: Rgba, intensity: f32, duration: f32 },
}

#[derive(Debug, Clone)]
pub struct Services {
    tuning: Tuning,
    shake: Option<ShakeController>,
    particles: Option<ParticleBurst>,
    flash: Option<ScreenFlash>,
    score: ScoreAggregator,
    events: Vec<FeedbackEvent>,
}

impl Services {
    /// Registry with a rainbow score display driven by `tuning.rainbow`
    pub fn new(tuning: Tuning) -> Self {
        let display = ScoreDisplay::Rainbow(RainbowText::new(&tuning.rainbow));
        Self::with_score_display(tuning, display)
    }

    pub fn with_score_display(tuning: Tuning, display: ScoreDisplay) -> Self {
        Self {
            tuning,
            shake: None,
            particles: None,
            flash: None,
            score: ScoreAggregator::new(display),
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Attach the camera at its rest pose and create the shake controller
    pub fn install_camera(&mut self, rest: Vec3) -> &mut ShakeController {
        let presets = SizeTable::new(
            self.tuning.per_size.small.shake,
            self.tuning.per_size.medium.shake,
            self.tuning.per_size.big.shake,
        );
        let seed = self.tuning.seed;
        self.shake.insert(ShakeController::new(rest, presets, seed))
    }

    pub fn shake(&self) -> Option<&ShakeController> {
        self.shake.as_ref()
    }

    pub fn shake_mut(&mut self) -> Option<&mut ShakeController> {
        self.shake.as_mut()
    }

    /// Size-preset shake; false (and a warning) when no camera is installed
    pub fn shake_size(&mut self, size: SizeClass) -> bool {
        match self.shake.as_mut() {
            Some(shake) => {
                shake.shake(size);
                let preset = shake.active().map(|t| (t.duration, t.magnitude));
                if let Some((duration, magnitude)) = preset {
                    self.events.push(FeedbackEvent::Shake { duration, magnitude });
                }
                true
            }
            None => {
                log::warn!("No camera installed; skipping {} shake", size.as_str());
                false
            }
        }
    }

    /// Explicit shake; false (and a warning) when no camera is installed
    pub fn trigger_shake(&mut self, duration: f32, magnitude: f32) -> bool {
        match self.shake.as_mut() {
            Some(shake) => {
                shake.trigger(duration, magnitude);
                self.events.push(FeedbackEvent::Shake { duration, magnitude });
                true
            }
            None => {
                log::warn!("No camera installed; skipping shake");
                false
            }
        }
    }

    pub fn particles(&self) -> Option<&ParticleBurst> {
        self.particles.as_ref()
    }

    pub fn particles_mut(&mut self) -> Option<&mut ParticleBurst> {
        self.particles.as_mut()
    }

    /// Particle service, built on first use
    pub fn ensure_particles(&mut self) -> &mut ParticleBurst {
        let tuning = &self.tuning;
        self.particles.get_or_insert_with(|| {
            log::info!("Creating particle burst service");
            let preset = |size| {
                let profile = tuning.per_size.get(size);
                BurstPreset {
                    count: profile.particle_count,
                    force: profile.explosion_force,
                }
            };
            ParticleBurst::new(
                SizeTable::new(
                    preset(SizeClass::Small),
                    preset(SizeClass::Medium),
                    preset(SizeClass::Big),
                ),
                tuning.particles.clone(),
            )
        })
    }

    pub fn flash(&self) -> Option<&ScreenFlash> {
        self.flash.as_ref()
    }

    /// Screen flash service, built on first use
    pub fn ensure_flash(&mut self) -> &mut ScreenFlash {
        let tuning = &self.tuning;
        self.flash.get_or_insert_with(|| {
            log::info!("Creating screen flash service");
            ScreenFlash::new(tuning.flash.clone())
        })
    }

    /// Burst of `count` particles on the shared emitter
    pub fn burst(&mut self, position: Vec2, color: Rgba, count: u32, force: f32) {
        self.ensure_particles().explode(position, color, count, force);
        self.events.push(FeedbackEvent::Burst {
            position,
            color,
            count,
            force,
        });
    }

    /// Burst using the preset for `size`
    pub fn burst_sized(&mut self, size: SizeClass, position: Vec2, color: Rgba) {
        let preset = self.ensure_particles().preset(size);
        self.burst(position, color, preset.count, preset.force);
    }

    pub fn trigger_flash(&mut self, color: Rgba, intensity: f32, duration: f32) {
        self.ensure_flash().flash(color, intensity, duration);
        self.events.push(FeedbackEvent::Flash {
            color,
            intensity,
            duration,
        });
    }

    /// Damage-colored flash with the configured damage duration
    pub fn trigger_damage_flash(&mut self, intensity: f32) {
        let color = self.tuning.flash.damage_color;
        let duration = self.tuning.flash.damage_duration;
        self.trigger_flash(color, intensity, duration);
    }

    /// Add to the score; returns the new total
    pub fn add_score(&mut self, delta: u32) -> u64 {
        let total = self.score.increase_score(delta);
        self.events.push(FeedbackEvent::Score { delta, total });
        total
    }

    /// Feedback journaled since the last drain, oldest first
    pub fn events(&self) -> &[FeedbackEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> &ScoreAggregator {
        &self.score
    }

    pub fn score_mut(&mut self) -> &mut ScoreAggregator {
        &mut self.score
    }

    /// Advance every running effect by one frame
    pub fn advance(&mut self, frame: FrameTime) {
        if let Some(shake) = self.shake.as_mut() {
            shake.advance(frame.delta);
        }
        if let Some(particles) = self.particles.as_mut() {
            particles.advance(frame.delta);
        }
        if let Some(flash) = self.flash.as_mut() {
            flash.advance(frame.unscaled_delta);
        }
        self.score.advance(frame.unscaled_delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_services() {
        let mut services = Services::new(Tuning::default());
        assert!(services.particles().is_none());
        assert!(services.flash().is_none());
        services.ensure_particles().explode_big(glam::Vec2::ZERO, crate::Rgba::RED);
        services.ensure_particles();
        assert_eq!(services.particles().unwrap().emitter().bursts, 1);
        services.ensure_flash().white_flash(0.4);
        assert_eq!(services.flash().unwrap().flash_count(), 1);
    }

    #[test]
    fn test_shake_without_camera_degrades() {
        let mut services = Services::new(Tuning::default());
        assert!(!services.shake_size(SizeClass::Big));
        assert!(!services.trigger_shake(0.1, 0.1));
        services.install_camera(Vec3::ZERO);
        assert!(services.shake_size(SizeClass::Big));
    }

    #[test]
    fn test_advance_uses_unscaled_time_for_flash() {
        let mut services = Services::new(Tuning::default());
        services.install_camera(Vec3::ZERO);
        services.trigger_shake(0.05, 1.0);
        services.ensure_flash().flash(crate::Rgba::WHITE, 0.5, 0.05);
        // Simulation paused: flash still finishes, shake does not progress
        for _ in 0..20 {
            services.advance(FrameTime::scaled(0.01, 0.0));
        }
        assert_eq!(services.flash().unwrap().active_count(), 0);
        assert!(services.shake().unwrap().is_shaking());
    }

    #[test]
    fn test_feedback_journal_in_request_order() {
        let mut services = Services::new(Tuning::default());
        // No camera: the skipped shake is not journaled
        services.shake_size(SizeClass::Small);
        services.burst_sized(SizeClass::Medium, glam::Vec2::ONE, crate::Rgba::CYAN);
        services.add_score(50);
        services.trigger_damage_flash(0.4);

        let events = services.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], FeedbackEvent::Burst { count: 25, .. }));
        assert_eq!(events[1], FeedbackEvent::Score { delta: 50, total: 50 });
        assert_eq!(
            events[2],
            FeedbackEvent::Flash {
                color: crate::Rgba::RED,
                intensity: 0.4,
                duration: 0.15,
            }
        );
        assert!(services.events().is_empty());
    }
}
