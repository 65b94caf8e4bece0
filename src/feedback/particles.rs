//! Particle bursts
//!
//! A single shared burst emitter is moved to each explosion, recolored and
//! fired once. Overlapping explosions that must not disturb the shared
//! emitter use standalone one-shot emitters that expire on their own.
//! Rasterizing particles is the host's job: it drains `BurstEvent`s.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::sim::task::TaskStatus;
use crate::size::{SizeClass, SizeTable};
use crate::tuning::ParticleSettings;

/// Count and initial speed of one explosion tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstPreset {
    pub count: u32,
    pub force: f32,
}

/// Which emitter produced a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstSource {
    Shared,
    Standalone(u32),
}

/// One emitted burst, ready for the host's particle renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstEvent {
    pub source: BurstSource,
    pub position: Vec2,
    pub color: Rgba,
    pub count: u32,
    /// Initial particle speed
    pub force: f32,
    pub lifetime: f32,
    pub start_size: f32,
}

/// The shared burst emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    pub position: Vec2,
    pub start_color: Rgba,
    pub start_speed: f32,
    pub start_size: f32,
    pub lifetime: f32,
    pub max_particles: u32,
    /// Particles emitted over the emitter's life
    pub emitted: u64,
    /// Bursts fired over the emitter's life
    pub bursts: u32,
}

impl Emitter {
    fn new(settings: &ParticleSettings) -> Self {
        Self {
            position: Vec2::ZERO,
            start_color: Rgba::WHITE,
            start_speed: 10.0,
            start_size: settings.start_size,
            lifetime: settings.lifetime,
            max_particles: settings.max_particles,
            emitted: 0,
            bursts: 0,
        }
    }
}

/// A self-cleaning one-shot emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandaloneExplosion {
    pub id: u32,
    pub position: Vec2,
    pub color: Rgba,
    pub count: u32,
    pub force: f32,
    /// Seconds until the emitter is removed
    pub remaining: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleBurst {
    emitter: Emitter,
    presets: SizeTable<BurstPreset>,
    settings: ParticleSettings,
    standalone: Vec<StandaloneExplosion>,
    pending: Vec<BurstEvent>,
    next_standalone_id: u32,
}

impl ParticleBurst {
    pub fn new(presets: SizeTable<BurstPreset>, settings: ParticleSettings) -> Self {
        Self {
            emitter: Emitter::new(&settings),
            presets,
            settings,
            standalone: Vec::new(),
            pending: Vec::new(),
            next_standalone_id: 1,
        }
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn preset(&self, size: SizeClass) -> BurstPreset {
        *self.presets.get(size)
    }

    /// Move the shared emitter to `position` and fire exactly `count` particles
    pub fn explode(&mut self, position: Vec2, color: Rgba, count: u32, force: f32) {
        let emitter = &mut self.emitter;
        emitter.position = position;
        emitter.start_color = color;
        emitter.start_speed = force;
        emitter.emitted += u64::from(count);
        emitter.bursts += 1;
        self.pending.push(BurstEvent {
            source: BurstSource::Shared,
            position,
            color,
            count,
            force,
            lifetime: emitter.lifetime,
            start_size: emitter.start_size,
        });
    }

    pub fn explode_sized(&mut self, size: SizeClass, position: Vec2, color: Rgba) {
        let preset = self.preset(size);
        self.explode(position, color, preset.count, preset.force);
    }

    pub fn explode_small(&mut self, position: Vec2, color: Rgba) {
        self.explode_sized(SizeClass::Small, position, color);
    }

    pub fn explode_medium(&mut self, position: Vec2, color: Rgba) {
        self.explode_sized(SizeClass::Medium, position, color);
    }

    pub fn explode_big(&mut self, position: Vec2, color: Rgba) {
        self.explode_sized(SizeClass::Big, position, color);
    }

    /// Fire an independent emitter that leaves the shared one untouched.
    /// It is removed `destroy_delay` seconds later.
    pub fn create_standalone_explosion(
        &mut self,
        position: Vec2,
        color: Rgba,
        count: u32,
        force: f32,
    ) -> u32 {
        let id = self.next_standalone_id;
        self.next_standalone_id += 1;
        self.standalone.push(StandaloneExplosion {
            id,
            position,
            color,
            count,
            force,
            remaining: self.settings.destroy_delay,
        });
        self.pending.push(BurstEvent {
            source: BurstSource::Standalone(id),
            position,
            color,
            count,
            force,
            lifetime: self.settings.lifetime,
            start_size: self.settings.start_size,
        });
        id
    }

    pub fn standalone(&self) -> &[StandaloneExplosion] {
        &self.standalone
    }

    /// Bursts emitted since the last drain, oldest first
    pub fn pending(&self) -> &[BurstEvent] {
        &self.pending
    }

    pub fn drain_bursts(&mut self) -> Vec<BurstEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Count down standalone emitters and remove expired ones
    pub fn advance(&mut self, dt: f32) -> TaskStatus {
        self.standalone.retain_mut(|explosion| {
            explosion.remaining -= dt;
            explosion.remaining > 0.0
        });
        if self.standalone.is_empty() {
            TaskStatus::Done
        } else {
            TaskStatus::Continuing
        }
    }
}
