//! Ship-side feedback: muzzle kick, thruster puffs and damage
//!
//! Steering and firing input live in the host; these entry points are what
//! the host calls after it has fired, thrusted or detected a hit.

use glam::{Vec2, Vec3};

use crate::services::Services;
use crate::sim::collision::{ColliderTag, SHIP_IMPACTS, ShipResponse};
use crate::sim::task::{TaskSlot, TaskStatus};
use crate::size::SizeClass;
use crate::tuning::ShipSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PunchPhase {
    Hold { remaining: f32 },
    Return { elapsed: f32 },
}

/// Scale punch: jump to `rest * punch_scale`, hold, then ease back
#[derive(Debug, Clone, PartialEq)]
pub struct ScalePunch {
    peak: Vec3,
    duration: f32,
    phase: PunchPhase,
}

#[derive(Debug, Clone)]
pub struct ShipFeedback {
    settings: ShipSettings,
    rest_scale: Vec3,
    scale: Vec3,
    punch: TaskSlot<ScalePunch>,
    hits: u32,
}

impl ShipFeedback {
    pub fn new(settings: ShipSettings, rest_scale: Vec3) -> Self {
        Self {
            settings,
            rest_scale,
            scale: rest_scale,
            punch: TaskSlot::new(),
            hits: 0,
        }
    }

    /// Current ship scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn rest_scale(&self) -> Vec3 {
        self.rest_scale
    }

    pub fn is_punching(&self) -> bool {
        self.punch.is_active()
    }

    /// Asteroid hits taken
    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// A laser left the muzzle: small shake, muzzle burst, scale punch
    pub fn on_fire(&mut self, services: &mut Services, muzzle: Vec2) {
        let s = &self.settings;
        services.trigger_shake(s.fire_shake.duration, s.fire_shake.magnitude);
        services.burst(muzzle, s.muzzle_color, s.muzzle_particles, s.muzzle_force);
        self.start_punch();
    }

    /// Thruster puff behind the ship. `up` is the ship's forward axis.
    pub fn on_thrust(&mut self, services: &mut Services, position: Vec2, up: Vec2) {
        let s = &self.settings;
        let exhaust = position - up.normalize_or_zero() * s.thruster_offset;
        services.burst(
            exhaust,
            s.thruster_color,
            s.thruster_particles,
            s.thruster_force,
        );
    }

    /// Dispatch a collision on the ship by the other collider's tag
    pub fn on_collision(&mut self, services: &mut Services, other: ColliderTag) {
        match SHIP_IMPACTS.lookup(other) {
            ShipResponse::TakeHit => self.on_asteroid_hit(services),
            ShipResponse::Ignore => {}
        }
    }

    /// Struck by an asteroid: big shake and red damage flash
    pub fn on_asteroid_hit(&mut self, services: &mut Services) {
        self.hits += 1;
        log::info!("Ship hit by asteroid ({} hits)", self.hits);
        services.shake_size(SizeClass::Big);
        services.trigger_damage_flash(self.settings.damage_flash_intensity);
    }

    fn start_punch(&mut self) {
        // Restart from rest so repeated fire never compounds the scale
        self.punch.cancel();
        let peak = self.rest_scale * self.settings.punch_scale;
        self.scale = peak;
        self.punch.start(ScalePunch {
            peak,
            duration: self.settings.punch_duration,
            phase: PunchPhase::Hold {
                remaining: self.settings.punch_duration,
            },
        });
    }

    pub fn cancel_punch(&mut self) {
        if self.punch.cancel().is_some() {
            self.scale = self.rest_scale;
        }
    }

    pub fn advance(&mut self, dt: f32) -> TaskStatus {
        let rest = self.rest_scale;
        let scale = &mut self.scale;
        self.punch.advance(|punch| {
            if let PunchPhase::Hold { remaining } = &mut punch.phase {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return TaskStatus::Continuing;
                }
                punch.phase = PunchPhase::Return { elapsed: 0.0 };
                return TaskStatus::Continuing;
            }
            let PunchPhase::Return { elapsed } = &mut punch.phase else {
                return TaskStatus::Continuing;
            };
            if *elapsed < punch.duration {
                *elapsed += dt;
                *scale = punch.peak.lerp(rest, (*elapsed / punch.duration).min(1.0));
                TaskStatus::Continuing
            } else {
                *scale = rest;
                TaskStatus::Done
            }
        })
    }
}
