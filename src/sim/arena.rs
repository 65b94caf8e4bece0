//! Fixed timestep arena tick
//!
//! Host-side loop tying the world, the live asteroid set, the spawner and
//! the feedback services together. Per tick: collisions in detection
//! order, then the periodic spawner, then every running effect. Queued
//! particle bursts and feedback events are handed back every tick.

use std::collections::{BTreeMap, BTreeSet};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::asteroid::{Asteroid, ImpactReport};
use super::collision::{ASTEROID_IMPACTS, Collision, ImpactResponse};
use super::spawn::SpawnScheduler;
use super::task::FrameTime;
use crate::feedback::{BurstEvent, Overlay, ShipFeedback};
use crate::services::{FeedbackEvent, Services};
use crate::size::SizeClass;
use crate::tuning::Tuning;
use crate::world::{EntityHandle, World};

/// Host input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Contacts reported by physics since the last tick
    pub collisions: Vec<Collision>,
    /// Muzzle position when the ship fired this tick
    pub fire: Option<Vec2>,
    /// Ship position and forward axis while thrusting
    pub thrust: Option<(Vec2, Vec2)>,
}

impl TickInput {
    pub fn collisions(collisions: Vec<Collision>) -> Self {
        Self {
            collisions,
            ..Default::default()
        }
    }
}

/// Everything one tick produced for the host
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Destructions, in collision order
    pub impacts: Vec<ImpactReport>,
    /// Particle bursts for the host's particle renderer
    pub bursts: Vec<BurstEvent>,
    /// Feedback requests, in the order they were made
    pub feedback: Vec<FeedbackEvent>,
}

/// Serializable view of the arena after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time_ticks: u64,
    pub score: u64,
    pub asteroids: Vec<(EntityHandle, SizeClass, Vec2)>,
    pub camera: Option<Vec3>,
    pub overlay: Option<Overlay>,
    pub ship_scale: Vec3,
}

#[derive(Debug, Clone)]
pub struct Arena<W: World> {
    world: W,
    services: Services,
    spawner: SpawnScheduler,
    ship: ShipFeedback,
    ship_handle: Option<EntityHandle>,
    /// Live asteroids in handle (creation) order
    asteroids: BTreeMap<EntityHandle, Asteroid>,
    time_ticks: u64,
}

impl<W: World> Arena<W> {
    pub fn new(world: W, tuning: Tuning) -> Self {
        let spawner = SpawnScheduler::new(tuning.spawn.clone(), tuning.sizes.clone(), tuning.seed);
        let ship = ShipFeedback::new(tuning.ship.clone(), Vec3::ONE);
        Self::with_services(world, Services::new(tuning), spawner, ship)
    }

    /// Build from pre-configured parts (e.g. a custom score display)
    pub fn with_services(
        world: W,
        services: Services,
        spawner: SpawnScheduler,
        ship: ShipFeedback,
    ) -> Self {
        Self {
            world,
            services,
            spawner,
            ship,
            ship_handle: None,
            asteroids: BTreeMap::new(),
            time_ticks: 0,
        }
    }

    pub fn install_camera(&mut self, rest: Vec3) {
        self.services.install_camera(rest);
    }

    /// Route collisions targeting `handle` to the ship
    pub fn set_ship_handle(&mut self, handle: EntityHandle) {
        self.ship_handle = Some(handle);
    }

    /// Spawn directly, bypassing the periodic cadence
    pub fn spawn_asteroid(&mut self, size: SizeClass, position: Vec2) -> EntityHandle {
        let asteroid = self.spawner.spawn_at(size, position, &mut self.world);
        let handle = asteroid.handle();
        self.asteroids.insert(handle, asteroid);
        handle
    }

    /// Track an entity the host instantiated itself
    pub fn adopt(&mut self, asteroid: Asteroid) {
        self.asteroids.insert(asteroid.handle(), asteroid);
    }

    /// Sync a physics-driven position
    pub fn set_asteroid_position(&mut self, handle: EntityHandle, position: Vec2) {
        if let Some(asteroid) = self.asteroids.get_mut(&handle) {
            asteroid.set_position(position);
        }
    }

    /// Dispatch one contact. Only laser hits on live asteroids produce a
    /// report; anything aimed at the ship goes to ship feedback.
    pub fn handle_collision(&mut self, collision: &Collision) -> Option<ImpactReport> {
        if Some(collision.target) == self.ship_handle {
            self.ship.on_collision(&mut self.services, collision.other);
            return None;
        }

        match ASTEROID_IMPACTS.lookup(collision.other) {
            ImpactResponse::Ignore => return None,
            ImpactResponse::DestroyBoth => {}
        }

        let Some(mut asteroid) = self.asteroids.remove(&collision.target) else {
            log::debug!("Impact on unknown or destroyed entity {:?}", collision.target);
            return None;
        };
        let report = asteroid.on_impact(&mut self.services, &mut self.spawner, &mut self.world)?;

        if let Some(other) = collision.other_handle {
            self.world.remove(other);
        }
        for child in &report.children {
            self.asteroids.insert(child.handle(), child.clone());
        }
        Some(report)
    }

    /// Advance one frame. Drains the burst queue and the feedback journal,
    /// so nothing accumulates across ticks.
    pub fn tick(&mut self, input: &TickInput, frame: FrameTime) -> TickOutput {
        self.time_ticks += 1;

        if let Some(muzzle) = input.fire {
            self.ship.on_fire(&mut self.services, muzzle);
        }
        if let Some((position, up)) = input.thrust {
            self.ship.on_thrust(&mut self.services, position, up);
        }

        // A laser is consumed by its first hit
        let mut consumed = BTreeSet::new();
        let mut reports = Vec::new();
        for collision in &input.collisions {
            if let Some(other) = collision.other_handle {
                if consumed.contains(&other) {
                    continue;
                }
            }
            if let Some(report) = self.handle_collision(collision) {
                if let Some(other) = collision.other_handle {
                    consumed.insert(other);
                }
                reports.push(report);
            }
        }

        if let Some(asteroid) = self.spawner.advance(frame.delta, &mut self.world) {
            self.asteroids.insert(asteroid.handle(), asteroid);
        }

        self.ship.advance(frame.delta);
        self.services.advance(frame);

        let bursts = self
            .services
            .particles_mut()
            .map(|particles| particles.drain_bursts())
            .unwrap_or_default();
        TickOutput {
            impacts: reports,
            bursts,
            feedback: self.services.drain_events(),
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    pub fn ship(&self) -> &ShipFeedback {
        &self.ship
    }

    pub fn asteroids(&self) -> impl Iterator<Item = &Asteroid> {
        self.asteroids.values()
    }

    pub fn asteroid(&self, handle: EntityHandle) -> Option<&Asteroid> {
        self.asteroids.get(&handle)
    }

    pub fn asteroid_count(&self) -> usize {
        self.asteroids.len()
    }

    /// Longest-lived asteroid (lowest handle)
    pub fn oldest_asteroid(&self) -> Option<EntityHandle> {
        self.asteroids.keys().next().copied()
    }

    pub fn score(&self) -> u64 {
        self.services.score().score()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            time_ticks: self.time_ticks,
            score: self.score(),
            asteroids: self
                .asteroids
                .values()
                .map(|a| (a.handle(), a.size(), a.position()))
                .collect(),
            camera: self.services.shake().map(|s| s.position()),
            overlay: self.services.flash().map(|f| f.overlay()),
            ship_scale: self.ship.scale(),
        }
    }
}
