//! Asteroid population: periodic edge spawns and fission
//!
//! The periodic task drops a new asteroid on the boundary rectangle every
//! `interval` seconds of simulation time. `spawn_at` is the synchronous
//! entry point used for fission and bypasses both the cadence and the edge
//! choice.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_RNG_STREAM;
use crate::sim::asteroid::{Asteroid, AsteroidSpec};
use crate::sim::task::RepeatTimer;
use crate::size::SizeClass;
use crate::tuning::{SizeRules, SpawnSettings};
use crate::world::World;

/// Side of the spawn rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];
}

/// Rectangle centred on the origin with half-extents `x_sides`, `y_sides`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBoundary {
    pub x_sides: f32,
    pub y_sides: f32,
}

impl SpawnBoundary {
    /// Extents are taken by magnitude; non-finite extents collapse to zero
    pub fn new(x_sides: f32, y_sides: f32) -> Self {
        Self {
            x_sides: half_extent("x_sides", x_sides),
            y_sides: half_extent("y_sides", y_sides),
        }
    }

    /// Uniform edge, then a uniform point along it
    pub fn sample(&self, rng: &mut impl Rng) -> (Edge, Vec2) {
        let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
        (edge, self.point_on(edge, rng))
    }

    fn point_on(&self, edge: Edge, rng: &mut impl Rng) -> Vec2 {
        let (x, y) = (self.x_sides, self.y_sides);
        match edge {
            Edge::Left => Vec2::new(-x, rng.random_range(-y..=y)),
            Edge::Right => Vec2::new(x, rng.random_range(-y..=y)),
            Edge::Top => Vec2::new(rng.random_range(-x..=x), y),
            Edge::Bottom => Vec2::new(rng.random_range(-x..=x), -y),
        }
    }

    /// One coordinate sits exactly on a half-extent, the other within range
    pub fn is_on_edge(&self, pos: Vec2) -> bool {
        let within_x = pos.x.abs() <= self.x_sides;
        let within_y = pos.y.abs() <= self.y_sides;
        (pos.x.abs() == self.x_sides && within_y) || (pos.y.abs() == self.y_sides && within_x)
    }
}

fn half_extent(field: &str, value: f32) -> f32 {
    let extent = if value.is_finite() { value.abs() } else { 0.0 };
    if extent != value {
        log::warn!("Spawn boundary {field} = {value} is not a valid half-extent, using {extent}");
    }
    extent
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    settings: SpawnSettings,
    rules: SizeRules,
    boundary: SpawnBoundary,
    timer: RepeatTimer,
    rng: Pcg32,
    spawned: u32,
}

impl SpawnScheduler {
    pub fn new(settings: SpawnSettings, rules: SizeRules, seed: u64) -> Self {
        Self {
            boundary: SpawnBoundary::new(settings.x_sides, settings.y_sides),
            timer: RepeatTimer::new(settings.interval),
            rng: Pcg32::new(seed, SPAWN_RNG_STREAM),
            settings,
            rules,
            spawned: 0,
        }
    }

    pub fn boundary(&self) -> SpawnBoundary {
        self.boundary
    }

    pub fn settings(&self) -> &SpawnSettings {
        &self.settings
    }

    /// Total asteroids created, periodic and fission
    pub fn spawned_count(&self) -> u32 {
        self.spawned
    }

    /// Seconds accumulated toward the next periodic spawn
    pub fn time_until_next(&self) -> f32 {
        (self.timer.interval() - self.timer.waited()).max(0.0)
    }

    pub fn pick_edge_position(&mut self) -> (Edge, Vec2) {
        self.boundary.sample(&mut self.rng)
    }

    /// Advance the periodic task; spawns when the interval elapses
    pub fn advance<W: World>(&mut self, dt: f32, world: &mut W) -> Option<Asteroid> {
        if !self.timer.tick(dt) {
            return None;
        }
        let (edge, position) = self.pick_edge_position();
        let size = self.settings.periodic_size;
        log::info!(
            "Periodic {} spawn on {:?} edge at {:?}",
            size.as_str(),
            edge,
            position
        );
        Some(self.spawn_at(size, position, world))
    }

    /// Instantiate the prefab for `size` at `position` with zero rotation
    pub fn spawn_at<W: World>(
        &mut self,
        size: SizeClass,
        position: Vec2,
        world: &mut W,
    ) -> Asteroid {
        let prefab = self.settings.prefabs.get(size);
        let handle = world.instantiate(prefab.id, position, 0.0);
        self.spawned += 1;
        let spec = AsteroidSpec {
            name: prefab.name.clone(),
            position,
            scale: prefab.scale,
            size: Some(size),
        };
        Asteroid::attach(handle, spec, &self.rules, &*world)
    }

    pub fn spawn_medium<W: World>(&mut self, position: Vec2, world: &mut W) -> Asteroid {
        self.spawn_at(SizeClass::Medium, position, world)
    }

    pub fn spawn_small<W: World>(&mut self, position: Vec2, world: &mut W) -> Asteroid {
        self.spawn_at(SizeClass::Small, position, world)
    }

    /// Children of a destroyed `parent`, all at `position`
    pub fn fission<W: World>(
        &mut self,
        parent: SizeClass,
        position: Vec2,
        world: &mut W,
    ) -> Vec<Asteroid> {
        let Some((child, count)) = parent.fission() else {
            return Vec::new();
        };
        (0..count)
            .map(|_| self.spawn_at(child, position, world))
            .collect()
    }
}
