//! Collision categories and their responses
//!
//! Colliders carry a closed `ColliderTag`. What a hit does is a table
//! lookup per target kind, never a string comparison.

use serde::{Deserialize, Serialize};

use crate::world::EntityHandle;

/// Category of the other collider in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderTag {
    Laser,
    Asteroid,
    Ship,
    Other,
}

impl ColliderTag {
    pub const ALL: [ColliderTag; 4] = [
        ColliderTag::Laser,
        ColliderTag::Asteroid,
        ColliderTag::Ship,
        ColliderTag::Other,
    ];
}

/// What an asteroid does when struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactResponse {
    Ignore,
    /// Destroy the asteroid and remove the other collider too
    DestroyBoth,
}

/// What the ship does when struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipResponse {
    Ignore,
    TakeHit,
}

/// Fixed tag -> response mapping
#[derive(Debug, Clone, Copy)]
pub struct ImpactTable<R: Copy> {
    entries: [(ColliderTag, R); 4],
    fallback: R,
}

impl<R: Copy> ImpactTable<R> {
    pub const fn new(entries: [(ColliderTag, R); 4], fallback: R) -> Self {
        Self { entries, fallback }
    }

    pub fn lookup(&self, tag: ColliderTag) -> R {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, r)| *r)
            .unwrap_or(self.fallback)
    }
}

/// Asteroids are only destroyed by lasers, which are consumed by the hit
pub const ASTEROID_IMPACTS: ImpactTable<ImpactResponse> = ImpactTable::new(
    [
        (ColliderTag::Laser, ImpactResponse::DestroyBoth),
        (ColliderTag::Asteroid, ImpactResponse::Ignore),
        (ColliderTag::Ship, ImpactResponse::Ignore),
        (ColliderTag::Other, ImpactResponse::Ignore),
    ],
    ImpactResponse::Ignore,
);

pub const SHIP_IMPACTS: ImpactTable<ShipResponse> = ImpactTable::new(
    [
        (ColliderTag::Laser, ShipResponse::Ignore),
        (ColliderTag::Asteroid, ShipResponse::TakeHit),
        (ColliderTag::Ship, ShipResponse::Ignore),
        (ColliderTag::Other, ShipResponse::Ignore),
    ],
    ShipResponse::Ignore,
);

/// One contact reported by the host's physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    /// Entity receiving the impact
    pub target: EntityHandle,
    /// Category of the entity that hit it
    pub other: ColliderTag,
    /// World handle of the other entity, when it has one
    pub other_handle: Option<EntityHandle>,
}

impl Collision {
    pub fn new(target: EntityHandle, other: ColliderTag) -> Self {
        Self {
            target,
            other,
            other_handle: None,
        }
    }

    /// Laser `laser` hitting `target`
    pub fn laser(target: EntityHandle, laser: EntityHandle) -> Self {
        Self {
            target,
            other: ColliderTag::Laser,
            other_handle: Some(laser),
        }
    }
}
