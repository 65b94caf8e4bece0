//! Deterministic simulation module
//!
//! All gameplay-side logic lives here. This module must stay deterministic:
//! - Explicit frame times only
//! - Seeded RNG only
//! - Stable iteration order (by entity handle)
//! - No rendering or platform dependencies

pub mod arena;
pub mod asteroid;
pub mod collision;
pub mod spawn;
pub mod task;

pub use arena::{Arena, ArenaSnapshot, TickInput, TickOutput};
pub use asteroid::{Asteroid, AsteroidSpec, ColorCache, ColorDebugReport, ImpactReport, Lifecycle};
pub use collision::{
    ASTEROID_IMPACTS, ColliderTag, Collision, ImpactResponse, ImpactTable, SHIP_IMPACTS,
    ShipResponse,
};
pub use spawn::{Edge, SpawnBoundary, SpawnScheduler};
pub use task::{FrameTime, RepeatTimer, TaskSlot, TaskStatus};
