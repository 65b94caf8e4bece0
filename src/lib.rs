//! Asteroid Juice - impact feedback and population core for a top-down shooter
//!
//! Core modules:
//! - `sim`: Deterministic per-tick orchestration (asteroids, spawning, collisions)
//! - `feedback`: Shake, particle burst, screen flash and ship feedback services
//! - `score`: Score aggregation and the color-cycling score display
//! - `services`: Registry that owns every feedback service for one arena
//! - `tuning`: Data-driven feedback balance
//! - `world`: Collaborator traits implemented by the host engine

pub mod color;
pub mod error;
pub mod feedback;
pub mod score;
pub mod services;
pub mod sim;
pub mod size;
pub mod tuning;
pub mod world;

pub use color::Rgba;
pub use error::ConfigError;
pub use services::Services;
pub use sim::{
    Arena, Asteroid, ColliderTag, Collision, FrameTime, ImpactReport, SpawnScheduler, TickOutput,
};
pub use size::{SizeClass, SizeTable};
pub use tuning::Tuning;
pub use world::{EntityHandle, Material, MaterialLookup, PrefabId, RecordingWorld, World};

/// Feedback constants
pub mod consts {
    /// Frame step used by the demo loop and tests (60 Hz)
    pub const DEFAULT_DT: f32 = 1.0 / 60.0;

    /// Number of children produced when a Big or Medium asteroid splits
    pub const FISSION_CHILDREN: usize = 2;

    /// Prefix of the rendered score line
    pub const SCORE_PREFIX: &str = "Score: ";

    /// Default alpha for `ScreenFlash::white_flash`
    pub const WHITE_FLASH_INTENSITY: f32 = 0.4;
    /// Default alpha for `ScreenFlash::damage_flash`
    pub const DAMAGE_FLASH_INTENSITY: f32 = 0.3;

    /// Share of a flash spent fading in; the rest fades out
    pub const FLASH_FADE_IN_SHARE: f32 = 0.1;

    /// PCG stream ids so each owner draws from an independent sequence
    pub const SHAKE_RNG_STREAM: u64 = 1;
    pub const SPAWN_RNG_STREAM: u64 = 2;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}
