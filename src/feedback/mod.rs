//! Sensory feedback services
//!
//! Each service owns exactly one output channel (camera pose, particle
//! emitter, screen overlay, ship scale) and is the only code that writes it.

pub mod flash;
pub mod particles;
pub mod shake;
pub mod ship;

pub use flash::{Overlay, ScreenFlash};
pub use particles::{BurstEvent, BurstPreset, BurstSource, Emitter, ParticleBurst};
pub use shake::{ShakeController, ShakeTask};
pub use ship::ShipFeedback;
