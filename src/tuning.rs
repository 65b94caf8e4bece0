//! Data-driven feedback balance
//!
//! Every section carries `#[serde(default)]` so a partial JSON document
//! only overrides what it names.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::size::{SizeClass, SizeTable};
use crate::world::PrefabId;

/// Size detection and color lookup rules applied when an asteroid is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeRules {
    /// Scale magnitude below this is Small
    pub small_below: f32,
    /// Scale magnitude below this (and not Small) is Medium; anything else is Big
    pub medium_below: f32,
    /// Name substrings per size, matched case-insensitively
    pub keywords: SizeTable<Vec<String>>,
    /// Material color properties, most specific first
    pub color_properties: Vec<String>,
}

impl Default for SizeRules {
    fn default() -> Self {
        Self {
            small_below: 1.5,
            medium_below: 2.5,
            keywords: SizeTable::new(
                vec!["small".into()],
                vec!["medium".into(), "med".into()],
                vec!["big".into(), "large".into()],
            ),
            color_properties: vec!["_BaseColor".into(), "_Color".into(), "_MainColor".into()],
        }
    }
}

/// Camera shake strength
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakePreset {
    pub duration: f32,
    pub magnitude: f32,
}

/// Everything that scales with asteroid size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeProfile {
    pub score: u32,
    /// Used when the asteroid's material has no usable color
    pub fallback_color: Rgba,
    pub particle_count: u32,
    pub explosion_force: f32,
    pub shake: ShakePreset,
}

fn default_profiles() -> SizeTable<SizeProfile> {
    SizeTable::new(
        SizeProfile {
            score: 100,
            fallback_color: Rgba::YELLOW,
            particle_count: 15,
            explosion_force: 5.0,
            shake: ShakePreset {
                duration: 0.25,
                magnitude: 0.2,
            },
        },
        SizeProfile {
            score: 50,
            fallback_color: Rgba::ORANGE,
            particle_count: 25,
            explosion_force: 8.0,
            shake: ShakePreset {
                duration: 0.35,
                magnitude: 0.35,
            },
        },
        SizeProfile {
            score: 20,
            fallback_color: Rgba::RED,
            particle_count: 40,
            explosion_force: 12.0,
            shake: ShakePreset {
                duration: 0.5,
                magnitude: 0.5,
            },
        },
    )
}

/// Flash fired when a Big asteroid is destroyed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactFlashSettings {
    pub enabled: bool,
    pub color: Rgba,
    pub intensity: f32,
    pub duration: f32,
}

impl Default for ImpactFlashSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgba::WHITE,
            intensity: 0.3,
            duration: 0.1,
        }
    }
}

/// What a new flash does to flashes already running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashPolicy {
    /// Keep running; whichever task writes the overlay last in a tick wins
    #[default]
    Overlap,
    /// Cancel running flashes before starting the new one
    Restart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashSettings {
    pub color: Rgba,
    pub intensity: f32,
    pub duration: f32,
    pub white_duration: f32,
    pub damage_duration: f32,
    pub damage_color: Rgba,
    pub policy: FlashPolicy,
}

impl Default for FlashSettings {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            intensity: 0.5,
            duration: 0.15,
            white_duration: 0.1,
            damage_duration: 0.15,
            damage_color: Rgba::RED,
            policy: FlashPolicy::Overlap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    /// Particle lifetime (seconds)
    pub lifetime: f32,
    /// Standalone emitters are removed this long after creation
    pub destroy_delay: f32,
    pub start_size: f32,
    /// Live-particle cap of the shared emitter
    pub max_particles: u32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            lifetime: 1.5,
            destroy_delay: 2.0,
            start_size: 0.5,
            max_particles: 1000,
        }
    }
}

/// Prefab the world instantiates for one asteroid size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabSpec {
    pub id: PrefabId,
    pub name: String,
    pub scale: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Seconds between periodic edge spawns
    pub interval: f32,
    /// Half-width of the spawn rectangle
    pub x_sides: f32,
    /// Half-height of the spawn rectangle
    pub y_sides: f32,
    /// Size of periodically spawned asteroids
    pub periodic_size: SizeClass,
    pub prefabs: SizeTable<PrefabSpec>,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            interval: 5.0,
            x_sides: 23.16,
            y_sides: 13.26,
            periodic_size: SizeClass::Big,
            prefabs: SizeTable::new(
                PrefabSpec {
                    id: PrefabId(2),
                    name: "AsteroidSmall".into(),
                    scale: Vec3::splat(0.6),
                },
                PrefabSpec {
                    id: PrefabId(1),
                    name: "AsteroidMedium".into(),
                    scale: Vec3::splat(1.2),
                },
                PrefabSpec {
                    id: PrefabId(0),
                    name: "AsteroidBig".into(),
                    scale: Vec3::splat(2.0),
                },
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainbowSettings {
    /// Colors cycled across the score text; empty renders plain text
    pub palette: Vec<Rgba>,
    /// Seconds between color rotations (wall clock)
    pub interval: f32,
    /// Keep rotating after each refresh
    pub animate: bool,
}

impl Default for RainbowSettings {
    fn default() -> Self {
        Self {
            palette: Vec::new(),
            interval: 0.12,
            animate: true,
        }
    }
}

/// Ship-side feedback: firing, thrusting and taking hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipSettings {
    pub fire_shake: ShakePreset,
    pub muzzle_color: Rgba,
    pub muzzle_particles: u32,
    pub muzzle_force: f32,
    /// Scale multiplier applied on fire
    pub punch_scale: f32,
    /// Hold time, and separately return time, of the scale punch
    pub punch_duration: f32,
    pub thruster_color: Rgba,
    pub thruster_particles: u32,
    pub thruster_force: f32,
    /// Distance behind the ship where thruster bursts appear
    pub thruster_offset: f32,
    pub damage_flash_intensity: f32,
}

impl Default for ShipSettings {
    fn default() -> Self {
        Self {
            fire_shake: ShakePreset {
                duration: 0.1,
                magnitude: 0.15,
            },
            muzzle_color: Rgba::CYAN,
            muzzle_particles: 8,
            muzzle_force: 3.0,
            punch_scale: 1.2,
            punch_duration: 0.1,
            thruster_color: Rgba::CYAN,
            thruster_particles: 5,
            thruster_force: 2.0,
            thruster_offset: 0.5,
            damage_flash_intensity: 0.4,
        }
    }
}

/// Complete feedback tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seed for every RNG owned by the core
    pub seed: u64,
    pub sizes: SizeRules,
    pub per_size: SizeTable<SizeProfile>,
    pub impact_flash: ImpactFlashSettings,
    pub flash: FlashSettings,
    pub particles: ParticleSettings,
    pub spawn: SpawnSettings,
    pub rainbow: RainbowSettings,
    pub ship: ShipSettings,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            sizes: SizeRules::default(),
            per_size: default_profiles(),
            impact_flash: ImpactFlashSettings::default(),
            flash: FlashSettings::default(),
            particles: ParticleSettings::default(),
            spawn: SpawnSettings::default(),
            rainbow: RainbowSettings::default(),
            ship: ShipSettings::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no feedback path can work with.
    /// An empty rainbow palette is allowed and renders plain text.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sizes.small_below < self.sizes.medium_below) {
            return Err(ConfigError::invalid(
                "sizes",
                format!(
                    "small_below ({}) must be less than medium_below ({})",
                    self.sizes.small_below, self.sizes.medium_below
                ),
            ));
        }
        for size in SizeClass::ALL {
            let profile = self.per_size.get(size);
            non_negative("per_size.shake.duration", profile.shake.duration)?;
            non_negative("per_size.shake.magnitude", profile.shake.magnitude)?;
            non_negative("per_size.explosion_force", profile.explosion_force)?;
        }
        unit_interval("impact_flash.intensity", self.impact_flash.intensity)?;
        non_negative("impact_flash.duration", self.impact_flash.duration)?;
        unit_interval("flash.intensity", self.flash.intensity)?;
        non_negative("flash.duration", self.flash.duration)?;
        non_negative("flash.white_duration", self.flash.white_duration)?;
        non_negative("flash.damage_duration", self.flash.damage_duration)?;
        non_negative("particles.lifetime", self.particles.lifetime)?;
        non_negative("particles.destroy_delay", self.particles.destroy_delay)?;
        positive("spawn.interval", self.spawn.interval)?;
        positive("spawn.x_sides", self.spawn.x_sides)?;
        positive("spawn.y_sides", self.spawn.y_sides)?;
        non_negative("rainbow.interval", self.rainbow.interval)?;
        non_negative("ship.punch_duration", self.ship.punch_duration)?;
        unit_interval("ship.damage_flash_intensity", self.ship.damage_flash_intensity)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be finite and >= 0")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be finite and > 0")))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be within [0, 1]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "spawn": { "interval": 2.0 }, "seed": 7 }"#;
        let tuning = Tuning::from_json_str(json).unwrap();
        assert_eq!(tuning.seed, 7);
        assert_eq!(tuning.spawn.interval, 2.0);
        assert_eq!(tuning.spawn.x_sides, 23.16);
        assert_eq!(tuning.per_size.big.score, 20);
        assert_eq!(tuning.rainbow.interval, 0.12);
    }

    #[test]
    fn test_json_round_trip() {
        let mut tuning = Tuning::default();
        tuning.rainbow.palette = vec![Rgba::RED, Rgba::CYAN];
        tuning.flash.policy = FlashPolicy::Restart;
        let json = tuning.to_json_string().unwrap();
        assert_eq!(Tuning::from_json_str(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json_str(r#"{ "spawn": { "interval": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "spawn.interval", .. }));

        let err = Tuning::from_json_str(r#"{ "flash": { "intensity": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "flash.intensity", .. }));

        let err =
            Tuning::from_json_str(r#"{ "sizes": { "small_below": 3.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "sizes", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_palette_is_not_an_error() {
        let tuning = Tuning::from_json_str(r#"{ "rainbow": { "palette": [], "animate": true } }"#)
            .unwrap();
        assert!(tuning.rainbow.palette.is_empty());
    }
}
