//! Destructible asteroids
//!
//! Size and explosion color are resolved once when the asteroid is created
//! and never recomputed. `on_impact` runs the whole destruction sequence in
//! a fixed order and can only succeed once per asteroid.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::services::Services;
use crate::size::SizeClass;
use crate::sim::spawn::SpawnScheduler;
use crate::tuning::{SizeProfile, SizeRules};
use crate::world::{EntityHandle, MaterialLookup, World};

/// Explosion color cache
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColorCache {
    Unresolved,
    /// Lookup done; `None` means no known property was present
    Resolved(Option<Rgba>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    Destroyed,
}

/// Creation parameters for an asteroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidSpec {
    pub name: String,
    pub position: Vec2,
    pub scale: Vec3,
    /// Explicit size; auto-detected from name and scale when `None`
    pub size: Option<SizeClass>,
}

/// Everything observable about one destruction
#[derive(Debug, Clone)]
pub struct ImpactReport {
    pub handle: EntityHandle,
    pub size: SizeClass,
    pub position: Vec2,
    pub color: Rgba,
    pub score_awarded: u32,
    pub total_score: u64,
    pub shook: bool,
    pub flashed: bool,
    /// Fission products, already instantiated in the world
    pub children: Vec<Asteroid>,
}

/// Color-detection diagnostics for one asteroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDebugReport {
    pub name: String,
    pub scale: Vec3,
    pub scale_magnitude: f32,
    pub size: SizeClass,
    pub has_material: bool,
    /// Every known property and the color found under it
    pub properties: Vec<(String, Option<Rgba>)>,
    pub resolved: Option<Rgba>,
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    handle: EntityHandle,
    name: String,
    position: Vec2,
    scale: Vec3,
    size: SizeClass,
    color: ColorCache,
    state: Lifecycle,
}

impl Asteroid {
    /// Resolve size now; color stays unresolved until `resolve_color`
    pub fn new(handle: EntityHandle, spec: AsteroidSpec, rules: &SizeRules) -> Self {
        let size = spec
            .size
            .unwrap_or_else(|| SizeClass::detect(&spec.name, spec.scale, rules));
        Self {
            handle,
            name: spec.name,
            position: spec.position,
            scale: spec.scale,
            size,
            color: ColorCache::Unresolved,
            state: Lifecycle::Alive,
        }
    }

    /// Build and run both one-time resolution steps against the world
    pub fn attach<W: World>(
        handle: EntityHandle,
        spec: AsteroidSpec,
        rules: &SizeRules,
        world: &W,
    ) -> Self {
        let mut asteroid = Self::new(handle, spec, rules);
        asteroid.resolve_color(world.material(handle), &rules.color_properties);
        asteroid
    }

    /// First property present on `material`, in the given order. Runs once;
    /// later calls keep the first result.
    pub fn resolve_color<M: MaterialLookup>(
        &mut self,
        material: Option<&M>,
        properties: &[String],
    ) {
        if self.color != ColorCache::Unresolved {
            return;
        }
        let found = match material {
            Some(material) => properties.iter().find_map(|p| material.color_property(p)),
            None => {
                log::warn!(
                    "Asteroid '{}' has no visual attached; using {} fallback color",
                    self.name,
                    self.size.as_str()
                );
                None
            }
        };
        self.color = ColorCache::Resolved(found);
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Follow the world's physics position
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn size(&self) -> SizeClass {
        self.size
    }

    pub fn color_cache(&self) -> ColorCache {
        self.color
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == Lifecycle::Destroyed
    }

    /// Detected color unless missing or clear, else the per-size fallback
    pub fn explosion_color(&self, profile: &SizeProfile) -> Rgba {
        match self.color {
            ColorCache::Resolved(Some(color)) if !color.is_clear() => color,
            _ => profile.fallback_color,
        }
    }

    /// Destroy this asteroid. In order: shake, particle burst, score,
    /// flash (Big only), fission, removal from the world. Returns `None`
    /// and does nothing if the asteroid was already destroyed.
    pub fn on_impact<W: World>(
        &mut self,
        services: &mut Services,
        spawner: &mut SpawnScheduler,
        world: &mut W,
    ) -> Option<ImpactReport> {
        if self.is_destroyed() {
            log::debug!("Ignoring impact on destroyed asteroid {:?}", self.handle);
            return None;
        }
        // Mark first so nothing reached from here can destroy us twice
        self.state = Lifecycle::Destroyed;

        let profile = services.tuning().per_size.get(self.size).clone();
        let flash = services.tuning().impact_flash.clone();
        let color = self.explosion_color(&profile);

        let shook = services.shake_size(self.size);

        services.burst_sized(self.size, self.position, color);

        let total_score = services.add_score(profile.score);

        let flashed = self.size == SizeClass::Big && flash.enabled;
        if flashed {
            services.trigger_flash(flash.color, flash.intensity, flash.duration);
        }

        let children = spawner.fission(self.size, self.position, world);

        world.remove(self.handle);
        log::debug!(
            "{} asteroid {:?} destroyed at {:?}, {} children",
            self.size.as_str(),
            self.handle,
            self.position,
            children.len()
        );

        Some(ImpactReport {
            handle: self.handle,
            size: self.size,
            position: self.position,
            color,
            score_awarded: profile.score,
            total_score,
            shook,
            flashed,
            children,
        })
    }

    /// Inspect color detection without touching the cache
    pub fn debug_report<W: World>(&self, world: &W, rules: &SizeRules) -> ColorDebugReport {
        let material = world.material(self.handle);
        let properties = rules
            .color_properties
            .iter()
            .map(|p| (p.clone(), material.and_then(|m| m.color_property(p))))
            .collect();
        ColorDebugReport {
            name: self.name.clone(),
            scale: self.scale,
            scale_magnitude: self.scale.length(),
            size: self.size,
            has_material: material.is_some(),
            properties,
            resolved: match self.color {
                ColorCache::Resolved(color) => color,
                ColorCache::Unresolved => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::services::FeedbackEvent;
    use crate::world::{Material, PrefabId, RecordingWorld, WorldOp};

    fn spec(name: &str, size: Option<SizeClass>) -> AsteroidSpec {
        AsteroidSpec {
            name: name.into(),
            position: Vec2::new(3.0, 4.0),
            scale: Vec3::ONE,
            size,
        }
    }

    fn arena_parts() -> (Services, SpawnScheduler, RecordingWorld) {
        let tuning = Tuning::default();
        let spawner = SpawnScheduler::new(tuning.spawn.clone(), tuning.sizes.clone(), tuning.seed);
        let mut services = Services::new(tuning);
        services.install_camera(Vec3::new(0.0, 0.0, -10.0));
        (services, spawner, RecordingWorld::new())
    }

    #[test]
    fn test_explicit_size_wins() {
        let rules = SizeRules::default();
        let forced = spec("BigRock", Some(SizeClass::Small));
        let asteroid = Asteroid::new(EntityHandle(1), forced, &rules);
        assert_eq!(asteroid.size(), SizeClass::Small);
    }

    #[test]
    fn test_color_priority_specific_first() {
        let rules = SizeRules::default();
        let mut asteroid = Asteroid::new(EntityHandle(1), spec("rock", None), &rules);
        let material = Material::new()
            .with_color("_MainColor", Rgba::RED)
            .with_color("_BaseColor", Rgba::CYAN)
            .with_color("_Color", Rgba::YELLOW);
        asteroid.resolve_color(Some(&material), &rules.color_properties);
        assert_eq!(asteroid.color_cache(), ColorCache::Resolved(Some(Rgba::CYAN)));
    }

    #[test]
    fn test_color_resolved_once() {
        let rules = SizeRules::default();
        let mut asteroid = Asteroid::new(EntityHandle(1), spec("rock", None), &rules);
        let first = Material::new().with_color("_Color", Rgba::RED);
        let second = Material::new().with_color("_Color", Rgba::CYAN);
        asteroid.resolve_color(Some(&first), &rules.color_properties);
        asteroid.resolve_color(Some(&second), &rules.color_properties);
        assert_eq!(asteroid.color_cache(), ColorCache::Resolved(Some(Rgba::RED)));
    }

    #[test]
    fn test_missing_or_clear_color_falls_back() {
        let tuning = Tuning::default();
        let rules = &tuning.sizes;
        let mut bare = Asteroid::new(EntityHandle(1), spec("rock", Some(SizeClass::Medium)), rules);
        bare.resolve_color(None::<&Material>, &rules.color_properties);
        assert_eq!(bare.color_cache(), ColorCache::Resolved(None));
        assert_eq!(bare.explosion_color(&tuning.per_size.medium), Rgba::ORANGE);

        let mut clear = Asteroid::new(EntityHandle(2), spec("rock", Some(SizeClass::Big)), rules);
        let material = Material::new().with_color("_Color", Rgba::CLEAR);
        clear.resolve_color(Some(&material), &rules.color_properties);
        assert_eq!(clear.explosion_color(&tuning.per_size.big), Rgba::RED);
    }

    #[test]
    fn test_big_impact_sequence() {
        let (mut services, mut spawner, mut world) = arena_parts();
        let handle = world.instantiate(PrefabId(0), Vec2::new(3.0, 4.0), 0.0);
        let rules = services.tuning().sizes.clone();
        let mut asteroid = Asteroid::attach(handle, spec("AsteroidBig", None), &rules, &world);

        let report = asteroid.on_impact(&mut services, &mut spawner, &mut world).unwrap();
        assert_eq!(report.size, SizeClass::Big);
        assert_eq!(report.score_awarded, 20);
        assert_eq!(report.total_score, 20);
        assert!(report.shook && report.flashed);
        assert_eq!(report.children.len(), 2);
        assert!(report.children.iter().all(|c| c.size() == SizeClass::Medium));
        assert!(report.children.iter().all(|c| c.position() == Vec2::new(3.0, 4.0)));
        assert!(!world.is_live(handle));
        assert!(asteroid.is_destroyed());

        let burst = &services.particles().unwrap().pending()[0];
        assert_eq!((burst.count, burst.force), (40, 12.0));
        assert_eq!(burst.position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_impact_feedback_order() {
        let (mut services, mut spawner, mut world) = arena_parts();
        let pos = Vec2::new(3.0, 4.0);
        let handle = world.instantiate(PrefabId(0), pos, 0.0);
        let rules = services.tuning().sizes.clone();
        let rock = spec("rock", Some(SizeClass::Big));
        let mut asteroid = Asteroid::attach(handle, rock, &rules, &world);
        world.clear_journal();

        asteroid.on_impact(&mut services, &mut spawner, &mut world).unwrap();

        // Shake, burst, score, flash
        assert_eq!(
            services.events(),
            &[
                FeedbackEvent::Shake {
                    duration: 0.5,
                    magnitude: 0.5,
                },
                FeedbackEvent::Burst {
                    position: pos,
                    color: Rgba::RED,
                    count: 40,
                    force: 12.0,
                },
                FeedbackEvent::Score {
                    delta: 20,
                    total: 20,
                },
                FeedbackEvent::Flash {
                    color: Rgba::WHITE,
                    intensity: 0.3,
                    duration: 0.1,
                },
            ]
        );
        // Then fission, then removal
        let journal = world.journal();
        assert_eq!(journal.len(), 3);
        assert!(matches!(journal[0], WorldOp::Instantiate { prefab: PrefabId(1), .. }));
        assert!(matches!(journal[1], WorldOp::Instantiate { prefab: PrefabId(1), .. }));
        assert_eq!(journal[2], WorldOp::Remove { handle });
    }

    #[test]
    fn test_second_impact_is_noop() {
        for size in SizeClass::ALL {
            let (mut services, mut spawner, mut world) = arena_parts();
            let handle = world.instantiate(PrefabId(0), Vec2::ZERO, 0.0);
            let rules = services.tuning().sizes.clone();
            let mut asteroid = Asteroid::attach(handle, spec("rock", Some(size)), &rules, &world);

            assert!(asteroid.on_impact(&mut services, &mut spawner, &mut world).is_some());
            let score = services.score().score();
            let ops = world.journal().len();
            let shakes = services.shake().unwrap().trigger_count();

            assert!(asteroid.on_impact(&mut services, &mut spawner, &mut world).is_none());
            assert_eq!(services.score().score(), score);
            assert_eq!(world.journal().len(), ops);
            assert_eq!(services.shake().unwrap().trigger_count(), shakes);
            assert_eq!(services.particles().unwrap().emitter().bursts, 1);
        }
    }

    #[test]
    fn test_small_impact_no_flash_no_children() {
        let (mut services, mut spawner, mut world) = arena_parts();
        let handle = world.instantiate(PrefabId(2), Vec2::ZERO, 0.0);
        let rules = services.tuning().sizes.clone();
        let rock = spec("rock", Some(SizeClass::Small));
        let mut asteroid = Asteroid::attach(handle, rock, &rules, &world);
        let report = asteroid.on_impact(&mut services, &mut spawner, &mut world).unwrap();
        assert!(!report.flashed);
        assert!(report.children.is_empty());
        assert!(services.flash().is_none());
        assert_eq!(report.total_score, 100);
    }

    #[test]
    fn test_impact_without_camera_still_scores() {
        let tuning = Tuning::default();
        let mut spawner = SpawnScheduler::new(tuning.spawn.clone(), tuning.sizes.clone(), 1);
        let mut services = Services::new(tuning);
        let mut world = RecordingWorld::new();
        let handle = world.instantiate(PrefabId(1), Vec2::ZERO, 0.0);
        let rules = services.tuning().sizes.clone();
        let rock = spec("rock", Some(SizeClass::Medium));
        let mut asteroid = Asteroid::attach(handle, rock, &rules, &world);
        let report = asteroid.on_impact(&mut services, &mut spawner, &mut world).unwrap();
        assert!(!report.shook);
        assert_eq!(report.total_score, 50);
        assert_eq!(report.children.len(), 2);
    }

    #[test]
    fn test_debug_report() {
        let mut world = RecordingWorld::new();
        world.set_prefab_material(PrefabId(0), Material::new().with_color("_Color", Rgba::RED));
        let handle = world.instantiate(PrefabId(0), Vec2::ZERO, 0.0);
        let rules = SizeRules::default();
        let asteroid = Asteroid::attach(handle, spec("rock", None), &rules, &world);
        let report = asteroid.debug_report(&world, &rules);
        assert!(report.has_material);
        assert_eq!(report.properties.len(), 3);
        assert_eq!(report.properties[1], ("_Color".to_string(), Some(Rgba::RED)));
        assert_eq!(report.resolved, Some(Rgba::RED));
        assert_eq!(report.size, SizeClass::Medium);
    }
}
