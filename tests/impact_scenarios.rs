//! End-to-end impact scenarios driven through the public `Arena` API

use asteroid_juice::consts::DEFAULT_DT;
use asteroid_juice::sim::TickInput;
use asteroid_juice::world::WorldOp;
use asteroid_juice::{
    Arena, Collision, EntityHandle, FrameTime, Material, PrefabId, RecordingWorld, Rgba, SizeClass,
    TickOutput, Tuning, World,
};
use glam::{Vec2, Vec3};
use proptest::prelude::*;

const LASER: PrefabId = PrefabId(50);
const CAMERA_REST: Vec3 = Vec3::new(0.0, 0.0, -10.0);

fn arena_with(tuning: Tuning) -> Arena<RecordingWorld> {
    let mut arena = Arena::new(RecordingWorld::new(), tuning);
    arena.install_camera(CAMERA_REST);
    arena
}

fn shoot(arena: &mut Arena<RecordingWorld>, target: EntityHandle) -> TickOutput {
    let laser = arena.world_mut().instantiate(LASER, Vec2::ZERO, 0.0);
    let input = TickInput::collisions(vec![Collision::laser(target, laser)]);
    arena.tick(&input, FrameTime::fixed(DEFAULT_DT))
}

#[test]
fn big_impact_full_sequence() {
    let mut tuning = Tuning::default();
    tuning.per_size.big.score = 20;
    let mut arena = arena_with(tuning);
    let big = arena.spawn_asteroid(SizeClass::Big, Vec2::new(3.0, 4.0));
    arena.world_mut().clear_journal();

    let out = shoot(&mut arena, big);
    assert_eq!(out.impacts.len(), 1);
    let report = &out.impacts[0];

    // Shake with the Big preset
    let shake = arena.services().shake().unwrap();
    assert_eq!(shake.trigger_count(), 1);
    assert_ne!(shake.position(), CAMERA_REST);

    // One burst of 40 at the impact point, in the size fallback color
    let bursts = &out.bursts;
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].count, 40);
    assert_eq!(bursts[0].position, Vec2::new(3.0, 4.0));
    assert_eq!(bursts[0].color, Rgba::RED);

    assert_eq!(report.score_awarded, 20);
    assert_eq!(arena.score(), 20);
    assert!(report.flashed);
    assert_eq!(arena.services().flash().unwrap().flash_count(), 1);

    // Two Medium children at the parent position, then the parent removed
    assert_eq!(report.children.len(), 2);
    let journal = arena.world().journal();
    let children: Vec<_> = journal
        .iter()
        .filter_map(|op| match op {
            WorldOp::Instantiate {
                prefab, position, ..
            } if *prefab == PrefabId(1) => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(children, vec![Vec2::new(3.0, 4.0); 2]);
    let parent_removed = journal
        .iter()
        .position(|op| *op == WorldOp::Remove { handle: big })
        .unwrap();
    let last_child = journal
        .iter()
        .rposition(|op| matches!(op, WorldOp::Instantiate { prefab, .. } if *prefab == PrefabId(1)))
        .unwrap();
    assert!(parent_removed > last_child);

    // A second impact on the same asteroid changes nothing
    let ops = arena.world().journal().len();
    let again = shoot(&mut arena, big);
    assert!(again.impacts.is_empty());
    assert!(again.bursts.is_empty());
    assert_eq!(arena.score(), 20);
    // Only the new laser was instantiated
    assert_eq!(arena.world().journal().len(), ops + 1);
    assert_eq!(arena.services().shake().unwrap().trigger_count(), 1);
}

#[test]
fn detected_material_color_drives_burst() {
    let mut world = RecordingWorld::new();
    world.set_prefab_material(PrefabId(1), Material::new().with_color("_MainColor", Rgba::CYAN));
    let mut arena = Arena::new(world, Tuning::default());
    let medium = arena.spawn_asteroid(SizeClass::Medium, Vec2::ZERO);
    let out = shoot(&mut arena, medium);
    let report = &out.impacts[0];
    assert_eq!(report.color, Rgba::CYAN);
    assert_eq!(out.bursts[0].color, Rgba::CYAN);
    assert!(!report.shook);
    assert!(!report.flashed);
}

#[test]
fn full_cascade_from_one_big() {
    let mut arena = arena_with(Tuning::default());
    arena.spawn_asteroid(SizeClass::Big, Vec2::ZERO);
    let mut destroyed = Vec::new();
    let mut last_score = arena.score();
    while let Some(target) = arena.oldest_asteroid() {
        for report in shoot(&mut arena, target).impacts {
            destroyed.push(report.size);
        }
        assert!(arena.score() >= last_score);
        last_score = arena.score();
    }
    let count = |size| destroyed.iter().filter(|s| **s == size).count();
    assert_eq!(count(SizeClass::Big), 1);
    assert_eq!(count(SizeClass::Medium), 2);
    assert_eq!(count(SizeClass::Small), 4);
    assert_eq!(arena.score(), 20 + 2 * 50 + 4 * 100);
    assert_eq!(arena.world().live_count(), 0);
}

#[test]
fn shake_settles_and_flash_clears() {
    let mut arena = arena_with(Tuning::default());
    let big = arena.spawn_asteroid(SizeClass::Big, Vec2::ZERO);
    shoot(&mut arena, big);
    let idle = TickInput::default();
    for _ in 0..120 {
        arena.tick(&idle, FrameTime::fixed(DEFAULT_DT));
    }
    let snapshot = arena.snapshot();
    assert_eq!(snapshot.camera, Some(CAMERA_REST));
    let overlay = snapshot.overlay.unwrap();
    assert!(!overlay.visible);
}

#[test]
fn rainbow_score_display_updates() {
    let mut tuning = Tuning::default();
    tuning.rainbow.palette = vec![Rgba::RED, Rgba::CYAN];
    let mut arena = arena_with(tuning);
    let small = arena.spawn_asteroid(SizeClass::Small, Vec2::ZERO);
    shoot(&mut arena, small);
    let rainbow = arena.services().score().rainbow().unwrap();
    assert_eq!(rainbow.plain_text(), "Score: 100");
    assert_eq!(rainbow.rendered().plain(), "Score: 100");
}

#[test]
fn tuning_round_trips_through_json() {
    let json = r#"{ "seed": 9, "spawn": { "interval": 2.0 } }"#;
    let tuning = Tuning::from_json_str(json).unwrap();
    assert_eq!(tuning.seed, 9);
    assert_eq!(tuning.spawn.interval, 2.0);
    assert_eq!(tuning.spawn.x_sides, 23.16);
    assert!(Tuning::from_json_str(r#"{ "spawn": { "interval": -1.0 } }"#).is_err());
}

proptest! {
    #[test]
    fn shake_always_restores_rest(
        duration in 0.0f32..2.0,
        magnitude in 0.0f32..5.0,
        interrupt in proptest::option::of(0usize..60),
    ) {
        let mut arena = arena_with(Tuning::default());
        let idle = TickInput::default();
        arena.services_mut().trigger_shake(duration, magnitude);
        let frames = (duration / DEFAULT_DT) as usize + 2;
        for frame in 0..frames {
            if interrupt == Some(frame) {
                arena.services_mut().trigger_shake(duration, magnitude);
            }
            arena.tick(&idle, FrameTime::fixed(DEFAULT_DT));
        }
        for _ in 0..(frames + 2) {
            arena.tick(&idle, FrameTime::fixed(DEFAULT_DT));
        }
        let shake = arena.services().shake().unwrap();
        prop_assert!(!shake.is_shaking());
        prop_assert_eq!(shake.position(), CAMERA_REST);
    }
}
