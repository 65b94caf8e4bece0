//! Asteroid Juice demo entry point
//!
//! Runs a headless arena over the recording world: the periodic spawner
//! populates the field and the ship fires at the oldest asteroid twice a
//! second.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use asteroid_juice::consts::DEFAULT_DT;
    use asteroid_juice::sim::TickInput;
    use asteroid_juice::{
        Arena, Collision, FrameTime, PrefabId, RecordingWorld, Rgba, SizeClass, Tuning, World,
    };
    use glam::{Vec2, Vec3};

    const TICKS: u32 = 600;
    const FIRE_EVERY: u32 = 30;
    const LASER: PrefabId = PrefabId(100);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Asteroid Juice (native) starting...");

    let mut tuning = Tuning::default();
    tuning.rainbow.palette = vec![
        Rgba::RED,
        Rgba::ORANGE,
        Rgba::YELLOW,
        Rgba::rgb(0.0, 1.0, 0.0),
        Rgba::CYAN,
        Rgba::rgb(0.6, 0.2, 1.0),
    ];

    let mut arena = Arena::new(RecordingWorld::new(), tuning);
    arena.install_camera(Vec3::new(0.0, 0.0, -10.0));
    arena.spawn_asteroid(SizeClass::Big, Vec2::new(0.0, 6.0));

    let muzzle = Vec2::new(0.0, 0.6);
    for tick in 1..=TICKS {
        let mut input = TickInput::default();
        if tick % FIRE_EVERY == 0 {
            input.fire = Some(muzzle);
            if let Some(target) = arena.oldest_asteroid() {
                let laser = arena.world_mut().instantiate(LASER, muzzle, 0.0);
                input.collisions.push(Collision::laser(target, laser));
            }
        }
        let out = arena.tick(&input, FrameTime::fixed(DEFAULT_DT));
        for report in &out.impacts {
            log::debug!(
                "tick {tick}: {} destroyed, +{} ({} children)",
                report.size.as_str(),
                report.score_awarded,
                report.children.len()
            );
        }
        // Stand-in for the host's particle renderer
        if !out.bursts.is_empty() {
            log::debug!("tick {tick}: {} bursts to render", out.bursts.len());
        }
    }

    log::info!(
        "Final score {} after {} ticks; {} asteroids live, {} world entities",
        arena.score(),
        arena.time_ticks(),
        arena.asteroid_count(),
        arena.world().live_count()
    );
    if let Some(text) = arena.services().score().displayed_text() {
        log::info!("Score display: {text}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host engine on the web; nothing to run
}
