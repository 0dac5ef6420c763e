//! Chroma Chase Demo
//!
//! Runs a fully scripted round against the headless host: scatter the
//! coins, swap in a theme, then walk the player coin to coin while the
//! pursuer closes in, logging everything the coordinator reports.

use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chroma_chase::core::math::move_towards;
use chroma_chase::engine::harness::HeadlessScene;
use chroma_chase::engine::hooks::SceneQuery;
use chroma_chase::game::camera::ChaseCamera;
use chroma_chase::game::events::RoundEvent;
use chroma_chase::game::pursuer::PursuerAgent;
use chroma_chase::game::spawner::Spawner;
use chroma_chase::{GameConfig, RoundCoordinator, TICK_RATE, VERSION};

/// Scripted player walk speed (units/sec)
const PLAYER_SPEED: f32 = 5.0;

/// Pursuer nav speed (units/sec), slower than the player
const PURSUER_SPEED: f32 = 3.5;

/// Contact distance treated as a trigger-enter
const CONTACT_RADIUS: f32 = 0.6;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Chroma Chase v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => GameConfig::default(),
    };

    demo_round(config);
    Ok(())
}

/// One scripted run: menu → play → collect until the round resolves,
/// advancing a level after a win and restarting once after a loss.
fn demo_round(config: GameConfig) {
    let mut scene = HeadlessScene::new(config.shutdown);
    // A couple of pillars so placement and the camera have something to dodge
    scene.add_obstacle(Vec3::new(6.0, 0.5, 6.0), 1.0);
    scene.add_obstacle(Vec3::new(-8.0, 0.5, 3.0), 1.5);

    let mut coordinator =
        RoundCoordinator::new(config.round.clone(), config.themes.clone(), config.seed);
    let mut spawner = Spawner::new(
        config.spawner.clone(),
        config.seed.wrapping_mul(0x9E37_79B9),
    );
    let mut pursuer = PursuerAgent::new();
    let mut camera = ChaseCamera::new(config.camera.clone());

    setup_scene(&mut coordinator, &mut spawner, &mut pursuer, &mut scene);

    let dt = 1.0 / TICK_RATE as f32;
    let mut levels_cleared = 0u32;
    let mut restarts_left = 1u32;

    // Ten simulated minutes, tops
    for _ in 0..(10 * 60 * TICK_RATE) {
        drive_player(&coordinator, &mut scene, dt);
        check_collections(&mut coordinator, &mut scene);

        pursuer.tick(&mut scene);
        scene.step_navigation(dt, PURSUER_SPEED);
        check_capture(&mut coordinator, &mut pursuer, &mut scene);

        coordinator.tick(dt, &mut scene);
        camera.late_tick(dt * scene.time_scale(), &scene);

        let mut won = false;
        let mut lost = false;
        for event in coordinator.take_events() {
            report(&event);
            match event {
                RoundEvent::RoundWon { .. } => won = true,
                RoundEvent::RoundLost { .. } => lost = true,
                _ => {}
            }
        }

        if won {
            levels_cleared += 1;
            if levels_cleared >= 2 {
                info!(score = coordinator.score(), "run complete, quitting");
                coordinator.on_quit_pressed(&mut scene);
            } else {
                coordinator.advance_level_default(&mut spawner, &mut scene);
            }
        } else if lost {
            if restarts_left > 0 {
                restarts_left -= 1;
                info!("restarting once");
                coordinator.restart(&mut scene);
                setup_scene(&mut coordinator, &mut spawner, &mut pursuer, &mut scene);
            } else {
                info!(score = coordinator.score(), "run over");
                break;
            }
        }

        if scene.shutdown_requested() {
            break;
        }
    }

    info!(
        final_score = coordinator.score(),
        levels_cleared,
        camera_pos = ?camera.position(),
        "demo finished"
    );
}

/// Scene-setup sequence: scatter coins, wire everything, leave the menu.
fn setup_scene(
    coordinator: &mut RoundCoordinator,
    spawner: &mut Spawner,
    pursuer: &mut PursuerAgent,
    scene: &mut HeadlessScene,
) {
    spawner.populate(coordinator.registry_mut(), scene);
    coordinator.init(pursuer, scene);
    // Pick the second theme from the menu, as a player might
    coordinator.select_theme(1, pursuer, scene);
    coordinator.on_play_pressed(scene);
}

/// Walk the player toward the most promising coin (target color first).
fn drive_player(coordinator: &RoundCoordinator, scene: &mut HeadlessScene, dt: f32) {
    if !coordinator.phase().is_running() {
        return;
    }
    let Some(player) = coordinator.current_actor() else {
        return;
    };
    let Some(pos) = scene.position(player) else {
        return;
    };

    let target_color = coordinator.target_color();
    let nearest = |color_only: bool| {
        coordinator
            .registry()
            .active()
            .filter(|c| !color_only || c.color == target_color)
            .min_by(|a, b| {
                a.position
                    .distance_squared(pos)
                    .total_cmp(&b.position.distance_squared(pos))
            })
            .map(|c| c.position)
    };
    let Some(goal) = nearest(true).or_else(|| nearest(false)) else {
        return;
    };

    let step = PLAYER_SPEED * dt * scene.time_scale();
    let next = move_towards(pos, goal, step);
    let velocity = if dt > 0.0 {
        (next - pos) / dt
    } else {
        Vec3::ZERO
    };
    scene.set_position(player, next);
    scene.set_velocity(player, velocity);
}

/// Trigger-enter substitute: report coins the player is standing on.
fn check_collections(coordinator: &mut RoundCoordinator, scene: &mut HeadlessScene) {
    let Some(player) = coordinator.current_actor() else {
        return;
    };
    let Some(pos) = scene.position(player) else {
        return;
    };
    let touched: Vec<_> = coordinator
        .registry()
        .active()
        .filter(|c| c.position.distance(pos) <= CONTACT_RADIUS)
        .map(|c| c.id)
        .collect();
    for id in touched {
        coordinator.on_collected(id, scene);
    }
}

/// Trigger-enter substitute for the pursuer reaching the player.
fn check_capture(
    coordinator: &mut RoundCoordinator,
    pursuer: &mut PursuerAgent,
    scene: &mut HeadlessScene,
) {
    let (Some(agent), Some(target)) = (pursuer.agent(), pursuer.target()) else {
        return;
    };
    let (Some(agent_pos), Some(target_pos)) = (scene.position(agent), scene.position(target))
    else {
        return;
    };
    if agent_pos.distance(target_pos) <= CONTACT_RADIUS {
        pursuer.on_contact(target, coordinator, scene);
    }
}

/// Pretty-print a coordinator event.
fn report(event: &RoundEvent) {
    match event {
        RoundEvent::Collected {
            color,
            matched,
            score,
            ..
        } => {
            if *matched {
                info!(?color, score, "collected the target color");
            } else {
                warn!(?color, score, "collected the wrong color");
            }
        }
        RoundEvent::TargetChanged { color, repainted } => {
            info!(?color, ?repainted, "new target color");
        }
        RoundEvent::RoundStarted { level } => info!(level, "round started"),
        RoundEvent::RoundWon { score } => info!(score, "level complete"),
        RoundEvent::RoundLost { cause, score } => info!(?cause, score, "round lost"),
        RoundEvent::LevelAdvanced {
            level,
            collectible_count,
        } => info!(level, coins = collectible_count, "next level"),
        RoundEvent::ThemeApplied { index, name } => info!(index, name = %name, "theme applied"),
    }
}
