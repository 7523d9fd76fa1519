use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use log::info;

mod core;
mod engine;
mod game;

use engine::game_loop::FixedStepLoop;
use engine::input::{Action, Axis, ScriptedInput};
use engine::physics::{ActorPhysics, CollisionGroups};
use game::actors::{EnemyStats, LogSinks, PlayerStats};
use game::spawner::{SpawnPoint, SpawnerConfig};
use game::Scene;

/// Wall-clock time of one rendered frame in the scripted run
const FRAME_TIME: Duration = Duration::from_millis(20);
const FRAMES: u64 = 300;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Floorfight...");

    let mut scene = Scene::new(Box::new(LogSinks));
    scene.add_surface(Vec2::ZERO, Vec2::new(40.0, 1.0), CollisionGroups::Floor);
    scene.add_surface(
        Vec2::new(8.0, 3.0),
        Vec2::new(4.0, 0.5),
        CollisionGroups::Environment,
    );

    let player = scene.register_player(Vec2::new(0.0, 2.0), PlayerStats::standard())?;
    scene.spawn_enemy(EnemyStats::standard(), Vec2::new(4.0, 1.0))?;

    let grunt = scene.register_prefab(EnemyStats::standard())?;
    let mut runner = EnemyStats::standard();
    runner.velocity = 4.0;
    let runner = scene.register_prefab(runner)?;
    scene.add_spawner(
        SpawnerConfig::new(
            vec![grunt, runner],
            vec![SpawnPoint::new(-6.0, 1.0), SpawnPoint::new(6.0, 1.0)],
            Duration::from_secs(2),
        )
        .with_seed(42),
    )?;

    info!("Scene ready, running {} frames", FRAMES);

    let mut game_loop = FixedStepLoop::new();
    let mut input = ScriptedInput::new();
    let mut spawned = 0;
    let mut removed = 0;
    let mut kills = 0;

    for frame in 0..FRAMES {
        // Scripted player: walk right, hop, swing, walk back
        match frame {
            30 => input.set_axis(Axis::Horizontal, 1.0),
            60 => input.press(Action::Jump),
            75 => input.release(Action::Jump),
            100 => input.set_axis(Axis::Horizontal, 0.0),
            120 | 200 => input.press(Action::Attack),
            125 | 205 => input.release(Action::Attack),
            150 => input.set_axis(Axis::Horizontal, -1.0),
            180 => input.set_axis(Axis::Horizontal, 0.0),
            // Simulation stands still while paused
            240 | 250 => game_loop.toggle_pause(),
            _ => {}
        }

        let updates = game_loop.begin_frame(FRAME_TIME);
        for _ in 0..updates {
            let summary = scene.tick(game_loop.step_duration(), &input);
            input.end_frame();

            spawned += summary.spawned.len();
            removed += summary.removed.len();

            // The swing's hit frame raises the attack event right away
            if summary.player.attack_triggered {
                let hits = scene.attack_event(player)?;
                kills += hits.len();
                info!("Attack at {:?} hit {} enemies", scene.now(), hits.len());
            }
        }
    }

    let position = scene.physics().position(player).unwrap_or_default();
    let dying = scene.enemies().filter(|e| !e.life().is_alive()).count();
    info!(
        "Simulated {:?} in {} updates over {} frames",
        game_loop.simulated(),
        game_loop.update_count(),
        game_loop.frame_count()
    );
    info!(
        "Player ended at ({:.2}, {:.2}); {} spawned, {} killed, {} removed, {} left ({} dying)",
        position.x,
        position.y,
        spawned,
        kills,
        removed,
        scene.enemy_count(),
        dying
    );

    scene.unload();
    info!("Floorfight finished");
    Ok(())
}
