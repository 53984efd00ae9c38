use std::env;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chroma_app::state::AppState;
use chroma_core::commands::PlayerCommand;
use chroma_core::enums::{GameMode, Hue, StatKind};
use chroma_core::events::GameEvent;
use chroma_core::types::GridCell;
use chroma_sim::engine::SimConfig;
use chroma_sim::render::{draw_frame, DrawList};

const DEFAULT_SECONDS: u64 = 20;

fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn read_mode() -> GameMode {
    match env::var("CHROMA_MODE").ok().as_deref() {
        Some("hard") | Some("Hard") => GameMode::Hard,
        _ => GameMode::Normal,
    }
}

/// `RUST_LOG` directives when they parse, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Opening build along the first two legs of the default path.
fn opening_commands() -> Vec<PlayerCommand> {
    let upgrade_cell = GridCell::new(1, 3);
    vec![
        PlayerCommand::PlaceTower {
            cell_x: 1,
            cell_y: 3,
            color: Hue::Red,
        },
        PlayerCommand::PlaceTower {
            cell_x: 6,
            cell_y: 3,
            color: Hue::Red,
        },
        PlayerCommand::UpgradeTower {
            cell: upgrade_cell,
            stat: StatKind::Range,
        },
        PlayerCommand::Click {
            x: upgrade_cell.center().x,
            y: upgrade_cell.center().y,
        },
    ]
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .init();

    let config = SimConfig {
        seed: read_env_u64("CHROMA_SEED", 42),
        mode: read_mode(),
        ..Default::default()
    };
    let seconds = read_env_u64("CHROMA_SECONDS", DEFAULT_SECONDS);
    let map = config.map.clone();

    let state = AppState::new();
    state
        .start(config)
        .context("failed to start the simulation")?;

    for command in opening_commands() {
        state.send(command)?;
    }

    let mut kills = 0usize;
    let mut lives_lost = 0usize;
    for second in 1..=seconds {
        thread::sleep(Duration::from_secs(1));
        for event in state.drain_events() {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::LifeLost { .. } => lives_lost += 1,
                GameEvent::WaveStarted { wave, target } => info!(wave, target, "wave started"),
                GameEvent::GameOver { wave, score } => warn!(wave, score, "game over"),
                _ => {}
            }
        }
        if let Some(snapshot) = state.snapshot() {
            info!(
                second,
                wave = snapshot.wave,
                enemies = snapshot.enemies.len(),
                money = snapshot.money,
                lives = snapshot.lives,
                "status"
            );
            if snapshot.is_game_over {
                break;
            }
        }
    }

    state.shutdown()?;

    let snapshot = state
        .snapshot()
        .context("game loop never published a snapshot")?;
    let mut frame = DrawList::new();
    draw_frame(&map, &snapshot, &mut frame);

    info!(
        wave = snapshot.wave,
        score = snapshot.score,
        kills,
        lives_lost,
        draw_calls = frame.len(),
        "session finished"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn test_log_filter_honors_rust_log() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }
}
