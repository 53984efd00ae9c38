//! Game loop thread: runs the simulation engine at 60Hz and publishes
//! snapshots.
//!
//! The engine is created inside this thread and never leaves it. Commands
//! arrive via `mpsc` channel; snapshots and events are published into
//! shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info};

use chroma_sim::engine::{clamp_delta, SimConfig, SimulationEngine};

use crate::state::{GameLoopCommand, Published};

/// Host frame rate.
pub const TICK_RATE: u32 = 60;

/// Nominal duration of one frame.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the host to use.
pub fn spawn_game_loop(
    config: SimConfig,
    published: Arc<Mutex<Published>>,
) -> Result<mpsc::Sender<GameLoopCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("chroma-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &published);
        })
        .context("failed to spawn game loop thread")?;

    Ok(cmd_tx)
}

/// Apply every queued command. Returns `false` once the loop should stop.
pub fn drain_commands<R: rand::Rng + Clone>(
    engine: &mut SimulationEngine<R>,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(GameLoopCommand::Player(cmd)) => {
                let accepted = engine.execute(cmd.clone());
                debug!(?cmd, accepted, "player command");
            }
            Ok(GameLoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// Tick once with a wall-clock `elapsed` and publish the result.
pub fn step<R: rand::Rng + Clone>(
    engine: &mut SimulationEngine<R>,
    elapsed: Duration,
    published: &Mutex<Published>,
) {
    let changes = engine.tick(clamp_delta(elapsed.as_secs_f32()));
    let snapshot = engine.snapshot();
    if let Ok(mut lock) = published.lock() {
        lock.snapshot = Some(snapshot);
        if changes.is_changed() {
            lock.events.extend(changes.events);
        }
    }
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    published: &Mutex<Published>,
) {
    info!(seed = config.seed, mode = ?config.mode, "game loop started");
    let mut engine = SimulationEngine::new(config);
    let mut last_frame = Instant::now();
    let mut next_tick_time = last_frame;

    loop {
        // 1. Drain all pending commands
        if !drain_commands(&mut engine, &cmd_rx) {
            break;
        }

        // 2. Advance by the measured frame time
        let now = Instant::now();
        step(&mut engine, now - last_frame, published);
        last_frame = now;

        // 3. Sleep until the next frame
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; the engine clamps the delta, so just resync.
            next_tick_time = now;
        }
    }

    info!(
        ticks = engine.time().tick,
        wave = engine.wave(),
        score = engine.score(),
        "game loop stopped"
    );
}
