//! Wave spawning system: timed spawns within a wave, a break between
//! waves, and the per-wave ramp of quota and cadence.

use hecs::World;
use rand::Rng;
use tracing::debug;

use chroma_core::balance::{BalanceConfig, SpawnerRamp};
use chroma_core::enums::{Hue, Shape, SpawnerPhase};
use chroma_core::events::GameEvent;
use chroma_core::state::SpawnerView;

use crate::map::Path;
use crate::world_setup;

/// Mutable spawner state owned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerState {
    pub phase: SpawnerPhase,
    pub spawn_timer: f32,
    pub spawned_this_wave: u32,
    pub wave_target: u32,
    pub spawn_interval: f32,
    pub break_timer: f32,
    /// False while the first wave is held back waiting for a tower.
    pub started: bool,
}

impl SpawnerState {
    /// Fresh wave-1 state. A `gated` spawner waits for the first tower.
    pub fn new(ramp: &SpawnerRamp, gated: bool) -> Self {
        Self {
            phase: SpawnerPhase::Spawning,
            spawn_timer: 0.0,
            spawned_this_wave: 0,
            wave_target: ramp.initial_target,
            spawn_interval: ramp.initial_interval,
            break_timer: 0.0,
            started: !gated,
        }
    }

    pub fn quota_remaining(&self) -> bool {
        self.spawned_this_wave < self.wave_target
    }

    pub fn view(&self) -> SpawnerView {
        SpawnerView {
            phase: self.phase,
            spawn_timer: self.spawn_timer,
            spawned_this_wave: self.spawned_this_wave,
            wave_target: self.wave_target,
            spawn_interval: self.spawn_interval,
            break_timer: self.break_timer,
            started: self.started,
        }
    }
}

/// Per-tick inputs the spawner reads but does not own.
pub struct SpawnContext<'a> {
    pub balance: &'a BalanceConfig,
    pub path: &'a Path,
    pub tower_count: usize,
    pub dt: f32,
}

/// Advance the spawner by one tick.
pub fn run<R: Rng>(
    state: &mut SpawnerState,
    world: &mut World,
    rng: &mut R,
    ctx: &SpawnContext<'_>,
    wave: &mut u32,
    next_enemy_id: &mut u32,
    events: &mut Vec<GameEvent>,
) {
    if !state.started {
        if ctx.tower_count == 0 {
            return;
        }
        state.started = true;
        debug!(wave = *wave, "first tower placed, spawning begins");
    }

    match state.phase {
        SpawnerPhase::Spawning => {
            state.spawn_timer += ctx.dt;
            if state.spawn_timer >= state.spawn_interval && state.quota_remaining() {
                let (color, shape) = pick_enemy(rng, ctx.balance, *wave);
                let id = world_setup::next_id(next_enemy_id);
                world_setup::spawn_enemy(world, ctx.balance, ctx.path, id, color, shape, *wave);
                events.push(GameEvent::EnemySpawned { id, color, shape });
                state.spawned_this_wave += 1;
                state.spawn_timer = 0.0;
            }
        }
        SpawnerPhase::Break => {
            state.break_timer += ctx.dt;
            if state.break_timer >= ctx.balance.spawner.break_duration {
                start_next_wave(state, &ctx.balance.spawner, wave);
                debug!(
                    wave = *wave,
                    target = state.wave_target,
                    interval = state.spawn_interval,
                    "wave started"
                );
                events.push(GameEvent::WaveStarted {
                    wave: *wave,
                    target: state.wave_target,
                });
            }
        }
    }
}

/// Leave the break and ramp up for the next wave.
fn start_next_wave(state: &mut SpawnerState, ramp: &SpawnerRamp, wave: &mut u32) {
    *wave = wave.saturating_add(1);
    state.phase = SpawnerPhase::Spawning;
    state.spawn_timer = 0.0;
    state.break_timer = 0.0;
    state.spawned_this_wave = 0;
    state.wave_target = state.wave_target.saturating_add(ramp.target_increment);
    state.spawn_interval = (state.spawn_interval - ramp.interval_decrement).max(ramp.min_interval);
}

/// End-of-tick check: a fully spawned wave with nobody left enters the break.
pub fn check_wave_cleared(
    state: &mut SpawnerState,
    enemy_count: usize,
    wave: u32,
    events: &mut Vec<GameEvent>,
) -> bool {
    let cleared = state.started
        && state.phase == SpawnerPhase::Spawning
        && !state.quota_remaining()
        && enemy_count == 0;
    if cleared {
        state.phase = SpawnerPhase::Break;
        state.break_timer = 0.0;
        debug!(wave, "wave cleared");
        events.push(GameEvent::WaveCleared { wave });
    }
    cleared
}

/// Roll a hue from the wave's color band and a uniformly random shape.
pub fn pick_enemy<R: Rng>(rng: &mut R, balance: &BalanceConfig, wave: u32) -> (Hue, Shape) {
    let color = match balance.band_for(wave) {
        Some(band) if band.total_weight() > 0 => {
            band.hue_for_roll(rng.gen_range(0..band.total_weight()))
        }
        _ => Hue::Red,
    };
    let shape = Shape::ALL[rng.gen_range(0..Shape::ALL.len())];
    (color, shape)
}
