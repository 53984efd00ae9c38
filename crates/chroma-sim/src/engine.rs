//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and every counter of a
//! running game, applies player actions, runs all systems in a fixed order,
//! and produces `GameStateSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use chroma_core::balance::BalanceConfig;
use chroma_core::commands::PlayerCommand;
use chroma_core::components::{DeathMarker, Enemy, Tower};
use chroma_core::constants::MAX_DELTA;
use chroma_core::enums::{FireMode, GameMode, Hue, Shape, StatKind, TargetingMode};
use chroma_core::events::{ChangeSet, GameEvent};
use chroma_core::state::{DeathMarkerView, EnemyView, GameStateSnapshot, SpawnerView, TowerView};
use chroma_core::types::{GridCell, SimTime, Vector2};

use crate::economy::Economy;
use crate::map::GameMap;
use crate::systems;
use crate::systems::snapshot::SnapshotContext;
use crate::systems::wave_spawner::{SpawnContext, SpawnerState};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub mode: GameMode,
    pub fire_mode: FireMode,
    pub balance: BalanceConfig,
    pub map: GameMap,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mode: GameMode::default(),
            fire_mode: FireMode::default(),
            balance: BalanceConfig::default(),
            map: GameMap::default_map(),
        }
    }
}

/// Clamp a host-supplied frame delta to `[0, MAX_DELTA]`. NaN counts as zero.
pub fn clamp_delta(dt: f32) -> f32 {
    if dt.is_nan() {
        0.0
    } else {
        dt.clamp(0.0, MAX_DELTA)
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine<R: Rng + Clone = ChaCha8Rng> {
    config: SimConfig,
    world: World,
    time: SimTime,
    rng: R,
    /// The generator as it was at construction, restored by `restart`.
    initial_rng: R,
    economy: Economy,
    wave: u32,
    game_over: bool,
    selected_tower: Option<GridCell>,
    towers: HashMap<GridCell, Entity>,
    death_markers: Vec<DeathMarker>,
    spawner: SpawnerState,
    next_enemy_id: u32,
    despawn_buffer: Vec<Entity>,
    pending: Vec<GameEvent>,
}

impl SimulationEngine<ChaCha8Rng> {
    /// Create a new simulation engine seeded from `config.seed`.
    pub fn new(config: SimConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng + Clone> SimulationEngine<R> {
    /// Create an engine driven by a caller-supplied generator.
    pub fn with_rng(config: SimConfig, rng: R) -> Self {
        let spawner = SpawnerState::new(
            &config.balance.spawner,
            config.mode == GameMode::Normal,
        );
        Self {
            world: World::new(),
            time: SimTime::default(),
            initial_rng: rng.clone(),
            rng,
            economy: Economy::new(config.mode),
            wave: 1,
            game_over: false,
            selected_tower: None,
            towers: HashMap::new(),
            death_markers: Vec::new(),
            spawner,
            next_enemy_id: 0,
            despawn_buffer: Vec::new(),
            pending: Vec::new(),
            config,
        }
    }

    /// Advance the simulation by `dt` seconds and return everything that
    /// changed since changes were last collected. Does nothing once the
    /// game is over.
    pub fn tick(&mut self, dt: f32) -> ChangeSet {
        if self.game_over {
            return self.take_changes();
        }
        let dt = clamp_delta(dt);

        self.run_systems(dt);

        if self.economy.is_defeated() {
            self.game_over = true;
            info!(wave = self.wave, score = self.economy.score, "game over");
            self.pending.push(GameEvent::GameOver {
                wave: self.wave,
                score: self.economy.score,
            });
        }

        self.time.advance(dt);
        self.take_changes()
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f32) {
        // 1. Wave spawning
        let ctx = SpawnContext {
            balance: &self.config.balance,
            path: self.config.map.path(),
            tower_count: self.towers.len(),
            dt,
        };
        systems::wave_spawner::run(
            &mut self.spawner,
            &mut self.world,
            &mut self.rng,
            &ctx,
            &mut self.wave,
            &mut self.next_enemy_id,
            &mut self.pending,
        );
        // 2. Enemy movement
        systems::movement::run(&mut self.world, self.config.map.path(), dt);
        // 3. Towers and their projectiles
        systems::fire_control::run(
            &mut self.world,
            &self.config.balance,
            self.config.fire_mode,
            dt,
            &mut self.pending,
        );
        // 4. Cleanup (deaths, splits, end reached)
        systems::cleanup::run(
            &mut self.world,
            &self.config.balance,
            &mut self.economy,
            &mut self.next_enemy_id,
            &mut self.death_markers,
            &mut self.pending,
            &mut self.despawn_buffer,
        );
        // 5. Death markers
        systems::cleanup::fade_markers(&mut self.death_markers, dt);
        // 6. Wave transition
        let enemy_count = self.world.query::<&Enemy>().iter().count();
        systems::wave_spawner::check_wave_cleared(
            &mut self.spawner,
            enemy_count,
            self.wave,
            &mut self.pending,
        );
    }

    /// Build a tower of `color` on the given cell. Fails off-grid, on the
    /// path, on an occupied cell, without enough money, or after game over.
    pub fn try_place_tower(&mut self, cell_x: i32, cell_y: i32, color: Hue) -> bool {
        if self.game_over {
            return false;
        }
        let cell = GridCell::new(cell_x, cell_y);
        if !self.config.map.is_buildable(cell) || self.towers.contains_key(&cell) {
            return false;
        }
        let cost = self.config.balance.tower_cost(color);
        if !self.economy.try_spend(cost) {
            return false;
        }

        let entity = world_setup::spawn_tower(&mut self.world, &self.config.balance, cell, color);
        self.towers.insert(cell, entity);
        debug!(x = cell.x, y = cell.y, ?color, cost, "tower placed");
        self.pending.push(GameEvent::TowerPlaced { cell, color, cost });
        true
    }

    /// Buy the next level of `stat` for the tower on `cell`.
    pub fn try_upgrade(&mut self, cell: GridCell, stat: StatKind) -> bool {
        if self.game_over {
            return false;
        }
        let Some(&entity) = self.towers.get(&cell) else {
            return false;
        };
        let Ok(mut tower) = self.world.get::<&mut Tower>(entity) else {
            return false;
        };

        let upgrade = tower.stat_mut(stat);
        let cost = upgrade.next_cost;
        if !self.economy.try_spend(cost) {
            return false;
        }
        upgrade.level_up(self.config.balance.upgrades.cost_growth);
        let level = upgrade.level;
        drop(tower);

        debug!(x = cell.x, y = cell.y, ?stat, level, cost, "tower upgraded");
        self.pending.push(GameEvent::TowerUpgraded {
            cell,
            stat,
            level,
            cost,
        });
        true
    }

    /// Switch the targeting rule of the tower on `cell`. Free of charge.
    pub fn set_targeting(&mut self, cell: GridCell, mode: TargetingMode) -> bool {
        if self.game_over {
            return false;
        }
        let Some(&entity) = self.towers.get(&cell) else {
            return false;
        };
        let Ok(mut tower) = self.world.get::<&mut Tower>(entity) else {
            return false;
        };
        if tower.targeting != mode {
            tower.targeting = mode;
            drop(tower);
            self.pending.push(GameEvent::TargetingChanged { cell, mode });
        }
        true
    }

    /// Select the tower under `position`, or clear the selection. Returns
    /// whether a tower is selected afterwards.
    pub fn handle_click(&mut self, position: Vector2) -> bool {
        let selected = GridCell::from_world(position).filter(|cell| self.towers.contains_key(cell));
        if selected != self.selected_tower {
            self.selected_tower = selected;
            self.pending.push(GameEvent::SelectionChanged { cell: selected });
        }
        selected.is_some()
    }

    /// Reset to the state of a freshly built engine with the same config,
    /// including the random sequence.
    pub fn restart(&mut self) {
        let fresh = Self::with_rng(self.config.clone(), self.initial_rng.clone());
        *self = fresh;
        info!(mode = ?self.config.mode, "game restarted");
        self.pending.push(GameEvent::Restarted);
    }

    /// Apply a serialized player command.
    pub fn execute(&mut self, command: PlayerCommand) -> bool {
        match command {
            PlayerCommand::PlaceTower {
                cell_x,
                cell_y,
                color,
            } => self.try_place_tower(cell_x, cell_y, color),
            PlayerCommand::UpgradeTower { cell, stat } => self.try_upgrade(cell, stat),
            PlayerCommand::SetTargeting { cell, mode } => self.set_targeting(cell, mode),
            PlayerCommand::Click { x, y } => self.handle_click(Vector2::new(x, y)),
            PlayerCommand::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Drain the events recorded since the last call.
    pub fn take_changes(&mut self) -> ChangeSet {
        ChangeSet {
            events: std::mem::take(&mut self.pending),
        }
    }

    /// Spawn an enemy at the start of the path outside the wave schedule.
    /// Used by scripted scenarios; returns the new enemy id.
    pub fn spawn_enemy(&mut self, color: Hue, shape: Shape) -> u32 {
        let id = world_setup::next_id(&mut self.next_enemy_id);
        world_setup::spawn_enemy(
            &mut self.world,
            &self.config.balance,
            self.config.map.path(),
            id,
            color,
            shape,
            self.wave,
        );
        self.pending.push(GameEvent::EnemySpawned { id, color, shape });
        id
    }

    /// Deal `amount` damage to the enemy with `id`, as a tower shot would.
    /// Deaths resolve on the next tick.
    pub fn damage_enemy(&mut self, id: u32, amount: f32) -> bool {
        let entity = self
            .world
            .query::<&Enemy>()
            .iter()
            .find(|(_, enemy)| enemy.id == id)
            .map(|(entity, _)| entity);
        match entity {
            Some(entity) => systems::fire_control::damage_enemy(&self.world, entity, amount),
            None => false,
        }
    }

    /// A copy of the complete visible state.
    pub fn snapshot(&self) -> GameStateSnapshot {
        let ctx = SnapshotContext {
            time: self.time,
            mode: self.config.mode,
            wave: self.wave,
            economy: &self.economy,
            is_game_over: self.game_over,
            selected_tower: self.selected_tower,
            spawner: &self.spawner,
            death_markers: &self.death_markers,
        };
        systems::snapshot::build_snapshot(&self.world, &ctx)
    }

    pub fn enemies(&self) -> Vec<EnemyView> {
        systems::snapshot::build_enemies(&self.world)
    }

    pub fn towers(&self) -> Vec<TowerView> {
        systems::snapshot::build_towers(&self.world)
    }

    /// The tower on `cell`, if any.
    pub fn tower_at(&self, cell: GridCell) -> Option<TowerView> {
        self.towers().into_iter().find(|t| t.cell == cell)
    }

    pub fn death_markers(&self) -> Vec<DeathMarkerView> {
        systems::snapshot::build_death_markers(&self.death_markers)
    }

    pub fn lives(&self) -> i32 {
        self.economy.lives
    }

    pub fn money(&self) -> i32 {
        self.economy.money
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn score(&self) -> i64 {
        self.economy.score
    }

    pub fn kills(&self) -> u32 {
        self.economy.kills
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn selected_tower(&self) -> Option<GridCell> {
        self.selected_tower
    }

    pub fn spawner(&self) -> SpawnerView {
        self.spawner.view()
    }

    pub fn map(&self) -> &GameMap {
        &self.config.map
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }
}
