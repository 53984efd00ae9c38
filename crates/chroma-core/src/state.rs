//! Game state snapshot: a copy of everything a host or renderer may read.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{GridCell, SimTime, Vector2};

/// Complete visible state, built on demand by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub mode: GameMode,
    pub wave: u32,
    pub lives: i32,
    pub money: i32,
    pub score: i64,
    pub kills: u32,
    pub is_game_over: bool,
    pub selected_tower: Option<GridCell>,
    pub spawner: SpawnerView,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub death_markers: Vec<DeathMarkerView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnerView {
    pub phase: SpawnerPhase,
    pub spawn_timer: f32,
    pub spawned_this_wave: u32,
    pub wave_target: u32,
    pub spawn_interval: f32,
    pub break_timer: f32,
    /// False while the planning phase holds the first wave back.
    pub started: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub color: Hue,
    pub shape: Shape,
    pub position: Vector2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub reward: i32,
    pub radius: f32,
    pub waypoint_index: usize,
    pub progress: f32,
    pub reached_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatView {
    pub level: u32,
    pub value: f32,
    pub next_cost: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    pub cell: GridCell,
    pub position: Vector2,
    pub color: Hue,
    pub range: StatView,
    pub fire_rate: StatView,
    pub damage: StatView,
    pub targeting: TargetingMode,
    pub cooldown: f32,
    pub projectiles: Vec<ProjectileView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vector2,
    pub velocity: Vector2,
    pub damage: f32,
    pub target_id: u32,
    pub lifetime: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathMarkerView {
    pub position: Vector2,
    pub color: Hue,
    pub shape: Shape,
    pub radius: f32,
    /// Opacity in [0, 1], fading linearly to zero.
    pub alpha: f32,
}
