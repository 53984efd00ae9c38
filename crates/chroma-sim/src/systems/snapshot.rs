//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only: it never modifies the world.

use hecs::World;

use chroma_core::components::*;
use chroma_core::constants::DEATH_MARKER_LIFETIME;
use chroma_core::enums::GameMode;
use chroma_core::state::*;
use chroma_core::types::{GridCell, Position, SimTime};

use crate::economy::Economy;
use crate::projectile::Projectiles;
use crate::systems::wave_spawner::SpawnerState;

/// Engine-owned state that lives outside the ECS world.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub mode: GameMode,
    pub wave: u32,
    pub economy: &'a Economy,
    pub is_game_over: bool,
    pub selected_tower: Option<GridCell>,
    pub spawner: &'a SpawnerState,
    pub death_markers: &'a [DeathMarker],
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(world: &World, ctx: &SnapshotContext<'_>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: ctx.time,
        mode: ctx.mode,
        wave: ctx.wave,
        lives: ctx.economy.lives,
        money: ctx.economy.money,
        score: ctx.economy.score,
        kills: ctx.economy.kills,
        is_game_over: ctx.is_game_over,
        selected_tower: ctx.selected_tower,
        spawner: ctx.spawner.view(),
        enemies: build_enemies(world),
        towers: build_towers(world),
        death_markers: build_death_markers(ctx.death_markers),
    }
}

/// Every enemy still in the world, in id order.
pub fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Health, &PathFollower, &Position)>()
        .iter()
        .map(|(_, (enemy, health, follower, pos))| EnemyView {
            id: enemy.id,
            color: enemy.color,
            shape: enemy.shape,
            position: pos.0,
            health: health.current,
            max_health: health.max,
            speed: enemy.speed,
            reward: enemy.reward,
            radius: enemy.radius,
            waypoint_index: follower.waypoint_index,
            progress: follower.progress,
            reached_end: follower.reached_end,
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

/// Every tower with its in-flight projectiles, in grid order.
pub fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<(&Tower, &Position, &Projectiles)>()
        .iter()
        .map(|(_, (tower, pos, projectiles))| tower_view(tower, pos, projectiles))
        .collect();

    towers.sort_by_key(|t| (t.cell.y, t.cell.x));
    towers
}

fn tower_view(tower: &Tower, pos: &Position, projectiles: &Projectiles) -> TowerView {
    TowerView {
        cell: tower.cell,
        position: pos.0,
        color: tower.color,
        range: stat_view(&tower.range),
        fire_rate: stat_view(&tower.fire_rate),
        damage: stat_view(&tower.damage),
        targeting: tower.targeting,
        cooldown: tower.cooldown,
        projectiles: projectiles.0.iter().map(|p| p.view()).collect(),
    }
}

fn stat_view(stat: &UpgradableStat) -> StatView {
    StatView {
        level: stat.level,
        value: stat.value(),
        next_cost: stat.next_cost,
    }
}

/// Death markers with their fade expressed as opacity.
pub fn build_death_markers(markers: &[DeathMarker]) -> Vec<DeathMarkerView> {
    markers
        .iter()
        .map(|m| DeathMarkerView {
            position: m.position,
            color: m.color,
            shape: m.shape,
            radius: m.radius,
            alpha: (m.remaining / DEATH_MARKER_LIFETIME).clamp(0.0, 1.0),
        })
        .collect()
}
