//! Entity spawn factories.
//!
//! Creates enemy, split-child, and tower entities with their component
//! bundles. Callers own the id counter and pass it in explicitly.

use hecs::{Entity, World};

use chroma_core::balance::BalanceConfig;
use chroma_core::components::*;
use chroma_core::enums::*;
use chroma_core::types::{GridCell, Position, Vector2};

use crate::map::Path;
use crate::projectile::Projectiles;

/// Take the next enemy id from the caller's counter.
pub fn next_id(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter = counter.wrapping_add(1);
    id
}

/// Spawn a fresh enemy at the start of the path, with health scaled for `wave`.
pub fn spawn_enemy(
    world: &mut World,
    balance: &BalanceConfig,
    path: &Path,
    id: u32,
    color: Hue,
    shape: Shape,
    wave: u32,
) -> Entity {
    let stats = balance.enemy_stats(shape);
    let enemy = Enemy {
        id,
        color,
        shape,
        speed: stats.speed,
        reward: balance.reward(shape, color),
        radius: stats.radius,
    };

    world.spawn((
        enemy,
        Health::full(balance.spawn_health(shape, color, wave)),
        PathFollower::default(),
        Position(path.first()),
    ))
}

/// Spawn the children of a dying enemy, if its shape splits.
///
/// Each child sits exactly where the parent was (same waypoint cursor and
/// progress), keeps its hue, and gets `parent max * fraction` health. The
/// parent's max already carries the wave multiplier it spawned under.
/// Returns the new ids in spawn order.
pub fn spawn_children(
    world: &mut World,
    balance: &BalanceConfig,
    parent: &Enemy,
    parent_health: &Health,
    follower: &PathFollower,
    position: Vector2,
    next_enemy_id: &mut u32,
) -> Vec<u32> {
    let Some(rule) = balance.split_rule(parent.shape) else {
        return Vec::new();
    };

    let stats = balance.enemy_stats(rule.child);
    let child_health = parent_health.max * rule.health_fraction;

    let mut ids = Vec::with_capacity(rule.count as usize);
    for _ in 0..rule.count {
        let id = next_id(next_enemy_id);
        world.spawn((
            Enemy {
                id,
                color: parent.color,
                shape: rule.child,
                speed: stats.speed,
                reward: balance.reward(rule.child, parent.color),
                radius: stats.radius,
            },
            Health::full(child_health),
            PathFollower {
                waypoint_index: follower.waypoint_index,
                progress: follower.progress,
                reached_end: false,
            },
            Position(position),
        ));
        ids.push(id);
    }
    ids
}

/// Build a level-1 tower of `color` for `cell`.
pub fn build_tower(balance: &BalanceConfig, cell: GridCell, color: Hue) -> Tower {
    let stats = balance.tower_stats(color);
    let stat = |kind: StatKind, base: f32| {
        let rule = balance.upgrades.rule(kind);
        UpgradableStat::new(base, rule.per_level_bonus, rule.initial_cost)
    };
    Tower {
        cell,
        color,
        range: stat(StatKind::Range, stats.range),
        fire_rate: stat(StatKind::FireRate, stats.fire_rate),
        damage: stat(StatKind::Damage, stats.damage),
        targeting: TargetingMode::default(),
        cooldown: 0.0,
    }
}

/// Spawn a tower entity centered on `cell`.
pub fn spawn_tower(world: &mut World, balance: &BalanceConfig, cell: GridCell, color: Hue) -> Entity {
    world.spawn((
        build_tower(balance, cell, color),
        Position(cell.center()),
        Projectiles::default(),
    ))
}
