//! Fire control system: target acquisition, cooldown-gated firing, and
//! per-tower projectile updates.
//!
//! Towers are processed one at a time in grid order. Each tower sees the
//! enemy health left by the towers before it in the same tick.

use hecs::{Entity, World};

use chroma_core::balance::BalanceConfig;
use chroma_core::components::{Enemy, Health, PathFollower, Tower};
use chroma_core::enums::{FireMode, Hue, TargetingMode};
use chroma_core::events::GameEvent;
use chroma_core::types::{self, GridCell, Position, Vector2};

use crate::projectile::{Projectile, Projectiles};
use crate::systems::flight;

/// An enemy eligible to be shot at: alive and still on the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub entity: Entity,
    pub id: u32,
    pub color: Hue,
    pub position: Vector2,
    pub health: f32,
}

/// Run every tower for one tick.
pub fn run(
    world: &mut World,
    balance: &BalanceConfig,
    fire_mode: FireMode,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let mut towers: Vec<(GridCell, Entity)> = world
        .query::<&Tower>()
        .iter()
        .map(|(entity, tower)| (tower.cell, entity))
        .collect();
    towers.sort_by_key(|(cell, _)| (cell.y, cell.x));

    for (_cell, tower_entity) in towers {
        update_tower(world, balance, fire_mode, tower_entity, dt, events);
    }
}

/// Living, on-path enemies in ascending id order.
pub fn collect_candidates(world: &World) -> Vec<TargetCandidate> {
    let mut candidates: Vec<TargetCandidate> = world
        .query::<(&Enemy, &Health, &PathFollower, &Position)>()
        .iter()
        .filter(|(_, (_, health, follower, _))| !health.is_dead() && !follower.reached_end)
        .map(|(entity, (enemy, health, _, pos))| TargetCandidate {
            entity,
            id: enemy.id,
            color: enemy.color,
            position: pos.0,
            health: health.current,
        })
        .collect();
    candidates.sort_by_key(|c| c.id);
    candidates
}

/// Pick a target within `range` of `origin`.
///
/// Ties keep the earliest candidate in slice order.
pub fn select_target(
    candidates: &[TargetCandidate],
    origin: Vector2,
    range: f32,
    mode: TargetingMode,
) -> Option<&TargetCandidate> {
    let mut best: Option<(&TargetCandidate, f32)> = None;

    for candidate in candidates {
        let dist = types::distance(origin, candidate.position);
        if dist > range {
            continue;
        }
        let better = match (mode, best) {
            (_, None) => true,
            (TargetingMode::Closest, Some((_, best_dist))) => dist < best_dist,
            (TargetingMode::Strongest, Some((current, _))) => candidate.health > current.health,
        };
        if better {
            best = Some((candidate, dist));
        }
    }

    best.map(|(candidate, _)| candidate)
}

/// Clamp-subtract `amount` from `health`.
pub fn apply_damage(health: &mut Health, amount: f32) {
    health.current = (health.current - amount.max(0.0)).max(0.0);
}

/// Damage an enemy entity unless it has already reached the end.
/// Returns whether damage was applied.
pub fn damage_enemy(world: &World, entity: Entity, amount: f32) -> bool {
    let reached_end = match world.get::<&PathFollower>(entity) {
        Ok(follower) => follower.reached_end,
        Err(_) => return false,
    };
    if reached_end {
        return false;
    }
    match world.get::<&mut Health>(entity) {
        Ok(mut health) => {
            apply_damage(&mut health, amount);
            true
        }
        Err(_) => false,
    }
}

/// Advance one tower: cooldown, targeting, firing, then its projectiles.
fn update_tower(
    world: &mut World,
    balance: &BalanceConfig,
    fire_mode: FireMode,
    tower_entity: Entity,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let candidates = collect_candidates(world);

    let shot = {
        let Ok(mut tower) = world.get::<&mut Tower>(tower_entity) else {
            return;
        };
        let origin = match world.get::<&Position>(tower_entity) {
            Ok(pos) => pos.0,
            Err(_) => tower.cell.center(),
        };

        tower.cooldown += dt;
        let target = select_target(&candidates, origin, tower.range.value(), tower.targeting);
        match target {
            Some(target) if tower.cooldown >= tower.fire_interval() => {
                tower.cooldown = 0.0;
                let damage =
                    tower.damage.value() * balance.effectiveness(tower.color, target.color);
                events.push(GameEvent::ShotFired {
                    cell: tower.cell,
                    target_id: target.id,
                    damage,
                });
                Some((origin, *target, damage))
            }
            _ => None,
        }
    };

    if let Some((origin, target, damage)) = shot {
        match fire_mode {
            FireMode::Hitscan => {
                damage_enemy(world, target.entity, damage);
            }
            FireMode::Projectile => {
                if let Ok(mut projectiles) = world.get::<&mut Projectiles>(tower_entity) {
                    projectiles.0.push(Projectile::launch(
                        origin,
                        target.position,
                        target.entity,
                        target.id,
                        damage,
                    ));
                }
            }
        }
    }

    // Take the projectile list out so the flight update can touch enemies.
    let mut in_flight = match world.get::<&mut Projectiles>(tower_entity) {
        Ok(mut projectiles) => std::mem::take(&mut projectiles.0),
        Err(_) => return,
    };
    for projectile in &mut in_flight {
        flight::update(projectile, world, dt);
    }
    in_flight.retain(|p| p.active);
    if let Ok(mut projectiles) = world.get::<&mut Projectiles>(tower_entity) {
        projectiles.0 = in_flight;
    }
}
