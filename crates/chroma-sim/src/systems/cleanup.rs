//! Cleanup system: resolves enemies that died or reached the end, spawns
//! split children, and ages death markers.
//!
//! Despawns are deferred into a buffer and applied once all enemies have
//! been examined, so no collection is mutated while it is being walked.

use hecs::{Entity, World};
use tracing::debug;

use chroma_core::balance::BalanceConfig;
use chroma_core::components::{DeathMarker, Enemy, Health, PathFollower};
use chroma_core::constants::DEATH_MARKER_LIFETIME;
use chroma_core::events::GameEvent;
use chroma_core::types::Position;

use crate::economy::Economy;
use crate::world_setup;

/// Remove finished enemies and apply their economy effects.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    balance: &BalanceConfig,
    economy: &mut Economy,
    next_enemy_id: &mut u32,
    markers: &mut Vec<DeathMarker>,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let mut escaped: Vec<(u32, Entity)> = Vec::new();
    let mut killed: Vec<(Entity, Enemy, Health, PathFollower, Position)> = Vec::new();

    for (entity, (enemy, health, follower, pos)) in world
        .query::<(&Enemy, &Health, &PathFollower, &Position)>()
        .iter()
    {
        if follower.reached_end {
            escaped.push((enemy.id, entity));
        } else if health.is_dead() {
            killed.push((entity, *enemy, *health, *follower, *pos));
        }
    }
    escaped.sort_by_key(|(id, _)| *id);
    killed.sort_by_key(|(_, enemy, ..)| enemy.id);

    for (id, entity) in escaped {
        let lives_left = economy.lose_life();
        events.push(GameEvent::LifeLost { id, lives_left });
        despawn_buffer.push(entity);
    }

    for (entity, enemy, health, follower, pos) in killed {
        economy.reward_kill(enemy.reward);
        events.push(GameEvent::EnemyKilled {
            id: enemy.id,
            reward: enemy.reward,
            position: pos.0,
        });
        markers.push(DeathMarker {
            position: pos.0,
            color: enemy.color,
            shape: enemy.shape,
            radius: enemy.radius,
            remaining: DEATH_MARKER_LIFETIME,
        });

        let child_ids = world_setup::spawn_children(
            world,
            balance,
            &enemy,
            &health,
            &follower,
            pos.0,
            next_enemy_id,
        );
        if !child_ids.is_empty() {
            debug!(parent = enemy.id, children = child_ids.len(), "enemy split");
            events.push(GameEvent::EnemySplit {
                parent_id: enemy.id,
                child_ids,
            });
        }
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Age death markers and drop the expired ones.
pub fn fade_markers(markers: &mut Vec<DeathMarker>, dt: f32) {
    for marker in markers.iter_mut() {
        marker.remaining -= dt;
    }
    markers.retain(|marker| marker.remaining > 0.0);
}
