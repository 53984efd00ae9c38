//! Projectile flight: homing, collision, and lifetime expiry.

use hecs::{Entity, World};

use chroma_core::components::{Enemy, Health, PathFollower};
use chroma_core::constants::{PROJECTILE_HIT_MARGIN, PROJECTILE_MAX_LIFETIME, PROJECTILE_SPEED};
use chroma_core::types::{self, Position, Vector2};

use crate::projectile::Projectile;
use crate::systems::fire_control;

/// Advance one projectile by `dt`.
///
/// While the target is alive and on the path the projectile homes on it,
/// re-aiming every tick. Once the target is gone the projectile keeps its
/// last velocity until its lifetime runs out.
pub fn update(projectile: &mut Projectile, world: &World, dt: f32) {
    if !projectile.active {
        return;
    }

    projectile.lifetime += dt;
    if projectile.lifetime > PROJECTILE_MAX_LIFETIME {
        projectile.active = false;
        return;
    }

    projectile.position = types::add(projectile.position, types::scale(projectile.velocity, dt));

    let Some((target_position, radius)) = live_target(world, projectile.target) else {
        return;
    };

    if types::distance(projectile.position, target_position) <= radius + PROJECTILE_HIT_MARGIN {
        fire_control::damage_enemy(world, projectile.target, projectile.damage);
        projectile.active = false;
    } else {
        let direction = types::normalize(types::sub(target_position, projectile.position));
        projectile.velocity = types::scale(direction, PROJECTILE_SPEED);
    }
}

/// Position and collision radius of a target that can still be hit.
fn live_target(world: &World, entity: Entity) -> Option<(Vector2, f32)> {
    let health = world.get::<&Health>(entity).ok()?;
    let follower = world.get::<&PathFollower>(entity).ok()?;
    if health.is_dead() || follower.reached_end {
        return None;
    }
    let position = world.get::<&Position>(entity).ok()?;
    let enemy = world.get::<&Enemy>(entity).ok()?;
    Some((position.0, enemy.radius))
}
