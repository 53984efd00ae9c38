//! Projectile state owned by the tower that fired it.
//!
//! Projectiles hold a generational `hecs::Entity` for their target, so a
//! target that has been despawned simply fails to resolve.

use hecs::Entity;

use chroma_core::constants::PROJECTILE_SPEED;
use chroma_core::state::ProjectileView;
use chroma_core::types::{self, Vector2};

/// A homing munition in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vector2,
    pub velocity: Vector2,
    pub damage: f32,
    pub target: Entity,
    /// Enemy id of the target, for display.
    pub target_id: u32,
    pub active: bool,
    /// Seconds in flight.
    pub lifetime: f32,
}

impl Projectile {
    /// Launch from `origin` straight at `target_position` at projectile speed.
    pub fn launch(
        origin: Vector2,
        target_position: Vector2,
        target: Entity,
        target_id: u32,
        damage: f32,
    ) -> Self {
        let direction = types::normalize(types::sub(target_position, origin));
        Self {
            position: origin,
            velocity: types::scale(direction, PROJECTILE_SPEED),
            damage,
            target,
            target_id,
            active: true,
            lifetime: 0.0,
        }
    }

    pub fn view(&self) -> ProjectileView {
        ProjectileView {
            position: self.position,
            velocity: self.velocity,
            damage: self.damage,
            target_id: self.target_id,
            lifetime: self.lifetime,
        }
    }
}

/// Component: the projectiles a tower currently has in flight.
#[derive(Debug, Clone, Default)]
pub struct Projectiles(pub Vec<Projectile>);
