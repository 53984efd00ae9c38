//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in systems; the few
//! methods here are pure derivations from stored fields.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{GridCell, Vector2};

/// Identity and fixed stats of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique for the lifetime of the engine that spawned it.
    pub id: u32,
    pub color: Hue,
    pub shape: Shape,
    /// Units per second.
    pub speed: f32,
    /// Money granted on death.
    pub reward: i32,
    /// Collision radius.
    pub radius: f32,
}

/// Hit points. `current` stays within `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Progress along the map path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PathFollower {
    /// Index of the waypoint the current segment starts at.
    pub waypoint_index: usize,
    /// Fraction of the current segment covered, in [0, 1].
    pub progress: f32,
    /// Terminal: the enemy has reached the last waypoint.
    pub reached_end: bool,
}

/// A tower stat with its own upgrade level.
///
/// The value is derived from `base` and `level` on every read, so
/// repeated upgrades never accumulate rounding error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradableStat {
    pub base: f32,
    /// Starts at 1.
    pub level: u32,
    pub per_level_bonus: f32,
    /// Price of the next level.
    pub next_cost: i32,
}

impl UpgradableStat {
    pub fn new(base: f32, per_level_bonus: f32, initial_cost: i32) -> Self {
        Self {
            base,
            level: 1,
            per_level_bonus,
            next_cost: initial_cost,
        }
    }

    pub fn value(&self) -> f32 {
        self.base * (1.0 + (self.level - 1) as f32 * self.per_level_bonus)
    }

    /// Take one level and reprice the next: `ceil(cost * growth)`, always
    /// at least one more than what was just paid.
    pub fn level_up(&mut self, cost_growth: f32) {
        let paid = self.next_cost;
        self.level = self.level.saturating_add(1);
        let grown = (paid as f32 * cost_growth).ceil();
        let grown = if grown.is_finite() && grown < i32::MAX as f32 {
            grown as i32
        } else {
            i32::MAX
        };
        self.next_cost = grown.max(paid.saturating_add(1));
    }
}

/// A player-built tower. Identified by its grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub cell: GridCell,
    pub color: Hue,
    pub range: UpgradableStat,
    /// Shots per second.
    pub fire_rate: UpgradableStat,
    pub damage: UpgradableStat,
    pub targeting: TargetingMode,
    /// Seconds since the last shot.
    pub cooldown: f32,
}

impl Tower {
    pub fn stat(&self, kind: StatKind) -> &UpgradableStat {
        match kind {
            StatKind::Range => &self.range,
            StatKind::FireRate => &self.fire_rate,
            StatKind::Damage => &self.damage,
        }
    }

    pub fn stat_mut(&mut self, kind: StatKind) -> &mut UpgradableStat {
        match kind {
            StatKind::Range => &mut self.range,
            StatKind::FireRate => &mut self.fire_rate,
            StatKind::Damage => &mut self.damage,
        }
    }

    /// Seconds between shots.
    pub fn fire_interval(&self) -> f32 {
        1.0 / self.fire_rate.value()
    }
}

/// Cosmetic fade-out left where an enemy died. Not part of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathMarker {
    pub position: Vector2,
    pub color: Hue,
    pub shape: Shape,
    /// Radius of the enemy that died here.
    pub radius: f32,
    /// Seconds left before the marker disappears.
    pub remaining: f32,
}
