//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Color of an enemy or tower.
///
/// For enemies it selects the health tier, for towers the cost tier.
/// The pair (tower hue, enemy hue) keys the effectiveness matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hue {
    #[default]
    Red,
    Green,
    Blue,
}

impl Hue {
    pub const ALL: [Hue; 3] = [Hue::Red, Hue::Green, Hue::Blue];

    /// Row/column of this hue in the balance tables.
    pub fn index(self) -> usize {
        match self {
            Hue::Red => 0,
            Hue::Green => 1,
            Hue::Blue => 2,
        }
    }
}

/// Enemy shape. Marks how many split generations remain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Terminal: never splits.
    #[default]
    Circle,
    /// Splits into circles.
    Triangle,
    /// Splits into triangles.
    Square,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Circle, Shape::Triangle, Shape::Square];

    pub fn index(self) -> usize {
        match self {
            Shape::Circle => 0,
            Shape::Triangle => 1,
            Shape::Square => 2,
        }
    }
}

/// How a tower chooses among enemies in range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingMode {
    /// Minimum distance to the tower.
    #[default]
    Closest,
    /// Maximum current health.
    Strongest,
}

/// Independently levelled tower stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Range,
    FireRate,
    Damage,
}

/// Game mode, selecting starting money and whether the first wave waits
/// for the first tower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// 100 starting money; spawning waits until a tower is built.
    #[default]
    Normal,
    /// 50 starting money; spawning starts immediately.
    Hard,
}

/// How towers deliver damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireMode {
    /// Towers launch homing projectiles.
    #[default]
    Projectile,
    /// Towers apply damage the moment they fire.
    Hitscan,
}

/// Wave director phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerPhase {
    /// Releasing enemies for the current wave.
    #[default]
    Spawning,
    /// Idle pause between waves.
    Break,
}
