//! Balance tables: every gameplay constant that is a tuning choice rather
//! than a derived rule.
//!
//! Tables are indexed by `Hue::index()` / `Shape::index()`, so a table
//! always holds an entry for every variant. The whole config can be
//! replaced from JSON.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{Hue, Shape, StatKind};

/// Damage multiplier keyed by (attacker hue, defender hue).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessMatrix {
    /// `rows[attacker][defender]`
    pub rows: [[f32; 3]; 3],
}

impl Default for EffectivenessMatrix {
    fn default() -> Self {
        Self {
            rows: [
                // defender: Red, Green, Blue
                [1.0, 0.7, 0.4], // Red towers
                [0.4, 1.0, 0.7], // Green towers
                [0.7, 0.4, 1.0], // Blue towers
            ],
        }
    }
}

impl EffectivenessMatrix {
    pub fn get(&self, attacker: Hue, defender: Hue) -> f32 {
        self.rows[attacker.index()][defender.index()]
    }
}

/// Per-shape enemy stats before hue and wave scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub base_health: f32,
    /// Units per second.
    pub speed: f32,
    pub reward: i32,
    /// Collision radius used for projectile hits.
    pub radius: f32,
}

/// What an enemy turns into when it dies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRule {
    pub child: Shape,
    pub count: u32,
    /// Fraction of the parent's max health given to each child.
    pub health_fraction: f32,
}

/// Per-hue tower stats at level 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    pub cost: i32,
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    pub damage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRule {
    /// Fractional bonus per level above 1.
    pub per_level_bonus: f32,
    /// Cost of the first upgrade.
    pub initial_cost: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeTable {
    pub range: UpgradeRule,
    pub fire_rate: UpgradeRule,
    pub damage: UpgradeRule,
    /// Factor applied to an upgrade's cost after each purchase.
    pub cost_growth: f32,
}

impl UpgradeTable {
    pub fn rule(&self, stat: StatKind) -> UpgradeRule {
        match stat {
            StatKind::Range => self.range,
            StatKind::FireRate => self.fire_rate,
            StatKind::Damage => self.damage,
        }
    }
}

/// Hue distribution for waves starting at `from_wave`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveBand {
    pub from_wave: u32,
    /// Relative weights for Red, Green, Blue.
    pub weights: [u32; 3],
}

impl WaveBand {
    pub fn total_weight(&self) -> u32 {
        self.weights.iter().sum()
    }

    /// Map a roll in `0..total_weight()` onto a hue.
    pub fn hue_for_roll(&self, roll: u32) -> Hue {
        let mut remaining = roll;
        for hue in Hue::ALL {
            let weight = self.weights[hue.index()];
            if remaining < weight {
                return hue;
            }
            remaining -= weight;
        }
        // Only reachable for an all-zero band.
        Hue::Red
    }
}

/// Wave director pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnerRamp {
    pub initial_target: u32,
    pub target_increment: u32,
    pub initial_interval: f32,
    pub interval_decrement: f32,
    pub min_interval: f32,
    pub break_duration: f32,
}

impl Default for SpawnerRamp {
    fn default() -> Self {
        Self {
            initial_target: INITIAL_WAVE_TARGET,
            target_increment: WAVE_TARGET_INCREMENT,
            initial_interval: INITIAL_SPAWN_INTERVAL,
            interval_decrement: SPAWN_INTERVAL_DECREMENT,
            min_interval: MIN_SPAWN_INTERVAL,
            break_duration: BREAK_DURATION,
        }
    }
}

/// The complete set of balance tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    pub effectiveness: EffectivenessMatrix,
    /// Indexed by `Shape::index()`.
    pub enemies: [EnemyStats; 3],
    /// Health multiplier per enemy hue.
    pub hue_health: [f32; 3],
    /// Reward multiplier per enemy hue.
    pub hue_reward: [i32; 3],
    /// Indexed by `Shape::index()`; `None` means the shape is terminal.
    pub splits: [Option<SplitRule>; 3],
    /// Indexed by `Hue::index()`.
    pub towers: [TowerStats; 3],
    pub upgrades: UpgradeTable,
    /// Sorted by `from_wave`, first entry starting at wave 1.
    pub wave_bands: Vec<WaveBand>,
    pub spawner: SpawnerRamp,
    /// Per-wave compounding health factor.
    pub wave_health_growth: f32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            effectiveness: EffectivenessMatrix::default(),
            enemies: [
                EnemyStats {
                    base_health: 20.0,
                    speed: 70.0,
                    reward: 3,
                    radius: 8.0,
                },
                EnemyStats {
                    base_health: 35.0,
                    speed: 55.0,
                    reward: 5,
                    radius: 10.0,
                },
                EnemyStats {
                    base_health: 60.0,
                    speed: 45.0,
                    reward: 8,
                    radius: 12.0,
                },
            ],
            hue_health: [1.0, 2.0, 4.0],
            hue_reward: [1, 2, 3],
            splits: [
                None,
                Some(SplitRule {
                    child: Shape::Circle,
                    count: 3,
                    health_fraction: 0.4,
                }),
                Some(SplitRule {
                    child: Shape::Triangle,
                    count: 2,
                    health_fraction: 0.6,
                }),
            ],
            towers: [
                TowerStats {
                    cost: 25,
                    range: 110.0,
                    fire_rate: 1.5,
                    damage: 8.0,
                },
                TowerStats {
                    cost: 50,
                    range: 130.0,
                    fire_rate: 1.0,
                    damage: 16.0,
                },
                TowerStats {
                    cost: 100,
                    range: 150.0,
                    fire_rate: 0.75,
                    damage: 30.0,
                },
            ],
            upgrades: UpgradeTable {
                range: UpgradeRule {
                    per_level_bonus: 0.15,
                    initial_cost: 20,
                },
                fire_rate: UpgradeRule {
                    per_level_bonus: 0.20,
                    initial_cost: 25,
                },
                damage: UpgradeRule {
                    per_level_bonus: 0.25,
                    initial_cost: 30,
                },
                cost_growth: UPGRADE_COST_GROWTH,
            },
            wave_bands: vec![
                WaveBand {
                    from_wave: 1,
                    weights: [100, 0, 0],
                },
                WaveBand {
                    from_wave: 2,
                    weights: [80, 20, 0],
                },
                WaveBand {
                    from_wave: 4,
                    weights: [50, 50, 0],
                },
                WaveBand {
                    from_wave: 6,
                    weights: [40, 45, 15],
                },
                WaveBand {
                    from_wave: 8,
                    weights: [20, 45, 35],
                },
            ],
            spawner: SpawnerRamp::default(),
            wave_health_growth: WAVE_HEALTH_GROWTH,
        }
    }
}

impl BalanceConfig {
    /// Load a full table set from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn effectiveness(&self, attacker: Hue, defender: Hue) -> f32 {
        self.effectiveness.get(attacker, defender)
    }

    pub fn enemy_stats(&self, shape: Shape) -> EnemyStats {
        self.enemies[shape.index()]
    }

    pub fn split_rule(&self, shape: Shape) -> Option<SplitRule> {
        self.splits[shape.index()]
    }

    pub fn tower_stats(&self, hue: Hue) -> TowerStats {
        self.towers[hue.index()]
    }

    pub fn tower_cost(&self, hue: Hue) -> i32 {
        self.towers[hue.index()].cost
    }

    /// Health multiplier for enemies spawned during `wave` (1-based).
    pub fn wave_multiplier(&self, wave: u32) -> f32 {
        self.wave_health_growth
            .powi(wave.saturating_sub(1).min(i32::MAX as u32) as i32)
    }

    /// Max health of a freshly spawned enemy.
    pub fn spawn_health(&self, shape: Shape, hue: Hue, wave: u32) -> f32 {
        self.enemy_stats(shape).base_health * self.hue_health[hue.index()] * self.wave_multiplier(wave)
    }

    pub fn reward(&self, shape: Shape, hue: Hue) -> i32 {
        self.enemy_stats(shape).reward * self.hue_reward[hue.index()]
    }

    /// The band governing `wave`: the last band whose `from_wave <= wave`.
    pub fn band_for(&self, wave: u32) -> Option<&WaveBand> {
        self.wave_bands
            .iter()
            .take_while(|band| band.from_wave <= wave)
            .last()
            .or_else(|| self.wave_bands.first())
    }
}
