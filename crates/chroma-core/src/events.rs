//! Events emitted by the simulation for UI feedback.
//!
//! Every state mutation records one event. Hosts that only need a
//! "something changed" signal use `ChangeSet::is_changed`.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{GridCell, Vector2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    EnemySpawned {
        id: u32,
        color: Hue,
        shape: Shape,
    },
    EnemyKilled {
        id: u32,
        reward: i32,
        position: Vector2,
    },
    /// A dying enemy released children.
    EnemySplit {
        parent_id: u32,
        child_ids: Vec<u32>,
    },
    /// An enemy reached the end of the path.
    LifeLost {
        id: u32,
        lives_left: i32,
    },
    TowerPlaced {
        cell: GridCell,
        color: Hue,
        cost: i32,
    },
    TowerUpgraded {
        cell: GridCell,
        stat: StatKind,
        level: u32,
        cost: i32,
    },
    /// A tower fired at an enemy (projectile launched or hitscan applied).
    ShotFired {
        cell: GridCell,
        target_id: u32,
        damage: f32,
    },
    TargetingChanged {
        cell: GridCell,
        mode: TargetingMode,
    },
    SelectionChanged {
        cell: Option<GridCell>,
    },
    /// Every enemy of the wave is gone; the break begins.
    WaveCleared {
        wave: u32,
    },
    WaveStarted {
        wave: u32,
        target: u32,
    },
    GameOver {
        wave: u32,
        score: i64,
    },
    Restarted,
}

/// The mutations recorded since the last time changes were collected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub events: Vec<GameEvent>,
}

impl ChangeSet {
    pub fn is_changed(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
