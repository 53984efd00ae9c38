//! Player commands sent from the host to the simulation.
//!
//! Each command maps onto one engine action and reports success as a bool.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::GridCell;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Build a tower on an empty, buildable cell.
    PlaceTower { cell_x: i32, cell_y: i32, color: Hue },
    /// Raise one stat of the tower on `cell` by a level.
    UpgradeTower { cell: GridCell, stat: StatKind },
    /// Change the targeting rule of the tower on `cell`.
    SetTargeting { cell: GridCell, mode: TargetingMode },
    /// Click at a world position; selects the tower under it, if any.
    Click { x: f32, y: f32 },
    /// Reset to a fresh game.
    Restart,
}
