//! Fundamental geometric and simulation types.
//!
//! World space is 2D, in pixels of an 800x600 reference canvas.
//! x grows to the right, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{CELL_SIZE, GRID_COLUMNS, GRID_ROWS};

/// 2D vector used for every world-space quantity.
pub type Vector2 = Vec2;

pub fn add(a: Vector2, b: Vector2) -> Vector2 {
    a + b
}

pub fn sub(a: Vector2, b: Vector2) -> Vector2 {
    a - b
}

pub fn scale(v: Vector2, factor: f32) -> Vector2 {
    v * factor
}

pub fn length(v: Vector2) -> f32 {
    v.length()
}

/// Unit vector in the direction of `v`, or zero for a zero-length input.
pub fn normalize(v: Vector2) -> Vector2 {
    v.normalize_or_zero()
}

pub fn distance(a: Vector2, b: Vector2) -> f32 {
    a.distance(b)
}

/// Linear interpolation with `t` clamped to [0, 1].
///
/// Written as a weighted sum so that `t == 0` yields `a` and `t == 1`
/// yields `b` bit-exactly.
pub fn lerp(a: Vector2, b: Vector2, t: f32) -> Vector2 {
    let t = t.clamp(0.0, 1.0);
    a * (1.0 - t) + b * t
}

/// World-space position component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vector2);

/// A cell of the build grid. Also the identity of a tower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether the cell lies inside the build grid.
    pub fn in_bounds(&self) -> bool {
        (0..GRID_COLUMNS).contains(&self.x) && (0..GRID_ROWS).contains(&self.y)
    }

    /// World position of the cell center.
    pub fn center(&self) -> Vector2 {
        Vec2::new(
            (self.x as f32 + 0.5) * CELL_SIZE,
            (self.y as f32 + 0.5) * CELL_SIZE,
        )
    }

    /// World position of the cell's top-left corner.
    pub fn origin(&self) -> Vector2 {
        Vec2::new(self.x as f32 * CELL_SIZE, self.y as f32 * CELL_SIZE)
    }

    /// The cell containing a world position, if it is on the grid.
    pub fn from_world(point: Vector2) -> Option<Self> {
        if !point.x.is_finite() || !point.y.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let cell = Self::new(
            (point.x / CELL_SIZE).floor() as i32,
            (point.y / CELL_SIZE).floor() as i32,
        );
        cell.in_bounds().then_some(cell)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks that advanced the world.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}
