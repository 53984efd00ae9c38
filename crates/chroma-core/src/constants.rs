//! Simulation constants and tuning parameters.
//!
//! Balance values that are expected to change (costs, stats, wave bands)
//! live in `balance::BalanceConfig`; the defaults there are built from
//! the values below.

// --- World ---

/// Reference canvas width (world units).
pub const WORLD_WIDTH: f32 = 800.0;

/// Reference canvas height (world units).
pub const WORLD_HEIGHT: f32 = 600.0;

/// Edge length of one build cell.
pub const CELL_SIZE: f32 = 40.0;

/// Build grid columns (`WORLD_WIDTH / CELL_SIZE`).
pub const GRID_COLUMNS: i32 = 20;

/// Build grid rows (`WORLD_HEIGHT / CELL_SIZE`).
pub const GRID_ROWS: i32 = 15;

// --- Timing ---

/// Upper bound on a single tick's delta (seconds).
pub const MAX_DELTA: f32 = 1.0 / 30.0;

// --- Economy ---

pub const STARTING_LIVES: i32 = 20;

pub const STARTING_MONEY_NORMAL: i32 = 100;

pub const STARTING_MONEY_HARD: i32 = 50;

// --- Projectiles ---

/// Projectile speed (units/s).
pub const PROJECTILE_SPEED: f32 = 300.0;

/// Projectiles deactivate after this many seconds of flight.
pub const PROJECTILE_MAX_LIFETIME: f32 = 2.0;

/// Added to the target's collision radius for hit detection.
pub const PROJECTILE_HIT_MARGIN: f32 = 4.0;

// --- Death markers ---

/// Lifetime of the cosmetic marker left where an enemy died (seconds).
pub const DEATH_MARKER_LIFETIME: f32 = 2.0;

// --- Wave director ---

/// Enemies in wave 1.
pub const INITIAL_WAVE_TARGET: u32 = 5;

/// Added to the enemy quota at every wave transition.
pub const WAVE_TARGET_INCREMENT: u32 = 2;

/// Seconds between spawns in wave 1.
pub const INITIAL_SPAWN_INTERVAL: f32 = 1.0;

/// Subtracted from the spawn interval at every wave transition.
pub const SPAWN_INTERVAL_DECREMENT: f32 = 0.05;

/// Floor for the spawn interval.
pub const MIN_SPAWN_INTERVAL: f32 = 0.3;

/// Length of the pause between waves (seconds).
pub const BREAK_DURATION: f32 = 3.0;

/// Per-wave compounding health growth.
pub const WAVE_HEALTH_GROWTH: f32 = 1.02;

// --- Upgrades ---

/// Factor applied to an upgrade's cost after each purchase.
pub const UPGRADE_COST_GROWTH: f32 = 1.5;
