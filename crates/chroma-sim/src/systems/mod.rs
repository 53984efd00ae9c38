//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! They keep no state of their own; engine-owned state is passed in.

pub mod cleanup;
pub mod fire_control;
pub mod flight;
pub mod movement;
pub mod snapshot;
pub mod wave_spawner;
