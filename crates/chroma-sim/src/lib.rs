//! Simulation engine for Chroma Defense.
//!
//! Owns the hecs ECS world, advances it by host-supplied frame deltas,
//! and produces GameStateSnapshots and draw lists for the frontend.

pub mod economy;
pub mod engine;
pub mod map;
pub mod projectile;
pub mod render;
pub mod systems;
pub mod world_setup;

pub use chroma_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
