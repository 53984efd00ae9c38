//! Chroma Defense headless host.
//!
//! Runs the simulation engine on its own thread at a fixed frame rate and
//! exposes commands, snapshots, and events to the caller.

pub mod game_loop;
pub mod state;

pub use chroma_core as core;
