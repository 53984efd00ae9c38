//! Core types and definitions for the CHROMA DEFENSE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, balance tables, commands, state snapshots,
//! events, and constants. It has no dependency on any runtime framework.

pub mod balance;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
