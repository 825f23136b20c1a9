//! Simulation kernel for Tellus.
//!
//! Owns the world state, runs the deterministic tick loop, manages entity
//! lifecycles through validated factories, and evaluates the stochastic event
//! triggers that perturb the terrain and the cities. Completely headless, so
//! every behaviour is testable from a seed.

pub mod config;
pub mod engine;
pub mod entity;
pub mod factory;
pub mod registry;
pub mod save;
pub mod systems;
pub mod trigger;

pub use tellus_core as core;
pub use tellus_terrain as terrain;

pub use config::SimConfig;
pub use engine::{TickReport, World, WorldState};

/// The one pseudo-random stream type. Each world owns exactly one instance.
pub type SimRng = rand_chacha::ChaCha8Rng;

#[cfg(test)]
mod tests;
