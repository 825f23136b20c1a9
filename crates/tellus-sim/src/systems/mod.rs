//! Per-tick systems over the world state.
//!
//! Systems are free functions over `&mut WorldState` (or `&WorldState` when
//! they only read). They own no state of their own.

pub mod cleanup;
pub mod entities;
pub mod snapshot;
pub mod upkeep;
