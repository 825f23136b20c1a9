//! Terrain system for Tellus.
//!
//! Tile grid partitioned into tectonic plates, plate adjacency and distance
//! queries, and the ash-cloud state that sits on top of the geology.

pub use tellus_core as core;

pub mod error;
pub mod grid;
pub mod layout;
pub mod plate;
pub mod tile;

// Re-export key types for convenience.
pub use error::TerrainError;
pub use grid::Terrain;
pub use layout::BlockLayout;
pub use plate::{AshState, TectonicPlate};
pub use tile::Tile;
