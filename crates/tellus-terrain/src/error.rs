//! Error types for the `tellus-terrain` crate.

use tellus_core::ids::PlateId;
use tellus_core::types::TileCoord;

/// Errors raised while building or editing a terrain.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// The grid has no tiles.
    #[error("terrain grid must have at least one tile")]
    EmptyGrid,

    /// The plate map does not match the grid dimensions.
    #[error("plate map has {actual} entries, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Plate ids must be contiguous from 0; this one owns no tiles.
    #[error("{0} owns no tiles")]
    EmptyPlate(PlateId),

    /// No plate with this id exists.
    #[error("unknown {0}")]
    UnknownPlate(PlateId),

    /// A block layout whose tile grid does not fit in `u32` dimensions.
    #[error("{plates_x}x{plates_y} plates of size {plate_size} overflow the grid")]
    TooLarge {
        plates_x: u32,
        plates_y: u32,
        plate_size: u32,
    },

    /// The coordinate lies outside the grid.
    #[error("tile {0} is out of bounds")]
    OutOfBounds(TileCoord),
}
