//! A single grid cell.

use serde::{Deserialize, Serialize};

use tellus_core::ids::PlateId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// The plate this tile belongs to. Fixed at generation.
    pub plate: PlateId,
    /// Magma reaches the surface here.
    pub volcanic: bool,
    /// Covered by an ash cloud.
    pub ashed: bool,
    pub pollution: u32,
}

impl Tile {
    pub fn new(plate: PlateId) -> Self {
        Self {
            plate,
            volcanic: false,
            ashed: false,
            pollution: 0,
        }
    }
}
