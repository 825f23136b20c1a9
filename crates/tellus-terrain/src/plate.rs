//! Tectonic plates.

use std::collections::BTreeSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use tellus_core::ids::PlateId;
use tellus_core::types::TileCoord;

/// An ash cloud sitting over a plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AshState {
    /// Upkeep steps left before the cloud clears.
    pub remaining_ticks: u32,
    /// Pollution added to every tile of the plate per upkeep step.
    pub pollution_per_tick: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TectonicPlate {
    pub id: PlateId,
    /// Direction and speed of the magma flow under this plate.
    pub movement: DVec2,
    /// Number of member tiles flagged volcanic.
    pub magma_tiles: u32,
    /// Member tiles in row-major order.
    pub tiles: Vec<TileCoord>,
    /// Plates sharing at least one pair of grid-adjacent tiles with this one.
    pub neighbors: BTreeSet<PlateId>,
    pub ash: Option<AshState>,
}

impl TectonicPlate {
    pub fn new(id: PlateId) -> Self {
        Self {
            id,
            movement: DVec2::ZERO,
            magma_tiles: 0,
            tiles: Vec::new(),
            neighbors: BTreeSet::new(),
            ash: None,
        }
    }

    pub fn is_ashed(&self) -> bool {
        self.ash.is_some()
    }

    pub fn is_neighbor(&self, other: PlateId) -> bool {
        self.neighbors.contains(&other)
    }

    /// Norm of the difference between two movement vectors.
    pub fn movement_difference(&self, other: &TectonicPlate) -> f64 {
        (self.movement - other.movement).length()
    }
}
