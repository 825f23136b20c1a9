//! Fundamental grid and time types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::Orientation;

/// Integer tile coordinate on the terrain grid.
/// x grows to the East, y grows to the South (row-major storage).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (0 before the first tick, then increments by 1).
    pub tick: u64,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance to another tile.
    pub fn chebyshev_to(&self, other: &TileCoord) -> u32 {
        let dx = (other.x - self.x).unsigned_abs();
        let dy = (other.y - self.y).unsigned_abs();
        dx.max(dy)
    }

    /// The eight surrounding tiles, in row-major order. May lie off-grid.
    pub fn neighbors8(&self) -> [TileCoord; 8] {
        let (x, y) = (self.x, self.y);
        [
            TileCoord::new(x - 1, y - 1),
            TileCoord::new(x, y - 1),
            TileCoord::new(x + 1, y - 1),
            TileCoord::new(x - 1, y),
            TileCoord::new(x + 1, y),
            TileCoord::new(x - 1, y + 1),
            TileCoord::new(x, y + 1),
            TileCoord::new(x + 1, y + 1),
        ]
    }

    /// The tile one step away in the given direction.
    pub fn step(&self, orientation: Orientation) -> TileCoord {
        let (dx, dy) = orientation.delta();
        TileCoord::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
