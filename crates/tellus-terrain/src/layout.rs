//! Regular plate layouts: square plates arranged on a plate lattice.

use serde::{Deserialize, Serialize};

use tellus_core::ids::PlateId;
use tellus_core::types::TileCoord;

use crate::error::TerrainError;
use crate::grid::Terrain;

/// `plates_x × plates_y` square plates of `plate_size × plate_size` tiles.
/// Plate ids run row-major over the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLayout {
    pub plates_x: u32,
    pub plates_y: u32,
    pub plate_size: u32,
}

impl BlockLayout {
    /// Grid width in tiles; `None` if it does not fit in a `u32`.
    pub fn width(&self) -> Option<u32> {
        self.plates_x.checked_mul(self.plate_size)
    }

    /// Grid height in tiles; `None` if it does not fit in a `u32`.
    pub fn height(&self) -> Option<u32> {
        self.plates_y.checked_mul(self.plate_size)
    }

    /// Width and height, checked so that the tile count also fits in a `u32`.
    fn dimensions(&self) -> Result<(u32, u32), TerrainError> {
        let too_large = TerrainError::TooLarge {
            plates_x: self.plates_x,
            plates_y: self.plates_y,
            plate_size: self.plate_size,
        };
        match (self.width(), self.height()) {
            (Some(w), Some(h)) if w.checked_mul(h).is_some() => Ok((w, h)),
            _ => Err(too_large),
        }
    }

    /// Plate id at a lattice position.
    pub fn plate_id(&self, px: u32, py: u32) -> PlateId {
        PlateId(py * self.plates_x + px)
    }

    /// Top-left tile of a lattice position.
    pub fn origin(&self, px: u32, py: u32) -> TileCoord {
        TileCoord::new((px * self.plate_size) as i32, (py * self.plate_size) as i32)
    }

    /// Center tile of a lattice position.
    pub fn center(&self, px: u32, py: u32) -> TileCoord {
        let o = self.origin(px, py);
        let half = (self.plate_size / 2) as i32;
        TileCoord::new(o.x + half, o.y + half)
    }

    fn plate_map(&self, w: u32, h: u32) -> Vec<u32> {
        let mut map = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                map.push(self.plate_id(x / self.plate_size, y / self.plate_size).0);
            }
        }
        map
    }
}

impl Terrain {
    /// Build a terrain from a regular block layout.
    pub fn block_layout(layout: BlockLayout) -> Result<Self, TerrainError> {
        if layout.plate_size == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        let (w, h) = layout.dimensions()?;
        Terrain::from_plate_map(w, h, &layout.plate_map(w, h))
    }
}
