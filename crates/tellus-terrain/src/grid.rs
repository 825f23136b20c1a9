//! Terrain: a tile grid partitioned into tectonic plates.
//!
//! Every tile belongs to exactly one plate, plates are disjoint, and together
//! they cover the grid. Two plates are neighbors iff some pair of their tiles
//! are grid-adjacent (8-neighbourhood). Adjacency is computed once when the
//! terrain is built and never changes afterwards.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tellus_core::ids::PlateId;
use tellus_core::types::TileCoord;

use crate::error::TerrainError;
use crate::plate::{AshState, TectonicPlate};
use crate::tile::Tile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    width: u32,
    height: u32,
    /// Row-major tiles.
    tiles: Vec<Tile>,
    /// Indexed by `PlateId`.
    plates: Vec<TectonicPlate>,
}

impl Terrain {
    /// Build a terrain from a row-major map of plate ids.
    ///
    /// Plate ids must be contiguous from 0 and every plate must own at least
    /// one tile.
    pub fn from_plate_map(width: u32, height: u32, plate_map: &[u32]) -> Result<Self, TerrainError> {
        let expected = width as usize * height as usize;
        if expected == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        if plate_map.len() != expected {
            return Err(TerrainError::DimensionMismatch {
                expected,
                actual: plate_map.len(),
            });
        }

        let plate_count = plate_map.iter().copied().max().map_or(0, |m| m + 1);
        let mut plates: Vec<TectonicPlate> =
            (0..plate_count).map(|i| TectonicPlate::new(PlateId(i))).collect();
        let mut tiles = Vec::with_capacity(expected);

        for (idx, &plate) in plate_map.iter().enumerate() {
            let coord = TileCoord::new((idx % width as usize) as i32, (idx / width as usize) as i32);
            plates[plate as usize].tiles.push(coord);
            tiles.push(Tile::new(PlateId(plate)));
        }

        if let Some(empty) = plates.iter().find(|p| p.tiles.is_empty()) {
            return Err(TerrainError::EmptyPlate(empty.id));
        }

        let mut terrain = Self {
            width,
            height,
            tiles,
            plates,
        };
        terrain.compute_adjacency();

        debug!(
            width,
            height,
            plates = terrain.plates.len(),
            "Terrain built"
        );
        Ok(terrain)
    }

    fn compute_adjacency(&mut self) {
        let mut pairs = BTreeSet::new();
        for (idx, tile) in self.tiles.iter().enumerate() {
            let coord = self.coord_of(idx);
            for n in coord.neighbors8() {
                if let Some(other) = self.tile(n) {
                    if other.plate != tile.plate {
                        pairs.insert((tile.plate, other.plate));
                    }
                }
            }
        }
        for (p, q) in pairs {
            self.plates[p.index()].neighbors.insert(q);
            self.plates[q.index()].neighbors.insert(p);
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    fn index_of(&self, coord: TileCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.y as usize * self.width as usize + coord.x as usize)
    }

    fn coord_of(&self, idx: usize) -> TileCoord {
        let w = self.width as usize;
        TileCoord::new((idx % w) as i32, (idx / w) as i32)
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index_of(coord).map(|i| &self.tiles[i])
    }

    /// All tiles with their coordinates, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, t)| (self.coord_of(i), t))
    }

    pub fn plates(&self) -> &[TectonicPlate] {
        &self.plates
    }

    pub fn plate(&self, id: PlateId) -> Option<&TectonicPlate> {
        self.plates.get(id.index())
    }

    pub fn plate_id_at(&self, coord: TileCoord) -> Option<PlateId> {
        self.tile(coord).map(|t| t.plate)
    }

    /// Plate-by-tile lookup.
    pub fn plate_at(&self, coord: TileCoord) -> Option<&TectonicPlate> {
        self.plate_id_at(coord).and_then(|id| self.plate(id))
    }

    /// Neighbor-plate set of a plate (empty for unknown ids).
    pub fn neighbors(&self, id: PlateId) -> impl Iterator<Item = PlateId> + '_ {
        self.plate(id)
            .into_iter()
            .flat_map(|p| p.neighbors.iter().copied())
    }

    /// Every adjacent plate pair once, as `(p, q)` with `p < q`, ascending.
    pub fn boundaries(&self) -> Vec<(PlateId, PlateId)> {
        self.plates
            .iter()
            .flat_map(|p| {
                p.neighbors
                    .range(PlateId(p.id.0 + 1)..)
                    .map(move |&q| (p.id, q))
            })
            .collect()
    }

    /// Hop distance from the nearest source plate over the adjacency graph,
    /// for every plate at distance `max` or less.
    ///
    /// On a block layout (square plates on a lattice) this equals the
    /// Chebyshev distance between plate lattice positions.
    pub fn plate_distances(&self, sources: &[PlateId], max: u32) -> BTreeMap<PlateId, u32> {
        let mut distances = BTreeMap::new();
        let mut queue = VecDeque::new();
        for &source in sources {
            if self.plate(source).is_some() && !distances.contains_key(&source) {
                distances.insert(source, 0);
                queue.push_back(source);
            }
        }
        while let Some(current) = queue.pop_front() {
            let Some(&d) = distances.get(&current) else {
                continue;
            };
            if d >= max {
                continue;
            }
            for next in self.neighbors(current) {
                if !distances.contains_key(&next) {
                    distances.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        distances
    }

    /// The plate itself plus every plate within `radius` hops, ascending.
    pub fn plates_within(&self, plate: PlateId, radius: u32) -> Vec<PlateId> {
        self.plate_distances(&[plate], radius).into_keys().collect()
    }

    /// Tiles whose Chebyshev distance to the nearest tile of `plate` is at
    /// most `radius`, in row-major order.
    pub fn tiles_within_radius(&self, plate: PlateId, radius: u32) -> Result<Vec<TileCoord>, TerrainError> {
        let members = &self
            .plate(plate)
            .ok_or(TerrainError::UnknownPlate(plate))?
            .tiles;
        let r = radius as i32;
        let mut found = BTreeSet::new();
        for m in members {
            for dy in -r..=r {
                for dx in -r..=r {
                    let c = TileCoord::new(m.x + dx, m.y + dy);
                    if self.contains(c) {
                        found.insert((c.y, c.x));
                    }
                }
            }
        }
        Ok(found.into_iter().map(|(y, x)| TileCoord::new(x, y)).collect())
    }

    // --- Geology inputs ---

    pub fn set_movement(&mut self, plate: PlateId, movement: DVec2) -> Result<(), TerrainError> {
        let p = self
            .plates
            .get_mut(plate.index())
            .ok_or(TerrainError::UnknownPlate(plate))?;
        p.movement = movement;
        Ok(())
    }

    /// Flag a tile volcanic (or not), keeping the plate's magma count in sync.
    pub fn set_volcanic(&mut self, coord: TileCoord, volcanic: bool) -> Result<(), TerrainError> {
        let idx = self.index_of(coord).ok_or(TerrainError::OutOfBounds(coord))?;
        let tile = &mut self.tiles[idx];
        if tile.volcanic == volcanic {
            return Ok(());
        }
        tile.volcanic = volcanic;
        let plate = &mut self.plates[tile.plate.index()];
        if volcanic {
            plate.magma_tiles += 1;
        } else {
            plate.magma_tiles = plate.magma_tiles.saturating_sub(1);
        }
        Ok(())
    }

    // --- Ash clouds ---

    pub fn ash_state(&self, plate: PlateId) -> Option<AshState> {
        self.plate(plate).and_then(|p| p.ash)
    }

    pub fn is_ashed(&self, coord: TileCoord) -> bool {
        self.tile(coord).is_some_and(|t| t.ashed)
    }

    /// Cover a plate with ash. An active cloud is refreshed, never shortened.
    pub fn mark_ashed(&mut self, plate: PlateId, ash: AshState) -> Result<(), TerrainError> {
        let width = self.width as usize;
        let p = self
            .plates
            .get_mut(plate.index())
            .ok_or(TerrainError::UnknownPlate(plate))?;
        let remaining_ticks = p
            .ash
            .map_or(ash.remaining_ticks, |current| current.remaining_ticks.max(ash.remaining_ticks));
        p.ash = Some(AshState {
            remaining_ticks,
            ..ash
        });
        for coord in &p.tiles {
            self.tiles[coord.y as usize * width + coord.x as usize].ashed = true;
        }
        Ok(())
    }

    /// One upkeep step: every ashed tile accrues pollution, every cloud loses
    /// a tick, and clouds that reach zero clear. Returns the cleared plates.
    pub fn advance_ash(&mut self) -> Vec<PlateId> {
        let width = self.width as usize;
        let mut cleared = Vec::new();
        for plate in &mut self.plates {
            let Some(ash) = plate.ash.as_mut() else {
                continue;
            };
            for coord in &plate.tiles {
                let tile = &mut self.tiles[coord.y as usize * width + coord.x as usize];
                tile.pollution = tile.pollution.saturating_add(ash.pollution_per_tick);
            }
            ash.remaining_ticks = ash.remaining_ticks.saturating_sub(1);
            if ash.remaining_ticks == 0 {
                plate.ash = None;
                for coord in &plate.tiles {
                    self.tiles[coord.y as usize * width + coord.x as usize].ashed = false;
                }
                cleared.push(plate.id);
            }
        }
        cleared
    }

    /// Sum of pollution over a plate's tiles.
    pub fn plate_pollution(&self, plate: PlateId) -> u64 {
        self.plate(plate).map_or(0, |p| {
            p.tiles
                .iter()
                .filter_map(|c| self.tile(*c))
                .map(|t| u64::from(t.pollution))
                .sum()
        })
    }
}
