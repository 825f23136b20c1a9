//! World snapshot: the committed, post-tick state handed to renderers and
//! other read-only collaborators.
//!
//! Snapshots are plain owned data. Renderers never see live simulation state,
//! so they can run on another thread and compare `time.tick` to tell whether
//! anything changed.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, Good, Orientation};
use crate::events::Notification;
use crate::ids::{CityId, EntityId, PlateId};
use crate::types::{SimTime, TileCoord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub entities: Vec<EntityView>,
    pub plates: Vec<PlateView>,
    pub cities: Vec<CityView>,
    /// Notifications produced during the tick that led to this snapshot.
    pub notifications: Vec<Notification>,
}

/// One live entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: TileCoord,
    pub orientation: Orientation,
    pub health: u32,
    pub city: Option<CityId>,
    /// Selected work mode name, for units.
    pub mode: Option<String>,
}

/// One tectonic plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateView {
    pub id: PlateId,
    /// Movement vector (x, y).
    pub movement: [f64; 2],
    pub magma_tiles: u32,
    pub tile_count: u32,
    pub neighbors: Vec<PlateId>,
    /// Ticks until the ash cloud over this plate clears, if any.
    pub ash_remaining: Option<u32>,
    /// Total pollution over the plate's tiles.
    pub pollution: u64,
}

/// One city with its effective trade capacities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityView {
    pub id: CityId,
    pub name: String,
    pub latitude: Option<f64>,
    pub exports: Vec<(Good, u32)>,
    pub imports: Vec<(Good, u32)>,
    pub drought_remaining: Option<u32>,
}

/// A presentation surface. Receives committed snapshots and nothing else.
pub trait SnapshotRenderer {
    fn render(&mut self, snapshot: &WorldSnapshot);
}
