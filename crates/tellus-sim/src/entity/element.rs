//! Element: an entity with a place on the terrain, health, and an owner.

use serde::{Deserialize, Serialize};

use tellus_core::enums::Orientation;
use tellus_core::ids::{CityId, EntityId};
use tellus_core::types::TileCoord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    id: EntityId,
    pub position: TileCoord,
    pub orientation: Orientation,
    health: u32,
    /// Owning city; `None` only for ownerless terrain features.
    pub city: Option<CityId>,
}

impl Element {
    pub fn new(
        id: EntityId,
        position: TileCoord,
        orientation: Orientation,
        health: u32,
        city: Option<CityId>,
    ) -> Self {
        Self {
            id,
            position,
            orientation,
            health,
            city,
        }
    }

    /// Fixed at creation.
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    /// Remove health, clamped at zero. Returns the health actually removed.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Zero health: the element is removed at the end of the current tick.
    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}
