//! Entity lifecycle registry.
//!
//! Ids come from an allocator owned by the registry (and so by one world):
//! they strictly increase in creation order and are never reused, even after
//! the entity is removed. Bodies are kept sorted by id, which is also their
//! insertion order, so iteration order is deterministic and lookups are a
//! binary search.

use serde::{Deserialize, Serialize};

use tellus_core::ids::EntityId;
use tellus_core::types::TileCoord;

use crate::entity::{Entity, EntityBody};

/// Per-world monotonic id source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// The id the next allocation will return.
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRegistry {
    ids: IdAllocator,
    entities: Vec<EntityBody>,
}

impl EntityRegistry {
    pub(crate) fn allocate(&mut self) -> EntityId {
        self.ids.allocate()
    }

    pub fn next_id(&self) -> EntityId {
        self.ids.peek()
    }

    pub(crate) fn insert(&mut self, body: EntityBody) {
        debug_assert!(
            self.entities.last().map_or(true, |last| last.id() < body.id()),
            "entity ids must be inserted in increasing order"
        );
        self.entities.push(body);
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id()).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityBody> {
        self.position(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityBody> {
        self.position(id).map(move |i| &mut self.entities[i])
    }

    pub fn remove(&mut self, id: EntityId) -> Option<EntityBody> {
        self.position(id).map(|i| self.entities.remove(i))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityBody> + '_ {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EntityBody> + '_ {
        self.entities.iter_mut()
    }

    /// Entities standing on a tile, in id order.
    pub fn in_tile(&self, coord: TileCoord) -> impl Iterator<Item = &EntityBody> + '_ {
        self.entities
            .iter()
            .filter(move |e| e.element().position == coord)
    }

    /// Ids strictly increase through the registry and stay below the next
    /// id to allocate.
    pub(crate) fn ids_consistent(&self) -> bool {
        self.entities.windows(2).all(|w| w[0].id() < w[1].id())
            && self
                .entities
                .last()
                .map_or(true, |last| last.id() < self.ids.peek())
    }

    /// Remove every zero-health element, preserving the order of the rest.
    pub(crate) fn drain_destroyed(&mut self) -> Vec<EntityBody> {
        let (destroyed, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.element().is_destroyed());
        self.entities = alive;
        destroyed
    }
}
