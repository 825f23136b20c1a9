//! Entity model: identity plus a per-tick behaviour.
//!
//! Every simulated object implements [`Entity`]. Concrete kinds are built by
//! composition around [`Element`] (position, orientation, health, owner) and
//! stored in the registry as an [`EntityBody`]. The owning world is implied by
//! the registry that holds the body; `tick` borrows what it needs from that
//! world through a [`TickContext`].

pub mod building;
pub mod element;
pub mod feature;
pub mod unit;

use serde::{Deserialize, Serialize};

use tellus_core::enums::{EntityKind, WorkMode};
use tellus_core::ids::EntityId;
use tellus_terrain::Terrain;

use crate::SimRng;

pub use building::{Building, BuildingKind};
pub use element::Element;
pub use feature::Feature;
pub use unit::{Scout, Unit, Worker};

/// What an entity may touch while it ticks.
pub struct TickContext<'a> {
    pub tick: u64,
    pub terrain: &'a Terrain,
    rng: &'a mut SimRng,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(tick: u64, terrain: &'a Terrain, rng: &'a mut SimRng) -> Self {
        Self { tick, terrain, rng }
    }

    /// The world's shared random stream.
    pub fn rng(&mut self) -> &mut SimRng {
        self.rng
    }
}

/// Identity plus per-tick behaviour.
pub trait Entity {
    fn id(&self) -> EntityId;

    fn kind(&self) -> EntityKind;

    /// Advance this entity by one tick. Default: nothing happens.
    fn tick(&mut self, _ctx: &mut TickContext<'_>) {}
}

/// A live entity as stored in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityBody {
    Worker(Worker),
    Scout(Scout),
    Building(Building),
    Feature(Feature),
}

impl EntityBody {
    pub fn element(&self) -> &Element {
        match self {
            EntityBody::Worker(u) => &u.element,
            EntityBody::Scout(u) => &u.element,
            EntityBody::Building(b) => &b.element,
            EntityBody::Feature(f) => &f.element,
        }
    }

    pub fn element_mut(&mut self) -> &mut Element {
        match self {
            EntityBody::Worker(u) => &mut u.element,
            EntityBody::Scout(u) => &mut u.element,
            EntityBody::Building(b) => &mut b.element,
            EntityBody::Feature(f) => &mut f.element,
        }
    }

    /// Selected work mode name, for units.
    pub fn mode_name(&self) -> Option<&'static str> {
        match self {
            EntityBody::Worker(u) => Some(u.mode().name()),
            EntityBody::Scout(u) => Some(u.mode().name()),
            EntityBody::Building(_) | EntityBody::Feature(_) => None,
        }
    }

    /// Whether air-travel connections can start or end here.
    pub fn is_airport_capable(&self) -> bool {
        matches!(self, EntityBody::Building(b) if b.kind == BuildingKind::Airport)
    }
}

impl Entity for EntityBody {
    fn id(&self) -> EntityId {
        self.element().id()
    }

    fn kind(&self) -> EntityKind {
        match self {
            EntityBody::Worker(u) => u.kind(),
            EntityBody::Scout(u) => u.kind(),
            EntityBody::Building(b) => b.kind(),
            EntityBody::Feature(f) => f.kind(),
        }
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        match self {
            EntityBody::Worker(u) => u.tick(ctx),
            EntityBody::Scout(u) => u.tick(ctx),
            EntityBody::Building(b) => b.tick(ctx),
            EntityBody::Feature(f) => f.tick(ctx),
        }
    }
}
