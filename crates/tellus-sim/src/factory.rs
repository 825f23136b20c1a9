//! Validated construction of entities.
//!
//! Each spawnable kind has a factory with two halves: `check` decides whether
//! a request is valid for the current terrain and owner, `make` builds the
//! entity. `make` takes a [`SpawnTicket`], which only the world can issue and
//! only after `check` passed, so an unchecked build cannot happen outside this
//! crate.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use tellus_core::city::City;
use tellus_core::enums::{EntityKind, Orientation, ScoutMode, WorkerMode};
use tellus_core::ids::{CityId, EntityId};
use tellus_core::types::TileCoord;
use tellus_terrain::Terrain;

use crate::entity::{Building, BuildingKind, Element, EntityBody, Feature, Unit};

/// What to build and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub at: TileCoord,
    pub orientation: Orientation,
    pub health: u32,
    pub city: Option<CityId>,
}

impl SpawnRequest {
    pub fn new(at: TileCoord, health: u32) -> Self {
        Self {
            at,
            orientation: Orientation::North,
            health,
            city: None,
        }
    }

    pub fn facing(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn owned_by(mut self, city: CityId) -> Self {
        self.city = Some(city);
        self
    }

    fn element(&self, id: EntityId) -> Element {
        Element::new(id, self.at, self.orientation, self.health, self.city)
    }
}

/// Proof that a request passed its factory's check. Carries the id the new
/// entity will get.
#[derive(Debug)]
pub struct SpawnTicket {
    id: EntityId,
}

impl SpawnTicket {
    pub(crate) fn issue(id: EntityId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The factory's check refused the request.
    #[error("cannot place {kind} at {at}")]
    Rejected { kind: EntityKind, at: TileCoord },

    /// The request names a city this world does not have.
    #[error("unknown owning city {0}")]
    UnknownCity(CityId),

    /// No factory is registered for the kind.
    #[error("no factory registered for {0}")]
    UnregisteredKind(EntityKind),
}

pub trait ElementFactory: fmt::Debug {
    fn kind(&self) -> EntityKind;

    /// Whether the request may be built. Pure: reads only its arguments.
    fn check(&self, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> bool;

    /// Build the entity. Only called after `check` returned true for the
    /// same arguments.
    fn make(
        &self,
        ticket: SpawnTicket,
        terrain: &Terrain,
        request: &SpawnRequest,
        city: Option<&City>,
    ) -> EntityBody;
}

/// Rules shared by the city-owned kinds.
fn owned_on_terrain(terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> bool {
    terrain.contains(request.at) && request.city.is_some() && city.is_some()
}

fn on_volcanic(terrain: &Terrain, at: TileCoord) -> bool {
    terrain.tile(at).is_some_and(|t| t.volcanic)
}

#[derive(Debug, Default)]
pub struct WorkerFactory;

impl ElementFactory for WorkerFactory {
    fn kind(&self) -> EntityKind {
        EntityKind::Worker
    }

    fn check(&self, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> bool {
        owned_on_terrain(terrain, request, city)
    }

    fn make(&self, ticket: SpawnTicket, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> EntityBody {
        debug_assert!(self.check(terrain, request, city));
        EntityBody::Worker(Unit::new(request.element(ticket.id()), WorkerMode::default()))
    }
}

#[derive(Debug, Default)]
pub struct ScoutFactory;

impl ElementFactory for ScoutFactory {
    fn kind(&self) -> EntityKind {
        EntityKind::Scout
    }

    fn check(&self, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> bool {
        owned_on_terrain(terrain, request, city)
    }

    fn make(&self, ticket: SpawnTicket, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> EntityBody {
        debug_assert!(self.check(terrain, request, city));
        EntityBody::Scout(Unit::new(request.element(ticket.id()), ScoutMode::default()))
    }
}

/// Airports need a runway along the North/South axis and clear skies.
#[derive(Debug, Default)]
pub struct AirportFactory;

impl ElementFactory for AirportFactory {
    fn kind(&self) -> EntityKind {
        EntityKind::Airport
    }

    fn check(&self, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> bool {
        owned_on_terrain(terrain, request, city)
            && !on_volcanic(terrain, request.at)
            && !terrain.is_ashed(request.at)
            && request.orientation.is_meridional()
    }

    fn make(&self, ticket: SpawnTicket, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> EntityBody {
        debug_assert!(self.check(terrain, request, city));
        EntityBody::Building(Building::new(request.element(ticket.id()), BuildingKind::Airport))
    }
}

#[derive(Debug, Default)]
pub struct FarmFactory;

impl ElementFactory for FarmFactory {
    fn kind(&self) -> EntityKind {
        EntityKind::Farm
    }

    fn check(&self, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> bool {
        owned_on_terrain(terrain, request, city) && !on_volcanic(terrain, request.at)
    }

    fn make(&self, ticket: SpawnTicket, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> EntityBody {
        debug_assert!(self.check(terrain, request, city));
        EntityBody::Building(Building::new(request.element(ticket.id()), BuildingKind::Farm))
    }
}

/// Crops are terrain features: they belong to no city.
#[derive(Debug, Default)]
pub struct CropFactory;

impl ElementFactory for CropFactory {
    fn kind(&self) -> EntityKind {
        EntityKind::Crop
    }

    fn check(&self, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> bool {
        terrain.contains(request.at)
            && request.city.is_none()
            && city.is_none()
            && !on_volcanic(terrain, request.at)
    }

    fn make(&self, ticket: SpawnTicket, terrain: &Terrain, request: &SpawnRequest, city: Option<&City>) -> EntityBody {
        debug_assert!(self.check(terrain, request, city));
        EntityBody::Feature(Feature::new(request.element(ticket.id())))
    }
}

/// Factories keyed by the kind they build.
#[derive(Debug, Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<EntityKind, Box<dyn ElementFactory>>,
}

impl FactoryRegistry {
    /// One factory per built-in kind.
    pub fn standard() -> Self {
        let mut registry = Self::default();
        registry.register(Box::new(WorkerFactory));
        registry.register(Box::new(ScoutFactory));
        registry.register(Box::new(AirportFactory));
        registry.register(Box::new(FarmFactory));
        registry.register(Box::new(CropFactory));
        registry
    }

    /// Install a factory, replacing any previous one for the same kind.
    pub fn register(&mut self, factory: Box<dyn ElementFactory>) -> Option<Box<dyn ElementFactory>> {
        self.factories.insert(factory.kind(), factory)
    }

    pub fn get(&self, kind: EntityKind) -> Option<&dyn ElementFactory> {
        self.factories.get(&kind).map(|f| f.as_ref())
    }
}
