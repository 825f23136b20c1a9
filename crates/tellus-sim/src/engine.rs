//! World: the core of the simulation.
//!
//! `World` owns the world state (tick counter, the one random stream, terrain,
//! cities, entities), the ordered trigger list, and the factory registry. It
//! runs the tick loop and produces `WorldSnapshot`s. Completely headless,
//! enabling deterministic testing.

use rand::SeedableRng;
use tracing::{debug, info};

use tellus_core::city::City;
use tellus_core::enums::EntityKind;
use tellus_core::events::{Notification, NotificationKind};
use tellus_core::ids::{CityId, EntityId, PlateId, TriggerHandle};
use tellus_core::state::{SnapshotRenderer, WorldSnapshot};
use tellus_core::types::{SimTime, TileCoord};
use tellus_terrain::{AshState, TectonicPlate, Terrain};

use crate::config::{ConfigError, SimConfig};
use crate::entity::EntityBody;
use crate::factory::{ElementFactory, FactoryRegistry, SpawnError, SpawnRequest, SpawnTicket};
use crate::registry::EntityRegistry;
use crate::save::{SaveError, SaveState, SavedTrigger, SAVE_FORMAT_VERSION};
use crate::systems;
use crate::trigger::{self, EventTrigger, TriggerList, TriggerSlot};
use crate::SimRng;

/// Mutable state shared by systems and triggers.
#[derive(Debug)]
pub struct WorldState {
    pub(crate) time: SimTime,
    pub(crate) rng: SimRng,
    pub(crate) terrain: Terrain,
    pub(crate) cities: Vec<City>,
    pub(crate) entities: EntityRegistry,
    /// Produced during the current tick; cleared when the next one starts.
    pub(crate) notifications: Vec<Notification>,
}

impl WorldState {
    fn new(seed: u64, terrain: Terrain) -> Self {
        Self {
            time: SimTime::default(),
            rng: SimRng::seed_from_u64(seed),
            terrain,
            cities: Vec::new(),
            entities: EntityRegistry::default(),
            notifications: Vec::new(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.time.tick
    }

    /// The world's random stream. Every stochastic draw goes through it.
    pub fn rng(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.terrain
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(id.index())
    }

    pub fn city_mut(&mut self, id: CityId) -> Option<&mut City> {
        self.cities.get_mut(id.index())
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut self.entities
    }

    /// Record a notification for the current tick.
    pub fn notify(&mut self, kind: NotificationKind) {
        self.notifications.push(Notification::new(self.time.tick, kind));
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub notifications: Vec<Notification>,
}

/// The simulation world.
#[derive(Debug)]
pub struct World {
    state: WorldState,
    triggers: TriggerList,
    factories: FactoryRegistry,
}

impl World {
    /// Create a world on the given terrain. Registers the configured triggers
    /// and one factory per built-in entity kind.
    pub fn new(config: &SimConfig, terrain: Terrain) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = Self {
            state: WorldState::new(config.seed, terrain),
            triggers: TriggerList::default(),
            factories: FactoryRegistry::standard(),
        };
        for trigger in &config.triggers {
            world.register_trigger(trigger.build());
        }
        info!(
            seed = config.seed,
            plates = world.state.terrain.plates().len(),
            triggers = world.triggers.len(),
            "world created"
        );
        Ok(world)
    }

    pub fn add_city(&mut self, city: City) -> CityId {
        let id = CityId(self.state.cities.len() as u32);
        debug!(city = %id, name = %city.name, "city added");
        self.state.cities.push(city);
        id
    }

    /// Install a factory, replacing the one for the same kind.
    pub fn register_factory(&mut self, factory: Box<dyn ElementFactory>) {
        self.factories.register(factory);
    }

    /// Advance the world by one tick.
    ///
    /// Order: upkeep of timed effects, entity ticks in id order, triggers in
    /// registration order, removal of destroyed elements.
    pub fn advance_tick(&mut self) -> TickReport {
        self.state.notifications.clear();
        self.state.time.advance();

        // 1. Ash clouds and droughts
        systems::upkeep::run(&mut self.state);
        // 2. Entities
        systems::entities::run(&mut self.state);
        // 3. Triggers
        for slot in self.triggers.iter_mut() {
            trigger::evaluate(slot, &mut self.state);
        }
        // 4. Cleanup
        systems::cleanup::run(&mut self.state);

        let tick = self.state.time.tick;
        debug!(
            tick,
            entities = self.state.entities.len(),
            notifications = self.state.notifications.len(),
            "tick complete"
        );
        TickReport {
            tick,
            notifications: self.state.notifications.clone(),
        }
    }

    /// Build an entity with the given factory. The id is allocated only when
    /// the factory's check passes; a rejected request changes nothing.
    pub fn spawn(
        &mut self,
        factory: &dyn ElementFactory,
        request: SpawnRequest,
    ) -> Result<EntityId, SpawnError> {
        spawn_with(&mut self.state, factory, request)
    }

    /// Build an entity with the registered factory for `kind`.
    pub fn spawn_kind(
        &mut self,
        kind: EntityKind,
        request: SpawnRequest,
    ) -> Result<EntityId, SpawnError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or(SpawnError::UnregisteredKind(kind))?;
        spawn_with(&mut self.state, factory, request)
    }

    pub fn rng(&mut self) -> &mut SimRng {
        &mut self.state.rng
    }

    pub fn register_trigger(&mut self, trigger: Box<dyn EventTrigger>) -> TriggerHandle {
        let name = trigger.name().to_string();
        let handle = self.triggers.register(trigger);
        debug!(trigger = %name, handle = %handle, "trigger registered");
        handle
    }

    /// Stop evaluating a trigger. Returns it if the handle was registered.
    pub fn unregister_trigger(&mut self, handle: TriggerHandle) -> Option<Box<dyn EventTrigger>> {
        self.triggers.unregister(handle)
    }

    /// Times a trigger has fired since it was registered.
    pub fn trigger_fire_count(&self, handle: TriggerHandle) -> Option<u64> {
        self.triggers.fire_count(handle)
    }

    pub fn triggers(&self) -> &TriggerList {
        &self.triggers
    }

    // --- Queries ---

    pub fn tick(&self) -> u64 {
        self.state.time.tick
    }

    pub fn time(&self) -> SimTime {
        self.state.time
    }

    pub fn entity(&self, id: EntityId) -> Option<&EntityBody> {
        self.state.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntityBody> {
        self.state.entities.get_mut(id)
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.state.entities
    }

    pub fn entities_in_tile(&self, coord: TileCoord) -> impl Iterator<Item = &EntityBody> + '_ {
        self.state.entities.in_tile(coord)
    }

    /// Remove an entity now. Its id is never handed out again.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<EntityBody> {
        self.state.entities.remove(id)
    }

    pub fn terrain(&self) -> &Terrain {
        &self.state.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.state.terrain
    }

    pub fn plate_at(&self, coord: TileCoord) -> Option<&TectonicPlate> {
        self.state.terrain.plate_at(coord)
    }

    pub fn ash_state(&self, plate: PlateId) -> Option<AshState> {
        self.state.terrain.ash_state(plate)
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.state.city(id)
    }

    pub fn city_mut(&mut self, id: CityId) -> Option<&mut City> {
        self.state.city_mut(id)
    }

    pub fn cities(&self) -> &[City] {
        &self.state.cities
    }

    /// Whether an airport sits under an ash cloud. `None` if `id` is not a
    /// live airport.
    pub fn airport_grounded(&self, id: EntityId) -> Option<bool> {
        let body = self.entity(id).filter(|b| b.is_airport_capable())?;
        Some(self.state.terrain.is_ashed(body.element().position))
    }

    /// Air travel between two airports is possible when both exist and
    /// neither is grounded.
    pub fn air_connection_allowed(&self, a: EntityId, b: EntityId) -> bool {
        self.airport_grounded(a) == Some(false) && self.airport_grounded(b) == Some(false)
    }

    /// Notifications of the last tick.
    pub fn notifications(&self) -> &[Notification] {
        &self.state.notifications
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        systems::snapshot::build_snapshot(&self.state)
    }

    pub fn render(&self, renderer: &mut dyn SnapshotRenderer) {
        renderer.render(&self.snapshot());
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }

    // --- Persistence ---

    /// Everything needed to resume this world.
    pub fn save(&self) -> Result<SaveState, SaveError> {
        let triggers = self
            .triggers
            .iter()
            .map(|slot| {
                let config = slot.trigger.config().ok_or_else(|| SaveError::UnpersistableTrigger {
                    name: slot.trigger.name().to_string(),
                })?;
                Ok(SavedTrigger {
                    handle: slot.handle,
                    fired: slot.fired,
                    config,
                })
            })
            .collect::<Result<Vec<_>, SaveError>>()?;
        Ok(SaveState {
            format_version: SAVE_FORMAT_VERSION,
            time: self.state.time,
            rng: self.state.rng.clone(),
            terrain: self.state.terrain.clone(),
            cities: self.state.cities.clone(),
            entities: self.state.entities.clone(),
            triggers,
            next_trigger_handle: self.triggers.next_handle().0,
        })
    }

    /// Rebuild a world from a save. Continues with the same random stream
    /// position, ids, and trigger state.
    pub fn restore(save: SaveState) -> Result<Self, SaveError> {
        if save.format_version != SAVE_FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion(save.format_version));
        }
        if !save.entities.ids_consistent() {
            return Err(SaveError::InconsistentEntityIds);
        }
        let slots = save
            .triggers
            .into_iter()
            .map(|saved| TriggerSlot {
                handle: saved.handle,
                trigger: saved.config.build(),
                fired: saved.fired,
            })
            .collect();
        info!(tick = save.time.tick, "world restored");
        Ok(Self {
            state: WorldState {
                time: save.time,
                rng: save.rng,
                terrain: save.terrain,
                cities: save.cities,
                entities: save.entities,
                notifications: Vec::new(),
            },
            triggers: TriggerList::from_parts(slots, save.next_trigger_handle),
            factories: FactoryRegistry::standard(),
        })
    }
}

fn spawn_with(
    state: &mut WorldState,
    factory: &dyn ElementFactory,
    request: SpawnRequest,
) -> Result<EntityId, SpawnError> {
    let city = match request.city {
        Some(id) => Some(state.cities.get(id.index()).ok_or(SpawnError::UnknownCity(id))?),
        None => None,
    };
    if !factory.check(&state.terrain, &request, city) {
        debug!(kind = %factory.kind(), at = %request.at, "spawn rejected");
        return Err(SpawnError::Rejected {
            kind: factory.kind(),
            at: request.at,
        });
    }
    let ticket = SpawnTicket::issue(state.entities.allocate());
    let body = factory.make(ticket, &state.terrain, &request, city);
    let id = body.element().id();
    state.entities.insert(body);
    Ok(id)
}
