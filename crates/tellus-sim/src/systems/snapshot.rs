//! Snapshot system: copies the committed state into a `WorldSnapshot`.
//!
//! Read-only: it never modifies the world.

use tellus_core::ids::CityId;
use tellus_core::state::{CityView, EntityView, PlateView, WorldSnapshot};

use crate::engine::WorldState;
use crate::entity::Entity;

pub fn build_snapshot(state: &WorldState) -> WorldSnapshot {
    WorldSnapshot {
        time: state.time,
        entities: build_entities(state),
        plates: build_plates(state),
        cities: build_cities(state),
        notifications: state.notifications.clone(),
    }
}

fn build_entities(state: &WorldState) -> Vec<EntityView> {
    state
        .entities
        .iter()
        .map(|body| {
            let element = body.element();
            EntityView {
                id: element.id(),
                kind: body.kind(),
                position: element.position,
                orientation: element.orientation,
                health: element.health(),
                city: element.city,
                mode: body.mode_name().map(str::to_string),
            }
        })
        .collect()
}

fn build_plates(state: &WorldState) -> Vec<PlateView> {
    state
        .terrain
        .plates()
        .iter()
        .map(|plate| PlateView {
            id: plate.id,
            movement: plate.movement.to_array(),
            magma_tiles: plate.magma_tiles,
            tile_count: plate.tiles.len() as u32,
            neighbors: plate.neighbors.iter().copied().collect(),
            ash_remaining: plate.ash.map(|a| a.remaining_ticks),
            pollution: state.terrain.plate_pollution(plate.id),
        })
        .collect()
}

fn build_cities(state: &WorldState) -> Vec<CityView> {
    state
        .cities
        .iter()
        .enumerate()
        .map(|(i, city)| CityView {
            id: CityId(i as u32),
            name: city.name.clone(),
            latitude: city.latitude,
            exports: city
                .exports()
                .map(|(good, _)| (good, city.export_capacity(good)))
                .collect(),
            imports: city
                .imports()
                .map(|(good, _)| (good, city.import_demand(good)))
                .collect(),
            drought_remaining: city.drought().map(|d| d.remaining_ticks),
        })
        .collect()
}
