//! Upkeep: timed effects that count down every tick.

use tellus_core::events::NotificationKind;
use tellus_core::ids::CityId;

use crate::engine::WorldState;

/// Accrue ash pollution, expire ash clouds and droughts.
pub fn run(state: &mut WorldState) {
    for plate in state.terrain.advance_ash() {
        state.notify(NotificationKind::AshCloudCleared { plate });
    }

    let ended: Vec<CityId> = state
        .cities
        .iter_mut()
        .enumerate()
        .filter_map(|(i, city)| city.advance_drought().then_some(CityId(i as u32)))
        .collect();
    for city in ended {
        state.notify(NotificationKind::DroughtEnded { city });
    }
}
