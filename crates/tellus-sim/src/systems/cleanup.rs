//! Cleanup system: removes elements whose health reached zero.

use tracing::debug;

use tellus_core::events::NotificationKind;

use crate::engine::WorldState;
use crate::entity::Entity;

pub fn run(state: &mut WorldState) {
    for body in state.entities.drain_destroyed() {
        debug!(entity = %body.id(), kind = %body.kind(), "element destroyed");
        state.notify(NotificationKind::ElementDestroyed {
            entity: body.id(),
            kind: body.kind(),
        });
    }
}
