//! Entity system: ticks every live entity in id order.

use crate::engine::WorldState;
use crate::entity::{Entity, TickContext};

pub fn run(state: &mut WorldState) {
    let WorldState {
        time,
        rng,
        terrain,
        entities,
        ..
    } = state;
    let mut ctx = TickContext::new(time.tick, terrain, rng);
    for body in entities.iter_mut() {
        body.tick(&mut ctx);
    }
}
