//! Units: elements with a selectable work mode.
//!
//! Each unit type has its own closed set of modes (see [`WorkMode`]). Units
//! are only ever created through their factory in [`crate::factory`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use tellus_core::enums::{EntityKind, Orientation, ScoutMode, WorkMode, WorkerMode};
use tellus_core::ids::EntityId;

use super::element::Element;
use super::{Entity, TickContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit<M> {
    pub element: Element,
    mode: M,
    /// Ticks spent doing something other than the default mode.
    active_ticks: u64,
}

pub type Worker = Unit<WorkerMode>;
pub type Scout = Unit<ScoutMode>;

impl<M: WorkMode> Unit<M> {
    pub(crate) fn new(element: Element, mode: M) -> Self {
        Self {
            element,
            mode,
            active_ticks: 0,
        }
    }

    pub fn mode(&self) -> M {
        self.mode
    }

    /// Switch to another mode of this unit type.
    pub fn select(&mut self, mode: M) {
        self.mode = mode;
    }

    /// Every mode this unit can be switched to.
    pub fn modes() -> &'static [M] {
        M::ALL
    }

    pub fn active_ticks(&self) -> u64 {
        self.active_ticks
    }

    /// Step one tile forward if the destination is on the terrain.
    fn advance(&mut self, ctx: &TickContext<'_>) -> bool {
        let next = self.element.position.step(self.element.orientation);
        if ctx.terrain.contains(next) {
            self.element.position = next;
            true
        } else {
            false
        }
    }
}

impl Entity for Worker {
    fn id(&self) -> EntityId {
        self.element.id()
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Worker
    }

    fn tick(&mut self, _ctx: &mut TickContext<'_>) {
        if self.mode != WorkerMode::Idle {
            self.active_ticks += 1;
        }
    }
}

impl Entity for Scout {
    fn id(&self) -> EntityId {
        self.element.id()
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Scout
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        match self.mode {
            ScoutMode::Hold => {}
            ScoutMode::Patrol => {
                self.element.orientation = self.element.orientation.rotate_cw();
                if self.advance(ctx) {
                    self.active_ticks += 1;
                }
            }
            ScoutMode::Wander => {
                // One draw per wandering scout per tick.
                let heading = ctx.rng().gen_range(0..Orientation::ALL.len());
                self.element.orientation = Orientation::ALL[heading];
                if self.advance(ctx) {
                    self.active_ticks += 1;
                }
            }
        }
    }
}
