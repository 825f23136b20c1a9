//! Terrain features: ownerless elements such as crops.

use serde::{Deserialize, Serialize};

use tellus_core::constants::CROP_MATURE_GROWTH;
use tellus_core::enums::EntityKind;
use tellus_core::ids::EntityId;

use super::element::Element;
use super::{Entity, TickContext};

/// A crop field. Grows by one every tick its tile is free of ash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub element: Element,
    growth: u32,
}

impl Feature {
    pub(crate) fn new(element: Element) -> Self {
        Self { element, growth: 0 }
    }

    pub fn growth(&self) -> u32 {
        self.growth
    }

    pub fn is_mature(&self) -> bool {
        self.growth >= CROP_MATURE_GROWTH
    }
}

impl Entity for Feature {
    fn id(&self) -> EntityId {
        self.element.id()
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Crop
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if !self.is_mature() && !ctx.terrain.is_ashed(self.element.position) {
            self.growth += 1;
        }
    }
}
