//! Buildings: city-owned elements that stay where they are built.

use serde::{Deserialize, Serialize};

use tellus_core::enums::EntityKind;
use tellus_core::ids::EntityId;

use super::element::Element;
use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Origin and destination of air-travel connections.
    Airport,
    Farm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub element: Element,
    pub kind: BuildingKind,
}

impl Building {
    pub(crate) fn new(element: Element, kind: BuildingKind) -> Self {
        Self { element, kind }
    }
}

impl Entity for Building {
    fn id(&self) -> EntityId {
        self.element.id()
    }

    fn kind(&self) -> EntityKind {
        match self.kind {
            BuildingKind::Airport => EntityKind::Airport,
            BuildingKind::Farm => EntityKind::Farm,
        }
    }
}
