//! Notifications emitted by the simulation for the presentation layer.
//!
//! Notifications are read-only records. Nothing in the simulation reads them
//! back; they exist for display and for replay comparison.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, FlavorCause};
use crate::ids::{CityId, EntityId, PlateId};

/// One record produced during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub tick: u64,
    pub kind: NotificationKind,
}

/// Damage dealt to one element by an earthquake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub entity: EntityId,
    /// Plate distance from the epicenter (0 = on the epicenter plates).
    pub distance: u32,
    /// Health actually removed (never more than the element had).
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotificationKind {
    /// An earthquake struck the boundary between two plates.
    Earthquake {
        epicenter: (PlateId, PlateId),
        /// Norm of the movement-vector difference at the epicenter.
        intensity: f64,
        hits: Vec<DamageRecord>,
    },
    /// An ash cloud covered a plate and its surroundings.
    AshCloud {
        origin: PlateId,
        plates: Vec<PlateId>,
        duration_ticks: u32,
    },
    /// An ash cloud over a plate dissipated.
    AshCloudCleared { plate: PlateId },
    /// A drought hit a foreign city.
    Drought { city: CityId, duration_ticks: u32 },
    /// A drought ended and trade capacities reverted.
    DroughtEnded { city: CityId },
    /// The predicted end of the world came and went.
    WorldDidNotEnd { target_tick: u64 },
    /// News item with no effect on the game.
    Flavor { cause: FlavorCause, headline: String },
    /// An element reached zero health and was removed.
    ElementDestroyed { entity: EntityId, kind: EntityKind },
    /// A trigger failed to evaluate; the tick carried on without it.
    TriggerFailed { trigger: String, reason: String },
}

impl Notification {
    pub fn new(tick: u64, kind: NotificationKind) -> Self {
        Self { tick, kind }
    }
}
