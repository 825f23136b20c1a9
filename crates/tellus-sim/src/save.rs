//! Persistence: the complete state a world needs to resume exactly where it
//! stopped, random stream position included.
//!
//! Notifications are not saved; they only describe the tick that produced
//! them.

use serde::{Deserialize, Serialize};

use tellus_core::city::City;
use tellus_core::ids::TriggerHandle;
use tellus_core::types::SimTime;
use tellus_terrain::Terrain;

use crate::registry::EntityRegistry;
use crate::trigger::TriggerConfig;
use crate::SimRng;

pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// A registered trigger has no serializable form.
    #[error("trigger {name} cannot be saved")]
    UnpersistableTrigger { name: String },

    #[error("unsupported save format version {0}")]
    UnsupportedVersion(u32),

    /// Saved entities are out of id order, or the id counter does not lie
    /// above every saved id.
    #[error("saved entity ids are inconsistent")]
    InconsistentEntityIds,

    #[error("serde error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One registered trigger with its counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTrigger {
    pub handle: TriggerHandle,
    pub fired: u64,
    pub config: TriggerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub format_version: u32,
    pub time: SimTime,
    pub rng: SimRng,
    pub terrain: Terrain,
    pub cities: Vec<City>,
    pub entities: EntityRegistry,
    pub triggers: Vec<SavedTrigger>,
    pub next_trigger_handle: u32,
}

impl SaveState {
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SaveError> {
        let save: Self = serde_json::from_str(text)?;
        if save.format_version != SAVE_FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion(save.format_version));
        }
        Ok(save)
    }
}
