//! News items with no effect on the world.

use serde::{Deserialize, Serialize};

use tellus_core::constants::EMPTY_EVENT_PROBABILITY;
use tellus_core::enums::FlavorCause;
use tellus_core::events::NotificationKind;

use super::{EventTrigger, Roll, RollTarget, TriggerConfig, TriggerError};
use crate::engine::WorldState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmptyConfig {
    pub probability: f64,
    /// Index into the cause rotation of the next headline.
    pub next_cause: usize,
}

impl Default for EmptyConfig {
    fn default() -> Self {
        Self {
            probability: EMPTY_EVENT_PROBABILITY,
            next_cause: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Empty {
    config: EmptyConfig,
}

impl Empty {
    pub fn new(config: EmptyConfig) -> Self {
        Self { config }
    }
}

impl EventTrigger for Empty {
    fn name(&self) -> &str {
        "Empty"
    }

    fn rolls(&self, _state: &WorldState) -> Result<Vec<Roll>, TriggerError> {
        Ok(vec![Roll::new(self.config.probability, RollTarget::World)])
    }

    /// Only ever adds a notification.
    fn apply(&mut self, _target: RollTarget, state: &mut WorldState) -> Result<(), TriggerError> {
        let cause = FlavorCause::ALL[self.config.next_cause % FlavorCause::ALL.len()];
        self.config.next_cause = (self.config.next_cause + 1) % FlavorCause::ALL.len();
        state.notify(NotificationKind::Flavor {
            cause,
            headline: cause.headline().to_string(),
        });
        Ok(())
    }

    fn config(&self) -> Option<TriggerConfig> {
        Some(TriggerConfig::Empty(self.config.clone()))
    }
}
