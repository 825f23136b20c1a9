//! The end of the world, predicted for one tick. It never comes.

use serde::{Deserialize, Serialize};

use tellus_core::events::NotificationKind;

use super::{EventTrigger, Roll, RollTarget, TriggerConfig, TriggerError};
use crate::engine::WorldState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndOfTheWorldConfig {
    /// Predicted tick. `None` disables the trigger.
    pub target_tick: Option<u64>,
    pub fired: bool,
}

#[derive(Debug, Clone)]
pub struct EndOfTheWorld {
    config: EndOfTheWorldConfig,
}

impl EndOfTheWorld {
    pub fn new(config: EndOfTheWorldConfig) -> Self {
        Self { config }
    }

    pub fn at(tick: u64) -> Self {
        Self::new(EndOfTheWorldConfig {
            target_tick: Some(tick),
            fired: false,
        })
    }
}

impl EventTrigger for EndOfTheWorld {
    fn name(&self) -> &str {
        "EndOfTheWorld"
    }

    /// Certain on the target tick until it has fired once, impossible otherwise.
    fn rolls(&self, state: &WorldState) -> Result<Vec<Roll>, TriggerError> {
        let due = !self.config.fired && self.config.target_tick == Some(state.tick());
        Ok(vec![Roll::new(if due { 1.0 } else { 0.0 }, RollTarget::World)])
    }

    fn apply(&mut self, _target: RollTarget, state: &mut WorldState) -> Result<(), TriggerError> {
        self.config.fired = true;
        let target_tick = self.config.target_tick.unwrap_or_else(|| state.tick());
        state.notify(NotificationKind::WorldDidNotEnd { target_tick });
        Ok(())
    }

    fn config(&self) -> Option<TriggerConfig> {
        Some(TriggerConfig::EndOfTheWorld(self.config.clone()))
    }
}
