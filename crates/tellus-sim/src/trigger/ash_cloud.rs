//! Ash clouds from volcanic plates.
//!
//! Every plate with volcanic tiles rolls on its own. An eruption covers the
//! plate and its surroundings in ash: ashed tiles gather pollution each tick
//! and airports under the cloud are grounded until it clears.

use serde::{Deserialize, Serialize};

use tellus_core::constants::{
    ASH_CLOUD_DURATION, ASH_CLOUD_K, ASH_CLOUD_POLLUTION_INCREMENT, ASH_CLOUD_RADIUS,
};
use tellus_core::events::NotificationKind;
use tellus_terrain::AshState;

use super::{cap_probability, EventTrigger, Roll, RollTarget, TriggerConfig, TriggerError};
use crate::engine::WorldState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AshCloudConfig {
    /// Probability per volcanic tile.
    pub k: f64,
    pub duration_ticks: u32,
    pub pollution_increment: u32,
    /// Plate distance covered around the erupting plate.
    pub radius: u32,
}

impl Default for AshCloudConfig {
    fn default() -> Self {
        Self {
            k: ASH_CLOUD_K,
            duration_ticks: ASH_CLOUD_DURATION,
            pollution_increment: ASH_CLOUD_POLLUTION_INCREMENT,
            radius: ASH_CLOUD_RADIUS,
        }
    }
}

/// `min(1, k * magma_tiles)`, keeping NaN.
pub fn eruption_probability(k: f64, magma_tiles: u32) -> f64 {
    cap_probability(k * f64::from(magma_tiles))
}

#[derive(Debug, Clone)]
pub struct LocalAshCloud {
    config: AshCloudConfig,
}

impl LocalAshCloud {
    pub fn new(config: AshCloudConfig) -> Self {
        Self { config }
    }
}

impl EventTrigger for LocalAshCloud {
    fn name(&self) -> &str {
        "LocalAshCloud"
    }

    fn rolls(&self, state: &WorldState) -> Result<Vec<Roll>, TriggerError> {
        Ok(state
            .terrain()
            .plates()
            .iter()
            .filter(|p| p.magma_tiles > 0)
            .map(|p| {
                Roll::new(
                    eruption_probability(self.config.k, p.magma_tiles),
                    RollTarget::Plate(p.id),
                )
            })
            .collect())
    }

    fn apply(&mut self, target: RollTarget, state: &mut WorldState) -> Result<(), TriggerError> {
        let RollTarget::Plate(origin) = target else {
            return Err(TriggerError::UnexpectedTarget(target));
        };
        if state.terrain().plate(origin).is_none() {
            return Err(tellus_terrain::TerrainError::UnknownPlate(origin).into());
        }
        let plates = state.terrain().plates_within(origin, self.config.radius);
        let ash = AshState {
            remaining_ticks: self.config.duration_ticks,
            pollution_per_tick: self.config.pollution_increment,
        };
        for &plate in &plates {
            state.terrain_mut().mark_ashed(plate, ash)?;
        }
        state.notify(NotificationKind::AshCloud {
            origin,
            plates,
            duration_ticks: self.config.duration_ticks,
        });
        Ok(())
    }

    fn config(&self) -> Option<TriggerConfig> {
        Some(TriggerConfig::LocalAshCloud(self.config.clone()))
    }
}
