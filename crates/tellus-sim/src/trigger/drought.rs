//! Droughts in foreign cities.
//!
//! Cities inside an arid latitude band may suffer droughts. The chance peaks
//! at the band center and falls linearly to zero at the band edges. A
//! drought cuts farming exports and raises farming imports until it ends.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tellus_core::city::DroughtEffect;
use tellus_core::constants::{
    DROUGHT_BAND_CENTER, DROUGHT_BAND_HALF_WIDTH, DROUGHT_DURATION, DROUGHT_EXPORT_CUT_PCT,
    DROUGHT_IMPORT_BOOST_PCT, DROUGHT_MAX_PROBABILITY,
};
use tellus_core::events::NotificationKind;
use tellus_core::ids::CityId;

use super::{EventTrigger, Roll, RollTarget, TriggerConfig, TriggerError};
use crate::engine::WorldState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroughtConfig {
    /// Degrees.
    pub band_center: f64,
    /// Degrees from the center to where the chance reaches zero.
    pub band_half_width: f64,
    pub max_probability: f64,
    pub duration_ticks: u32,
    pub export_cut_pct: u32,
    pub import_boost_pct: u32,
}

impl Default for DroughtConfig {
    fn default() -> Self {
        Self {
            band_center: DROUGHT_BAND_CENTER,
            band_half_width: DROUGHT_BAND_HALF_WIDTH,
            max_probability: DROUGHT_MAX_PROBABILITY,
            duration_ticks: DROUGHT_DURATION,
            export_cut_pct: DROUGHT_EXPORT_CUT_PCT,
            import_boost_pct: DROUGHT_IMPORT_BOOST_PCT,
        }
    }
}

impl DroughtConfig {
    /// Triangular falloff: `p_max * max(0, 1 - |lat - center| / half_width)`.
    pub fn drought_probability(&self, latitude: f64) -> f64 {
        let falloff = 1.0 - (latitude - self.band_center).abs() / self.band_half_width;
        self.max_probability * falloff.max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct ForeignDrought {
    config: DroughtConfig,
}

impl ForeignDrought {
    pub fn new(config: DroughtConfig) -> Self {
        Self { config }
    }
}

impl EventTrigger for ForeignDrought {
    fn name(&self) -> &str {
        "ForeignDrought"
    }

    /// One roll per city, in city order. Cities without a latitude roll at 0.
    fn rolls(&self, state: &WorldState) -> Result<Vec<Roll>, TriggerError> {
        Ok(state
            .cities()
            .iter()
            .enumerate()
            .map(|(i, city)| {
                let id = CityId(i as u32);
                let probability = match city.latitude {
                    Some(lat) => self.config.drought_probability(lat),
                    None => {
                        debug!(city = %id, name = %city.name, "no latitude, drought chance is zero");
                        0.0
                    }
                };
                Roll::new(probability, RollTarget::City(id))
            })
            .collect())
    }

    fn apply(&mut self, target: RollTarget, state: &mut WorldState) -> Result<(), TriggerError> {
        let RollTarget::City(id) = target else {
            return Err(TriggerError::UnexpectedTarget(target));
        };
        let city = state.city_mut(id).ok_or(TriggerError::UnknownCity(id))?;
        city.start_drought(DroughtEffect {
            remaining_ticks: self.config.duration_ticks,
            export_cut_pct: self.config.export_cut_pct,
            import_boost_pct: self.config.import_boost_pct,
        });
        state.notify(NotificationKind::Drought {
            city: id,
            duration_ticks: self.config.duration_ticks,
        });
        Ok(())
    }

    fn config(&self) -> Option<TriggerConfig> {
        Some(TriggerConfig::ForeignDrought(self.config.clone()))
    }
}
