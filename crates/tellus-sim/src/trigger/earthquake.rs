//! Earthquakes at plate boundaries.
//!
//! The boundary whose plates move most differently is the most likely
//! epicenter. Damage falls off with plate distance from the epicenter and
//! stops past the configured radius.

use serde::{Deserialize, Serialize};

use tellus_core::constants::{EARTHQUAKE_BASE_DAMAGE, EARTHQUAKE_K, EARTHQUAKE_RADIUS};
use tellus_core::events::{DamageRecord, NotificationKind};
use tellus_core::ids::EntityId;

use super::{cap_probability, EventTrigger, Roll, RollTarget, TriggerConfig, TriggerError};
use crate::engine::WorldState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthquakeConfig {
    /// Probability per unit of movement difference.
    pub k: f64,
    pub base_damage: u32,
    /// Plate distance past which damage is zero.
    pub radius: u32,
}

impl Default for EarthquakeConfig {
    fn default() -> Self {
        Self {
            k: EARTHQUAKE_K,
            base_damage: EARTHQUAKE_BASE_DAMAGE,
            radius: EARTHQUAKE_RADIUS,
        }
    }
}

/// `min(1, k * diff)`, keeping NaN.
pub fn boundary_probability(k: f64, movement_difference: f64) -> f64 {
    cap_probability(k * movement_difference)
}

/// Damage at plate distance `distance` from the epicenter.
pub fn damage_at(base: u32, distance: u32, radius: u32) -> u32 {
    if distance > radius {
        0
    } else {
        base / (distance + 1)
    }
}

#[derive(Debug, Clone)]
pub struct LocalEarthquake {
    config: EarthquakeConfig,
}

impl LocalEarthquake {
    pub fn new(config: EarthquakeConfig) -> Self {
        Self { config }
    }
}

impl EventTrigger for LocalEarthquake {
    fn name(&self) -> &str {
        "LocalEarthquake"
    }

    /// A single roll on the most active boundary. Ties go to the first
    /// boundary in ascending plate order.
    fn rolls(&self, state: &WorldState) -> Result<Vec<Roll>, TriggerError> {
        let terrain = state.terrain();
        let mut best: Option<Roll> = None;
        for (p, q) in terrain.boundaries() {
            let (Some(a), Some(b)) = (terrain.plate(p), terrain.plate(q)) else {
                continue;
            };
            let probability = boundary_probability(self.config.k, a.movement_difference(b));
            match best {
                Some(current) if !(probability > current.probability) => {}
                _ => best = Some(Roll::new(probability, RollTarget::Boundary(p, q))),
            }
        }
        Ok(best.into_iter().collect())
    }

    fn apply(&mut self, target: RollTarget, state: &mut WorldState) -> Result<(), TriggerError> {
        let RollTarget::Boundary(p, q) = target else {
            return Err(TriggerError::UnexpectedTarget(target));
        };
        let terrain = state.terrain();
        let intensity = match (terrain.plate(p), terrain.plate(q)) {
            (Some(a), Some(b)) => a.movement_difference(b),
            (None, _) => return Err(tellus_terrain::TerrainError::UnknownPlate(p).into()),
            (_, None) => return Err(tellus_terrain::TerrainError::UnknownPlate(q).into()),
        };
        let distances = terrain.plate_distances(&[p, q], self.config.radius);

        let targets: Vec<(EntityId, u32, u32)> = state
            .entities()
            .iter()
            .filter_map(|body| {
                let element = body.element();
                let plate = terrain.plate_id_at(element.position)?;
                let distance = *distances.get(&plate)?;
                let damage = damage_at(self.config.base_damage, distance, self.config.radius);
                (damage > 0).then_some((element.id(), distance, damage))
            })
            .collect();

        let mut hits = Vec::with_capacity(targets.len());
        for (id, distance, damage) in targets {
            if let Some(body) = state.entities_mut().get_mut(id) {
                let amount = body.element_mut().apply_damage(damage);
                hits.push(DamageRecord {
                    entity: id,
                    distance,
                    amount,
                });
            }
        }

        state.notify(NotificationKind::Earthquake {
            epicenter: (p, q),
            intensity,
            hits,
        });
        Ok(())
    }

    fn config(&self) -> Option<TriggerConfig> {
        Some(TriggerConfig::LocalEarthquake(self.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_falls_off_with_distance() {
        assert_eq!(damage_at(30, 0, 2), 30);
        assert_eq!(damage_at(30, 1, 2), 15);
        assert_eq!(damage_at(30, 2, 2), 10);
        assert_eq!(damage_at(30, 3, 2), 0);
    }

    #[test]
    fn test_probability_caps_at_one_and_keeps_nan() {
        assert_eq!(boundary_probability(0.5, 1.0), 0.5);
        assert_eq!(boundary_probability(0.5, 10.0), 1.0);
        assert!(boundary_probability(f64::NAN, 2.0).is_nan());
    }
}
