//! Event triggers: stochastic world events evaluated once per tick.
//!
//! A trigger reports its candidate [`Roll`]s for the current state. The world
//! draws exactly one sample per roll from its random stream, in roll order,
//! and applies the trigger to that roll's target when the sample falls below
//! the roll's probability. Triggers are evaluated in registration order and
//! are independent of each other: several may fire in the same tick.
//!
//! A trigger that fails (bad probability, bad target, terrain error) is
//! reported as a notification and skipped for the rest of the tick. It never
//! aborts the tick.

pub mod ash_cloud;
pub mod drought;
pub mod earthquake;
pub mod empty;
pub mod end_of_world;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tellus_core::enums::TriggerKind;
use tellus_core::events::NotificationKind;
use tellus_core::ids::{CityId, PlateId, TriggerHandle};
use tellus_terrain::TerrainError;

use crate::engine::WorldState;

pub use ash_cloud::{AshCloudConfig, LocalAshCloud};
pub use drought::{DroughtConfig, ForeignDrought};
pub use earthquake::{EarthquakeConfig, LocalEarthquake};
pub use empty::{Empty, EmptyConfig};
pub use end_of_world::{EndOfTheWorld, EndOfTheWorldConfig};

/// Where a roll's effect lands if it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollTarget {
    World,
    Boundary(PlateId, PlateId),
    Plate(PlateId),
    City(CityId),
}

/// One chance for a trigger to fire this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roll {
    pub probability: f64,
    pub target: RollTarget,
}

impl Roll {
    pub fn new(probability: f64, target: RollTarget) -> Self {
        Self {
            probability,
            target,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// A roll probability was NaN, infinite, or outside [0, 1].
    #[error("invalid probability {0}")]
    InvalidProbability(f64),

    /// `apply` was handed a target kind this trigger never rolls for.
    #[error("unexpected target {0:?}")]
    UnexpectedTarget(RollTarget),

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error("unknown city {0}")]
    UnknownCity(CityId),
}

pub trait EventTrigger: fmt::Debug {
    fn name(&self) -> &str;

    /// Candidate rolls for the current state, in draw order. Must not mutate.
    fn rolls(&self, state: &WorldState) -> Result<Vec<Roll>, TriggerError>;

    /// Apply the effect to one fired target.
    fn apply(&mut self, target: RollTarget, state: &mut WorldState) -> Result<(), TriggerError>;

    /// Serializable form of this trigger, including any internal state.
    /// `None` for triggers that cannot be saved.
    fn config(&self) -> Option<TriggerConfig> {
        None
    }

    fn kind(&self) -> Option<TriggerKind> {
        self.config().map(|c| c.kind())
    }

    /// Highest firing probability over the current rolls (0 when there are none).
    fn probability(&self, state: &WorldState) -> Result<f64, TriggerError> {
        Ok(self
            .rolls(state)?
            .iter()
            .map(|r| r.probability)
            .fold(0.0, f64::max))
    }
}

/// Settings (and persistent state) of a built-in trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TriggerConfig {
    Empty(EmptyConfig),
    LocalEarthquake(EarthquakeConfig),
    LocalAshCloud(AshCloudConfig),
    ForeignDrought(DroughtConfig),
    EndOfTheWorld(EndOfTheWorldConfig),
}

impl TriggerConfig {
    pub fn kind(&self) -> TriggerKind {
        match self {
            TriggerConfig::Empty(_) => TriggerKind::Empty,
            TriggerConfig::LocalEarthquake(_) => TriggerKind::LocalEarthquake,
            TriggerConfig::LocalAshCloud(_) => TriggerKind::LocalAshCloud,
            TriggerConfig::ForeignDrought(_) => TriggerKind::ForeignDrought,
            TriggerConfig::EndOfTheWorld(_) => TriggerKind::EndOfTheWorld,
        }
    }

    pub fn build(&self) -> Box<dyn EventTrigger> {
        match self {
            TriggerConfig::Empty(c) => Box::new(Empty::new(c.clone())),
            TriggerConfig::LocalEarthquake(c) => Box::new(LocalEarthquake::new(c.clone())),
            TriggerConfig::LocalAshCloud(c) => Box::new(LocalAshCloud::new(c.clone())),
            TriggerConfig::ForeignDrought(c) => Box::new(ForeignDrought::new(c.clone())),
            TriggerConfig::EndOfTheWorld(c) => Box::new(EndOfTheWorld::new(c.clone())),
        }
    }

    /// Every built-in trigger with default calibration. The end of the world
    /// has no target tick, so it never fires.
    pub fn standard_set() -> Vec<TriggerConfig> {
        vec![
            TriggerConfig::Empty(EmptyConfig::default()),
            TriggerConfig::LocalEarthquake(EarthquakeConfig::default()),
            TriggerConfig::LocalAshCloud(AshCloudConfig::default()),
            TriggerConfig::ForeignDrought(DroughtConfig::default()),
            TriggerConfig::EndOfTheWorld(EndOfTheWorldConfig::default()),
        ]
    }

    /// Reject calibration values no trigger can evaluate.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            TriggerConfig::Empty(c) => probability_in_range("probability", c.probability),
            TriggerConfig::LocalEarthquake(c) => non_negative("k", c.k),
            TriggerConfig::LocalAshCloud(c) => {
                non_negative("k", c.k)?;
                if c.duration_ticks == 0 {
                    return Err("duration_ticks must be at least 1".into());
                }
                Ok(())
            }
            TriggerConfig::ForeignDrought(c) => {
                probability_in_range("max_probability", c.max_probability)?;
                if !c.band_center.is_finite() {
                    return Err(format!("band_center must be finite, got {}", c.band_center));
                }
                if !(c.band_half_width.is_finite() && c.band_half_width > 0.0) {
                    return Err(format!("band_half_width must be positive, got {}", c.band_half_width));
                }
                if c.export_cut_pct > 100 {
                    return Err(format!("export_cut_pct must be at most 100, got {}", c.export_cut_pct));
                }
                if c.duration_ticks == 0 {
                    return Err("duration_ticks must be at least 1".into());
                }
                Ok(())
            }
            TriggerConfig::EndOfTheWorld(_) => Ok(()),
        }
    }
}

fn probability_in_range(field: &str, p: f64) -> Result<(), String> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(format!("{field} must lie in [0, 1], got {p}"))
    }
}

fn non_negative(field: &str, v: f64) -> Result<(), String> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(format!("{field} must be finite and non-negative, got {v}"))
    }
}

/// Cap a computed probability at 1. NaN passes through so evaluation can
/// report it.
pub(crate) fn cap_probability(p: f64) -> f64 {
    if p > 1.0 {
        1.0
    } else {
        p
    }
}

/// A registered trigger.
#[derive(Debug)]
pub struct TriggerSlot {
    pub handle: TriggerHandle,
    pub trigger: Box<dyn EventTrigger>,
    /// Times `apply` succeeded.
    pub fired: u64,
}

/// Triggers in registration order.
#[derive(Debug, Default)]
pub struct TriggerList {
    slots: Vec<TriggerSlot>,
    next_handle: u32,
}

impl TriggerList {
    pub fn register(&mut self, trigger: Box<dyn EventTrigger>) -> TriggerHandle {
        let handle = TriggerHandle(self.next_handle);
        self.next_handle += 1;
        self.slots.push(TriggerSlot {
            handle,
            trigger,
            fired: 0,
        });
        handle
    }

    /// Remove a trigger. Evaluation of the remaining ones keeps its order.
    pub fn unregister(&mut self, handle: TriggerHandle) -> Option<Box<dyn EventTrigger>> {
        let idx = self.slots.iter().position(|s| s.handle == handle)?;
        Some(self.slots.remove(idx).trigger)
    }

    pub fn fire_count(&self, handle: TriggerHandle) -> Option<u64> {
        self.slots.iter().find(|s| s.handle == handle).map(|s| s.fired)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerSlot> + '_ {
        self.slots.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TriggerSlot> + '_ {
        self.slots.iter_mut()
    }

    pub fn next_handle(&self) -> TriggerHandle {
        TriggerHandle(self.next_handle)
    }

    /// Rebuild a list from saved slots.
    pub(crate) fn from_parts(slots: Vec<TriggerSlot>, next_handle: u32) -> Self {
        Self { slots, next_handle }
    }
}

fn report_failure(trigger: &str, err: &TriggerError, state: &mut WorldState) {
    warn!(trigger, error = %err, tick = state.tick(), "trigger failed");
    state.notify(NotificationKind::TriggerFailed {
        trigger: trigger.to_string(),
        reason: err.to_string(),
    });
}

/// Evaluate one trigger against the state: draw one sample per roll and
/// apply every roll that fires.
pub(crate) fn evaluate(slot: &mut TriggerSlot, state: &mut WorldState) {
    let rolls = match slot.trigger.rolls(state) {
        Ok(rolls) => rolls,
        Err(err) => {
            report_failure(slot.trigger.name(), &err, state);
            return;
        }
    };

    for roll in rolls {
        let sample: f64 = state.rng.gen();
        if !(roll.probability.is_finite() && (0.0..=1.0).contains(&roll.probability)) {
            let err = TriggerError::InvalidProbability(roll.probability);
            report_failure(slot.trigger.name(), &err, state);
            return;
        }
        if sample >= roll.probability {
            continue;
        }
        match slot.trigger.apply(roll.target, state) {
            Ok(()) => {
                slot.fired += 1;
                info!(
                    trigger = slot.trigger.name(),
                    target = ?roll.target,
                    tick = state.tick(),
                    "trigger fired"
                );
            }
            Err(err) => {
                report_failure(slot.trigger.name(), &err, state);
                return;
            }
        }
    }
}
