//! Cities and their trade capacities.
//!
//! A city keeps base export capacities and import demands per good. Temporary
//! effects (droughts) are stored next to the base values and applied on read,
//! so an effect that ends leaves the base values exactly as they were.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::Good;
use crate::types::TileCoord;

/// An active drought and the adjustments it applies to farming goods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroughtEffect {
    pub remaining_ticks: u32,
    /// Percentage removed from farming-good export capacity (0-100).
    pub export_cut_pct: u32,
    /// Percentage added to farming-good import demand.
    pub import_boost_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    /// Signed degrees; `None` when the city has no configured latitude.
    pub latitude: Option<f64>,
    /// Tiles associated with the city.
    pub tiles: Vec<TileCoord>,
    exports: BTreeMap<Good, u32>,
    imports: BTreeMap<Good, u32>,
    drought: Option<DroughtEffect>,
}

impl City {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: None,
            tiles: Vec::new(),
            exports: BTreeMap::new(),
            imports: BTreeMap::new(),
            drought: None,
        }
    }

    pub fn with_latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }

    pub fn with_tiles(mut self, tiles: impl IntoIterator<Item = TileCoord>) -> Self {
        self.tiles.extend(tiles);
        self
    }

    pub fn with_export(mut self, good: Good, capacity: u32) -> Self {
        self.exports.insert(good, capacity);
        self
    }

    pub fn with_import(mut self, good: Good, demand: u32) -> Self {
        self.imports.insert(good, demand);
        self
    }

    pub fn set_export_capacity(&mut self, good: Good, capacity: u32) {
        self.exports.insert(good, capacity);
    }

    pub fn set_import_demand(&mut self, good: Good, demand: u32) {
        self.imports.insert(good, demand);
    }

    /// Export capacity before temporary effects.
    pub fn base_export_capacity(&self, good: Good) -> u32 {
        self.exports.get(&good).copied().unwrap_or(0)
    }

    /// Import demand before temporary effects.
    pub fn base_import_demand(&self, good: Good) -> u32 {
        self.imports.get(&good).copied().unwrap_or(0)
    }

    /// Export capacity with any active drought applied.
    pub fn export_capacity(&self, good: Good) -> u32 {
        let base = self.base_export_capacity(good);
        match self.drought {
            Some(effect) if good.is_farming() => {
                scale_pct(base, 100u32.saturating_sub(effect.export_cut_pct.min(100)))
            }
            _ => base,
        }
    }

    /// Import demand with any active drought applied.
    pub fn import_demand(&self, good: Good) -> u32 {
        let base = self.base_import_demand(good);
        match self.drought {
            Some(effect) if good.is_farming() => {
                scale_pct(base, 100u32.saturating_add(effect.import_boost_pct))
            }
            _ => base,
        }
    }

    pub fn drought(&self) -> Option<DroughtEffect> {
        self.drought
    }

    /// Start a drought, or refresh the one in progress. Percentages never
    /// compound: a refresh replaces the effect and keeps the longer duration.
    pub fn start_drought(&mut self, effect: DroughtEffect) {
        let remaining_ticks = match self.drought {
            Some(current) => current.remaining_ticks.max(effect.remaining_ticks),
            None => effect.remaining_ticks,
        };
        self.drought = Some(DroughtEffect {
            remaining_ticks,
            ..effect
        });
    }

    /// Count one tick off the active drought. Returns true when it ended.
    pub fn advance_drought(&mut self) -> bool {
        let Some(effect) = self.drought.as_mut() else {
            return false;
        };
        effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
        if effect.remaining_ticks == 0 {
            self.drought = None;
            true
        } else {
            false
        }
    }

    /// Iterate over base export capacities.
    pub fn exports(&self) -> impl Iterator<Item = (Good, u32)> + '_ {
        self.exports.iter().map(|(g, v)| (*g, *v))
    }

    /// Iterate over base import demands.
    pub fn imports(&self) -> impl Iterator<Item = (Good, u32)> + '_ {
        self.imports.iter().map(|(g, v)| (*g, *v))
    }
}

fn scale_pct(value: u32, pct: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(pct) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
