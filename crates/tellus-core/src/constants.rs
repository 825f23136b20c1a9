//! Calibration defaults.
//!
//! None of these are balanced gameplay values; they are starting points that
//! every config file may override.

// --- Earthquakes ---

/// Probability per unit of movement-vector difference at a plate boundary.
pub const EARTHQUAKE_K: f64 = 0.01;

/// Damage dealt on the epicenter plates.
pub const EARTHQUAKE_BASE_DAMAGE: u32 = 30;

/// Plate distance beyond which an earthquake deals no damage (the 3×3 radius).
pub const EARTHQUAKE_RADIUS: u32 = 2;

// --- Ash clouds ---

/// Probability per volcanic tile of a plate.
pub const ASH_CLOUD_K: f64 = 0.0005;

/// Ticks an ash cloud stays over the affected plates.
pub const ASH_CLOUD_DURATION: u32 = 30;

/// Pollution added to each ashed tile per tick.
pub const ASH_CLOUD_POLLUTION_INCREMENT: u32 = 1;

/// Plate distance covered by an ash cloud around the erupting plate.
pub const ASH_CLOUD_RADIUS: u32 = 2;

// --- Droughts ---

/// Latitude at the middle of the arid band (degrees).
pub const DROUGHT_BAND_CENTER: f64 = 0.0;

/// Distance from the band center at which droughts stop (degrees).
pub const DROUGHT_BAND_HALF_WIDTH: f64 = 15.0;

/// Drought probability at the band center.
pub const DROUGHT_MAX_PROBABILITY: f64 = 0.02;

/// Ticks a drought lasts.
pub const DROUGHT_DURATION: u32 = 60;

/// Percentage removed from farming exports during a drought.
pub const DROUGHT_EXPORT_CUT_PCT: u32 = 50;

/// Percentage added to farming imports during a drought.
pub const DROUGHT_IMPORT_BOOST_PCT: u32 = 50;

// --- Narrative ---

/// Firing probability of the no-effect news trigger.
pub const EMPTY_EVENT_PROBABILITY: f64 = 0.01;

// --- Entities ---

/// Growth a crop needs to be mature.
pub const CROP_MATURE_GROWTH: u32 = 100;

/// Default seed when a config does not name one.
pub const DEFAULT_SEED: u64 = 42;
