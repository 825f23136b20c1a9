//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Compass direction an element faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// All orientations, clockwise from North.
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    /// Grid step for this direction (y grows to the South).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Orientation::North => (0, -1),
            Orientation::East => (1, 0),
            Orientation::South => (0, 1),
            Orientation::West => (-1, 0),
        }
    }

    /// Quarter turn clockwise.
    pub fn rotate_cw(self) -> Self {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::South,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
        }
    }

    /// True for the North/South axis.
    pub fn is_meridional(self) -> bool {
        matches!(self, Orientation::North | Orientation::South)
    }
}

/// Tradeable good. Farming goods are the ones droughts affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Good {
    Grain,
    Vegetables,
    Fruit,
    Livestock,
    Cotton,
    Ore,
    Lumber,
    Textiles,
}

impl Good {
    pub const ALL: [Good; 8] = [
        Good::Grain,
        Good::Vegetables,
        Good::Fruit,
        Good::Livestock,
        Good::Cotton,
        Good::Ore,
        Good::Lumber,
        Good::Textiles,
    ];

    /// Whether this good comes out of farms and pastures.
    pub fn is_farming(self) -> bool {
        matches!(
            self,
            Good::Grain | Good::Vegetables | Good::Fruit | Good::Livestock | Good::Cotton
        )
    }
}

/// Type tag of a spawnable entity. Also the key of the factory registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Worker,
    Scout,
    Airport,
    Farm,
    Crop,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Worker,
        EntityKind::Scout,
        EntityKind::Airport,
        EntityKind::Farm,
        EntityKind::Crop,
    ];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Built-in event trigger variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    Empty,
    LocalEarthquake,
    LocalAshCloud,
    ForeignDrought,
    EndOfTheWorld,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A selectable behaviour of a unit type. Each unit type has its own closed set.
pub trait WorkMode: Copy + Eq + fmt::Debug + 'static {
    /// Every mode this unit type can be switched to.
    const ALL: &'static [Self];

    /// Short display name.
    fn name(self) -> &'static str;
}

/// Work modes of a worker unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerMode {
    #[default]
    Idle,
    Farming,
    Mining,
    Construction,
}

impl WorkMode for WorkerMode {
    const ALL: &'static [Self] = &[
        WorkerMode::Idle,
        WorkerMode::Farming,
        WorkerMode::Mining,
        WorkerMode::Construction,
    ];

    fn name(self) -> &'static str {
        match self {
            WorkerMode::Idle => "idle",
            WorkerMode::Farming => "farming",
            WorkerMode::Mining => "mining",
            WorkerMode::Construction => "construction",
        }
    }
}

/// Work modes of a scout unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoutMode {
    /// Stay put.
    #[default]
    Hold,
    /// Turn clockwise and step forward every tick.
    Patrol,
    /// Pick a random heading every tick and step forward.
    Wander,
}

impl WorkMode for ScoutMode {
    const ALL: &'static [Self] = &[ScoutMode::Hold, ScoutMode::Patrol, ScoutMode::Wander];

    fn name(self) -> &'static str {
        match self {
            ScoutMode::Hold => "hold",
            ScoutMode::Patrol => "patrol",
            ScoutMode::Wander => "wander",
        }
    }
}

/// Causes behind the no-effect news items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlavorCause {
    ThreeHeadedMonkey,
    GoatDementia,
    UfoSighting,
    AwarenessDay,
    YearOfTheCause,
}

impl FlavorCause {
    /// Rotation order of the news pool.
    pub const ALL: [FlavorCause; 5] = [
        FlavorCause::ThreeHeadedMonkey,
        FlavorCause::GoatDementia,
        FlavorCause::UfoSighting,
        FlavorCause::AwarenessDay,
        FlavorCause::YearOfTheCause,
    ];

    pub fn headline(self) -> &'static str {
        match self {
            FlavorCause::ThreeHeadedMonkey => "Three-headed monkey sighted",
            FlavorCause::GoatDementia => {
                "Goats deemed species most likely to suffer from dementia"
            }
            FlavorCause::UfoSighting => "UFO sighted over the countryside",
            FlavorCause::AwarenessDay => "Awareness day declared for a common illness",
            FlavorCause::YearOfTheCause => "Council proclaims the year of a good cause",
        }
    }
}
