//! Core types and definitions for the Tellus simulation kernel.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identifiers, tile coordinates, enums, cities, notifications, calibration
//! constants, and the read-only world snapshot handed to renderers.
//! It has no dependency on the terrain model or the tick loop.

pub mod city;
pub mod constants;
pub mod enums;
pub mod events;
pub mod ids;
pub mod state;
pub mod types;
