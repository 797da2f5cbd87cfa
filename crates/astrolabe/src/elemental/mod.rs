//! Elemental profile accumulator.

pub mod contributors;
pub mod engine;
pub mod types;

pub use contributors::{hour_element, Contribution, Contributor, ProfileContext};
pub use engine::{default_contributors, elemental_profile, ElementalEngine, BASE};
pub use types::{BreakdownEntry, ElementDeltas, ElementalProfile, UnknownWeather, Weather};
