//! Tattva sub-cycle: five 24-minute slices repeating every two hours from sunrise.

use crate::zodiac::Element;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CYCLE_MINUTES: f64 = 120.0;
pub const SLICE_MINUTES: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tattva {
    Akasha,
    Vayu,
    Tejas,
    Apas,
    Prithvi,
}

impl Tattva {
    /// Cycle order starting at sunrise.
    pub const CYCLE: [Tattva; 5] = [
        Tattva::Akasha,
        Tattva::Vayu,
        Tattva::Tejas,
        Tattva::Apas,
        Tattva::Prithvi,
    ];

    pub fn element(&self) -> Element {
        match self {
            Tattva::Akasha => Element::Spirit,
            Tattva::Vayu => Element::Air,
            Tattva::Tejas => Element::Fire,
            Tattva::Apas => Element::Water,
            Tattva::Prithvi => Element::Earth,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tattva::Akasha => "Akasha",
            Tattva::Vayu => "Vayu",
            Tattva::Tejas => "Tejas",
            Tattva::Apas => "Apas",
            Tattva::Prithvi => "Prithvi",
        }
    }
}

impl fmt::Display for Tattva {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Active tattva at `instant` for a day starting at `sunrise`. Instants
/// before sunrise wrap backwards through the cycle.
pub fn tattva_at(sunrise: DateTime<Utc>, instant: DateTime<Utc>) -> Tattva {
    let minutes = (instant - sunrise).num_milliseconds() as f64 / 60_000.0;
    let in_cycle = minutes.rem_euclid(CYCLE_MINUTES);
    let slice = ((in_cycle / SLICE_MINUTES) as usize).min(Tattva::CYCLE.len() - 1);
    Tattva::CYCLE[slice]
}
