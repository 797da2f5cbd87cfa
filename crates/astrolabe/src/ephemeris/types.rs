use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven classical bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
}

impl Body {
    pub const ALL: [Body; 7] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
        }
    }

    /// Lowercase identifier, matching the ids the ephemeris tables use.
    pub fn id(&self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geographic location coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Degrees, north positive
    pub latitude: f64,
    /// Degrees, east positive
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            postal_code: None,
        }
    }

    pub fn with_postal_code(mut self, code: impl Into<String>) -> Self {
        self.postal_code = Some(code.into());
        self
    }

    pub fn is_southern(&self) -> bool {
        self.latitude < 0.0
    }
}

/// Raw position as reported by an ephemeris backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Ecliptic longitude in degrees (0-360)
    pub longitude: f64,
    /// Speed in longitude (degrees per day), when the backend reports one
    pub speed: Option<f64>,
}

impl RawPosition {
    /// Negative speed means apparent backward motion. Unknown speed is
    /// reported as direct.
    pub fn is_retrograde(&self) -> bool {
        self.speed.map(|s| s < 0.0).unwrap_or(false)
    }
}

/// Sunrise and sunset for one calendar day at one location.
///
/// Polar day and polar night are reported as a zero-length day
/// (`sunrise == sunset`), which callers treat as degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarDay {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// House cusps and angles as reported by an ephemeris backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawHouses {
    /// Cusps 1..12, index 0 = 1st house
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

impl RawHouses {
    pub fn is_finite(&self) -> bool {
        self.ascendant.is_finite()
            && self.midheaven.is_finite()
            && self.cusps.iter().all(|c| c.is_finite())
    }
}

/// House system selector, mapped to Swiss Ephemeris house codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    WholeSign,
    Koch,
    Equal,
    Regiomontanus,
    Campanus,
    Alcabitius,
    Morinus,
}

impl HouseSystem {
    pub const ALL: [HouseSystem; 8] = [
        HouseSystem::Placidus,
        HouseSystem::WholeSign,
        HouseSystem::Koch,
        HouseSystem::Equal,
        HouseSystem::Regiomontanus,
        HouseSystem::Campanus,
        HouseSystem::Alcabitius,
        HouseSystem::Morinus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
            HouseSystem::WholeSign => "whole_sign",
            HouseSystem::Koch => "koch",
            HouseSystem::Equal => "equal",
            HouseSystem::Regiomontanus => "regiomontanus",
            HouseSystem::Campanus => "campanus",
            HouseSystem::Alcabitius => "alcabitius",
            HouseSystem::Morinus => "morinus",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            HouseSystem::Placidus => b'P',
            HouseSystem::WholeSign => b'W',
            HouseSystem::Koch => b'K',
            HouseSystem::Equal => b'E',
            HouseSystem::Regiomontanus => b'R',
            HouseSystem::Campanus => b'C',
            HouseSystem::Alcabitius => b'A',
            HouseSystem::Morinus => b'M',
        }
    }
}

impl std::str::FromStr for HouseSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        HouseSystem::ALL
            .iter()
            .copied()
            .find(|h| h.name() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid house system: {}. Valid systems: {:?}",
                    s,
                    HouseSystem::ALL.iter().map(|h| h.name()).collect::<Vec<_>>()
                )
            })
    }
}
