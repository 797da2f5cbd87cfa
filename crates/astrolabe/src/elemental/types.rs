use crate::ephemeris::Body;
use crate::temporal::Tattva;
use crate::zodiac::{Element, ZodiacSign};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use thiserror::Error;

/// Signed per-element amounts. Used both for running totals and for a
/// single source's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementDeltas {
    pub fire: f64,
    pub earth: f64,
    pub air: f64,
    pub water: f64,
    pub spirit: f64,
}

impl ElementDeltas {
    pub const ZERO: ElementDeltas = ElementDeltas {
        fire: 0.0,
        earth: 0.0,
        air: 0.0,
        water: 0.0,
        spirit: 0.0,
    };

    pub fn single(element: Element, amount: f64) -> Self {
        let mut d = Self::ZERO;
        d.add_to(element, amount);
        d
    }

    pub fn spirit(amount: f64) -> Self {
        Self::single(Element::Spirit, amount)
    }

    pub fn get(&self, element: Element) -> f64 {
        match element {
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Air => self.air,
            Element::Water => self.water,
            Element::Spirit => self.spirit,
        }
    }

    pub fn add_to(&mut self, element: Element, amount: f64) {
        match element {
            Element::Fire => self.fire += amount,
            Element::Earth => self.earth += amount,
            Element::Air => self.air += amount,
            Element::Water => self.water += amount,
            Element::Spirit => self.spirit += amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// (min, max) over fire, earth, air and water.
    pub fn physical_range(&self) -> (f64, f64) {
        Element::PHYSICAL
            .iter()
            .map(|e| self.get(*e))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}

impl AddAssign for ElementDeltas {
    fn add_assign(&mut self, rhs: Self) {
        self.fire += rhs.fire;
        self.earth += rhs.earth;
        self.air += rhs.air;
        self.water += rhs.water;
        self.spirit += rhs.spirit;
    }
}

impl Add for ElementDeltas {
    type Output = ElementDeltas;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

/// One source's net effect on the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub source: String,
    pub deltas: ElementDeltas,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementalProfile {
    pub fire: f64,
    pub earth: f64,
    pub air: f64,
    pub water: f64,
    pub spirit: f64,
    pub hour_ruler: Body,
    pub hour_approximate: bool,
    pub tattva: Tattva,
    pub moon_sign: Option<ZodiacSign>,
    pub breakdown: Vec<BreakdownEntry>,
}

impl ElementalProfile {
    pub fn totals(&self) -> ElementDeltas {
        ElementDeltas {
            fire: self.fire,
            earth: self.earth,
            air: self.air,
            water: self.water,
            spirit: self.spirit,
        }
    }

    /// Strongest physical element; ties resolve in fire, earth, air, water order.
    pub fn dominant(&self) -> Element {
        let totals = self.totals();
        let mut best = Element::Fire;
        for element in Element::PHYSICAL {
            if totals.get(element) > totals.get(best) {
                best = element;
            }
        }
        best
    }

    pub fn entry(&self, source: &str) -> Option<&BreakdownEntry> {
        self.breakdown.iter().find(|e| e.source == source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    Wind,
    Tornado,
}

impl Weather {
    pub const ALL: [Weather; 11] = [
        Weather::Clear,
        Weather::Clouds,
        Weather::Rain,
        Weather::Drizzle,
        Weather::Thunderstorm,
        Weather::Snow,
        Weather::Mist,
        Weather::Fog,
        Weather::Haze,
        Weather::Wind,
        Weather::Tornado,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Clouds => "Clouds",
            Weather::Rain => "Rain",
            Weather::Drizzle => "Drizzle",
            Weather::Thunderstorm => "Thunderstorm",
            Weather::Snow => "Snow",
            Weather::Mist => "Mist",
            Weather::Fog => "Fog",
            Weather::Haze => "Haze",
            Weather::Wind => "Wind",
            Weather::Tornado => "Tornado",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown weather condition: {0}")]
pub struct UnknownWeather(pub String);

impl FromStr for Weather {
    type Err = UnknownWeather;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Weather::ALL
            .iter()
            .copied()
            .find(|w| w.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownWeather(s.to_string()))
    }
}
