//! Moon phase from the Sun-Moon elongation.

use crate::zodiac::normalize_degrees;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SYNODIC_MONTH_DAYS: f64 = 29.53058867;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Eight 45° sectors centred on multiples of 45°, New Moon spanning
    /// [337.5, 22.5).
    pub fn from_elongation(elongation: f64) -> MoonPhase {
        let shifted = normalize_degrees(elongation + 22.5);
        let sector = ((shifted / 45.0).floor() as usize).min(7);
        Self::ALL[sector]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoonPhaseInfo {
    pub phase: MoonPhase,
    /// Percent of the disc lit, one decimal
    pub illumination: f64,
    /// Days since new moon, one decimal
    pub age_days: f64,
    pub elongation: f64,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn moon_phase(sun_longitude: f64, moon_longitude: f64) -> MoonPhaseInfo {
    let elongation = normalize_degrees(moon_longitude - sun_longitude);
    let illumination = (1.0 - elongation.to_radians().cos()) / 2.0 * 100.0;
    let age = elongation / 360.0 * SYNODIC_MONTH_DAYS;

    MoonPhaseInfo {
        phase: MoonPhase::from_elongation(elongation),
        illumination: round1(illumination),
        age_days: round1(age),
        // 359.95.. rounds up to a full turn
        elongation: normalize_degrees(round1(elongation)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_full() {
        let new = moon_phase(100.0, 100.0);
        assert_eq!(new.phase, MoonPhase::NewMoon);
        assert_eq!(new.illumination, 0.0);
        assert_eq!(new.age_days, 0.0);

        let full = moon_phase(10.0, 190.0);
        assert_eq!(full.phase, MoonPhase::FullMoon);
        assert_eq!(full.illumination, 100.0);
        assert_eq!(full.age_days, 14.8);
    }

    #[test]
    fn test_sector_boundaries() {
        assert_eq!(MoonPhase::from_elongation(337.5), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(22.4), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(22.5), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_elongation(90.0), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_elongation(270.0), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_elongation(337.4), MoonPhase::WaningCrescent);
    }

    #[test]
    fn test_elongation_wraps() {
        let info = moon_phase(350.0, 80.0);
        assert_eq!(info.elongation, 90.0);
        assert_eq!(info.illumination, 50.0);
    }

    #[test]
    fn test_elongation_just_below_full_turn() {
        let info = moon_phase(0.0, 359.97);
        assert_eq!(info.elongation, 0.0);
        assert_eq!(info.phase, MoonPhase::NewMoon);
        assert_eq!(info.illumination, 0.0);
    }
}
