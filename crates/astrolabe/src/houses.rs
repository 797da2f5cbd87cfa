//! House cusps and the four angles.
//!
//! The Imum Coeli and Descendant are always derived from the Midheaven and
//! Ascendant (+180°), never queried separately.

use crate::ephemeris::solar::{julian_day, J2000};
use crate::ephemeris::{Ephemeris, Location, RawHouses};
use crate::zodiac::normalize_degrees;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MEAN_OBLIQUITY_DEG: f64 = 23.4393;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusps {
    /// Index 0 = 1st house cusp
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
    pub imum_coeli: f64,
    pub descendant: f64,
    /// Equal 30° houses from the Ascendant, used when the quadrant
    /// calculation was unavailable
    pub degraded: bool,
}

impl HouseCusps {
    pub fn from_angles(cusps: [f64; 12], ascendant: f64, midheaven: f64, degraded: bool) -> Self {
        let ascendant = normalize_degrees(ascendant);
        let midheaven = normalize_degrees(midheaven);
        Self {
            cusps: cusps.map(normalize_degrees),
            ascendant,
            midheaven,
            imum_coeli: normalize_degrees(midheaven + 180.0),
            descendant: normalize_degrees(ascendant + 180.0),
            degraded,
        }
    }

    pub fn from_raw(raw: &RawHouses) -> Self {
        Self::from_angles(raw.cusps, raw.ascendant, raw.midheaven, false)
    }

    /// Evenly spaced cusps anchored at the Ascendant.
    pub fn equal_from_ascendant(ascendant: f64, midheaven: f64) -> Self {
        let cusps = std::array::from_fn(|i| ascendant + 30.0 * i as f64);
        Self::from_angles(cusps, ascendant, midheaven, true)
    }
}

/// Local sidereal time in degrees (mean, low precision).
pub fn local_sidereal_degrees(instant: DateTime<Utc>, east_longitude: f64) -> f64 {
    let d = julian_day(instant) - J2000;
    normalize_degrees(280.460_618_37 + 360.985_647_366_29 * d + east_longitude)
}

/// Analytic Ascendant and Midheaven from local sidereal time and the mean
/// obliquity. Returns `(ascendant, midheaven)`.
pub fn approximate_angles(instant: DateTime<Utc>, location: &Location) -> (f64, f64) {
    let ramc = local_sidereal_degrees(instant, location.longitude).to_radians();
    let eps = MEAN_OBLIQUITY_DEG.to_radians();
    let phi = location.latitude.to_radians();

    let mc = ramc.sin().atan2(ramc.cos() * eps.cos()).to_degrees();
    let asc = ramc
        .cos()
        .atan2(-(ramc.sin() * eps.cos() + phi.tan() * eps.sin()))
        .to_degrees();
    (normalize_degrees(asc), normalize_degrees(mc))
}

/// Quadrant houses from the ephemeris, or equal houses from the Ascendant
/// when the ephemeris cannot produce them.
pub async fn compute_houses<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    instant: DateTime<Utc>,
    location: &Location,
) -> HouseCusps {
    match ephemeris.house_cusps(instant, location).await {
        Ok(raw) if raw.is_finite() => HouseCusps::from_raw(&raw),
        Ok(raw) if raw.ascendant.is_finite() && raw.midheaven.is_finite() => {
            log::warn!("house cusps not finite, using equal houses from the Ascendant");
            HouseCusps::equal_from_ascendant(raw.ascendant, raw.midheaven)
        }
        Ok(_) => {
            log::warn!("house angles not finite, using approximate Ascendant");
            let (asc, mc) = approximate_angles(instant, location);
            HouseCusps::equal_from_ascendant(asc, mc)
        }
        Err(e) => {
            log::warn!("house calculation failed ({}), using approximate Ascendant", e);
            let (asc, mc) = approximate_angles(instant, location);
            HouseCusps::equal_from_ascendant(asc, mc)
        }
    }
}
