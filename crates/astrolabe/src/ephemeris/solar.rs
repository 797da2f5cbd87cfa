//! Sunrise/sunset from the NOAA sunrise equation.
//!
//! Accurate to roughly a minute at mid latitudes, which is finer than a
//! planetary hour needs.

use crate::ephemeris::types::{Location, SolarDay};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Julian day of the J2000.0 epoch.
pub const J2000: f64 = 2451545.0;
/// Julian day of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2440587.5;
/// Apparent altitude of the Sun's upper limb at rise/set (refraction + radius).
const HORIZON_ALTITUDE_DEG: f64 = -0.833;
const OBLIQUITY_DEG: f64 = 23.4397;

/// Outcome of a rise/set computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiseSet {
    Normal {
        sunrise: DateTime<Utc>,
        sunset: DateTime<Utc>,
    },
    /// Sun never sets; carries the solar transit.
    AlwaysUp(DateTime<Utc>),
    /// Sun never rises; carries the solar transit.
    AlwaysDown(DateTime<Utc>),
}

impl RiseSet {
    /// Collapse polar cases into a zero-length day at solar noon.
    pub fn into_solar_day(self) -> SolarDay {
        match self {
            RiseSet::Normal { sunrise, sunset } => SolarDay { sunrise, sunset },
            RiseSet::AlwaysUp(noon) | RiseSet::AlwaysDown(noon) => SolarDay {
                sunrise: noon,
                sunset: noon,
            },
        }
    }
}

pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JD
}

pub fn from_julian_day(jd: f64) -> Option<DateTime<Utc>> {
    let millis = ((jd - UNIX_EPOCH_JD) * 86_400_000.0).round() as i64;
    Utc.timestamp_millis_opt(millis).single()
}

/// Sunrise and sunset on `date` at `location`. Returns `None` only when the
/// resulting Julian days cannot be represented as timestamps.
pub fn sunrise_sunset(date: NaiveDate, location: &Location) -> Option<RiseSet> {
    let epoch = NaiveDate::from_ymd_opt(2000, 1, 1)?;
    let n = (date - epoch).num_days() as f64;

    let j_star = n - location.longitude / 360.0;
    let m = (357.5291 + 0.985_600_28 * j_star).rem_euclid(360.0);
    let m_rad = m.to_radians();
    let center =
        1.9148 * m_rad.sin() + 0.0200 * (2.0 * m_rad).sin() + 0.0003 * (3.0 * m_rad).sin();
    let lambda = (m + center + 180.0 + 102.9372).rem_euclid(360.0);
    let lambda_rad = lambda.to_radians();
    let transit = J2000 + j_star + 0.0053 * m_rad.sin() - 0.0069 * (2.0 * lambda_rad).sin();

    let sin_decl = lambda_rad.sin() * OBLIQUITY_DEG.to_radians().sin();
    let decl = sin_decl.asin();
    let phi = location.latitude.to_radians();
    let cos_hour_angle = (HORIZON_ALTITUDE_DEG.to_radians().sin() - phi.sin() * sin_decl)
        / (phi.cos() * decl.cos());

    let noon = from_julian_day(transit)?;
    if cos_hour_angle < -1.0 {
        return Some(RiseSet::AlwaysUp(noon));
    }
    if cos_hour_angle > 1.0 {
        return Some(RiseSet::AlwaysDown(noon));
    }

    let hour_angle = cos_hour_angle.acos().to_degrees();
    Some(RiseSet::Normal {
        sunrise: from_julian_day(transit - hour_angle / 360.0)?,
        sunset: from_julian_day(transit + hour_angle / 360.0)?,
    })
}
