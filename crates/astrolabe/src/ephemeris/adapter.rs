use crate::ephemeris::backend::{Ephemeris, EphemerisError};
use crate::ephemeris::solar::sunrise_sunset;
use crate::ephemeris::types::{Body, HouseSystem, Location, RawHouses, RawPosition, SolarDay};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use std::env;
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, julday, revjul};

/// FLG_SWIEPH: use Swiss Ephemeris files
const FLG_SWIEPH: i32 = 2;
/// FLG_SPEED: also compute speeds
const FLG_SPEED: i32 = 256;
/// GREG_CAL
const GREG_CAL: i32 = 1;

const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

/// Swiss Ephemeris body codes.
fn body_code(body: Body) -> u32 {
    match body {
        Body::Sun => 0,
        Body::Moon => 1,
        Body::Mercury => 2,
        Body::Venus => 3,
        Body::Mars => 4,
        Body::Jupiter => 5,
        Body::Saturn => 6,
    }
}

/// Swiss Ephemeris adapter implementation
#[derive(Debug)]
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    house_system: HouseSystem,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path. Falls back to
    /// `SWISS_EPHEMERIS_PATH`, then to the system install location.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }
        log::info!("Swiss Ephemeris data at {}", path.display());

        Ok(Self {
            ephemeris_path: path,
            house_system: HouseSystem::default(),
        })
    }

    pub fn with_house_system(mut self, house_system: HouseSystem) -> Self {
        self.house_system = house_system;
        self
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    pub fn house_system(&self) -> HouseSystem {
        self.house_system
    }

    /// Calculate position for a single body
    pub fn calc_body_position(&self, body: Body, jd: f64) -> Result<RawPosition, EphemerisError> {
        let flags = FLG_SWIEPH | FLG_SPEED;
        let result = calc_ut(jd, body_code(body), flags as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body: body.id().to_string(),
                datetime: julian_day_to_datetime(jd),
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        let longitude = out[0].rem_euclid(360.0);
        if !longitude.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body: body.id().to_string(),
                datetime: julian_day_to_datetime(jd),
                message: "non-finite longitude".to_string(),
            });
        }
        let speed = out[3];

        Ok(RawPosition {
            longitude,
            speed: speed.is_finite().then_some(speed),
        })
    }

    /// Calculate house cusps and angles
    pub fn calc_houses(&self, jd: f64, lat: f64, lon: f64) -> Result<RawHouses, EphemerisError> {
        use swisseph::swe::houses_ex;
        use swisseph::{AscMc, Cusp};

        let (c, a) = houses_ex(jd, FLG_SWIEPH, lat, lon, self.house_system.code() as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let raw = RawHouses {
            cusps: [
                cusps.first,
                cusps.second,
                cusps.third,
                cusps.fourth,
                cusps.fifth,
                cusps.sixth,
                cusps.seventh,
                cusps.eighth,
                cusps.ninth,
                cusps.tenth,
                cusps.eleventh,
                cusps.twelfth,
            ],
            ascendant: ascmc.ascendant,
            midheaven: ascmc.mc,
        };

        if !raw.is_finite() {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!(
                    "{} cusps not finite at lat {:.4}, lon {:.4}",
                    self.house_system.name(),
                    lat,
                    lon
                ),
            });
        }
        Ok(raw)
    }
}

#[async_trait]
impl Ephemeris for SwissEphemerisAdapter {
    async fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<RawPosition, EphemerisError> {
        self.calc_body_position(body, datetime_to_julian_day(instant))
    }

    async fn rise_set(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<SolarDay, EphemerisError> {
        sunrise_sunset(date, location)
            .map(|rs| rs.into_solar_day())
            .ok_or_else(|| EphemerisError::RiseSetFailed {
                date,
                message: "rise/set outside representable time range".to_string(),
            })
    }

    async fn house_cusps(
        &self,
        instant: DateTime<Utc>,
        location: &Location,
    ) -> Result<RawHouses, EphemerisError> {
        self.calc_houses(
            datetime_to_julian_day(instant),
            location.latitude,
            location.longitude,
        )
    }
}

/// Convert UTC datetime to Julian Day
fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let hour_decimal =
        dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0;
    julday(dt.year(), dt.month() as i32, dt.day() as i32, hour_decimal, GREG_CAL as u32)
}

/// Convert Julian Day to UTC datetime, for error reporting
fn julian_day_to_datetime(jd: f64) -> DateTime<Utc> {
    let (year, month, day, hour_decimal) = revjul(jd, GREG_CAL);
    let hour = hour_decimal as u32;
    let minute = ((hour_decimal - hour as f64) * 60.0) as u32;
    let second = (((hour_decimal - hour as f64) * 60.0 - minute as f64) * 60.0) as u32;
    Utc.with_ymd_and_hms(year, month as u32, day as u32, hour, minute, second)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
