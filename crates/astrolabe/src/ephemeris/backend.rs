use crate::ephemeris::types::{Body, Location, RawHouses, RawPosition, SolarDay};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Failed to calculate position for {body} at {datetime}: {message}")]
    CalculationFailed {
        body: String,
        datetime: DateTime<Utc>,
        message: String,
    },
    #[error("Rise/set calculation failed for {date}: {message}")]
    RiseSetFailed { date: NaiveDate, message: String },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
}

/// Source of raw astronomical positions.
///
/// Implementations wrap a numerical solver. Every method may fail, and
/// failures are surfaced to the caller rather than replaced by defaults.
#[async_trait]
pub trait Ephemeris: Send + Sync {
    /// Ecliptic longitude and (optionally) speed of `body` at `instant`.
    async fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<RawPosition, EphemerisError>;

    /// Sunrise and sunset on the calendar `date` at `location`.
    async fn rise_set(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<SolarDay, EphemerisError>;

    /// Quadrant house cusps, Ascendant and Midheaven.
    async fn house_cusps(
        &self,
        instant: DateTime<Utc>,
        location: &Location,
    ) -> Result<RawHouses, EphemerisError>;
}

#[async_trait]
impl<E: Ephemeris + ?Sized> Ephemeris for Arc<E> {
    async fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<RawPosition, EphemerisError> {
        (**self).position(body, instant).await
    }

    async fn rise_set(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<SolarDay, EphemerisError> {
        (**self).rise_set(date, location).await
    }

    async fn house_cusps(
        &self,
        instant: DateTime<Utc>,
        location: &Location,
    ) -> Result<RawHouses, EphemerisError> {
        (**self).house_cusps(instant, location).await
    }
}
