//! Finite-difference speed estimation for backends without a speed output.

use crate::ephemeris::backend::{Ephemeris, EphemerisError};
use crate::ephemeris::types::{Body, Location, RawHouses, RawPosition, SolarDay};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Sampling step for the forward difference.
const SAMPLE_STEP_HOURS: i64 = 1;

/// Wraps an [`Ephemeris`] and fills in a missing `speed` by sampling the
/// body's longitude one hour later.
///
/// Positions that already carry a speed pass through untouched.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceSpeed<E> {
    inner: E,
}

impl<E: Ephemeris> FiniteDifferenceSpeed<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

/// Signed shortest-arc difference `to - from`, in (-180, 180].
pub fn signed_arc(from: f64, to: f64) -> f64 {
    let mut diff = (to - from).rem_euclid(360.0);
    if diff > 180.0 {
        diff -= 360.0;
    }
    diff
}

#[async_trait]
impl<E: Ephemeris> Ephemeris for FiniteDifferenceSpeed<E> {
    async fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<RawPosition, EphemerisError> {
        let current = self.inner.position(body, instant).await?;
        if current.speed.is_some() {
            return Ok(current);
        }

        let later = self
            .inner
            .position(body, instant + Duration::hours(SAMPLE_STEP_HOURS))
            .await?;
        let per_day = 24.0 / SAMPLE_STEP_HOURS as f64;
        let speed = signed_arc(current.longitude, later.longitude) * per_day;
        log::debug!("estimated {} speed {:.4}°/day by finite difference", body, speed);

        Ok(RawPosition {
            longitude: current.longitude,
            speed: Some(speed),
        })
    }

    async fn rise_set(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<SolarDay, EphemerisError> {
        self.inner.rise_set(date, location).await
    }

    async fn house_cusps(
        &self,
        instant: DateTime<Utc>,
        location: &Location,
    ) -> Result<RawHouses, EphemerisError> {
        self.inner.house_cusps(instant, location).await
    }
}
