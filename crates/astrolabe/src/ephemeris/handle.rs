//! Lazily initialised, shareable Swiss Ephemeris handle.

use crate::ephemeris::adapter::SwissEphemerisAdapter;
use crate::ephemeris::backend::{Ephemeris, EphemerisError};
use crate::ephemeris::types::{Body, HouseSystem, Location, RawHouses, RawPosition, SolarDay};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Owns the one-time adapter setup. Clone the surrounding `Arc` and pass it
/// to every engine that needs positions; the adapter is created on first
/// use, and concurrent first callers wait on the same initialisation.
#[derive(Debug, Default)]
pub struct EphemerisHandle {
    path: Option<PathBuf>,
    house_system: HouseSystem,
    adapter: OnceCell<Arc<SwissEphemerisAdapter>>,
}

impl EphemerisHandle {
    pub fn new(path: Option<PathBuf>, house_system: HouseSystem) -> Self {
        Self {
            path,
            house_system,
            adapter: OnceCell::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.adapter.initialized()
    }

    pub async fn adapter(&self) -> Result<Arc<SwissEphemerisAdapter>, EphemerisError> {
        self.adapter
            .get_or_try_init(|| async {
                log::debug!("initialising Swiss Ephemeris adapter");
                SwissEphemerisAdapter::new(self.path.clone())
                    .map(|a| Arc::new(a.with_house_system(self.house_system)))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl Ephemeris for EphemerisHandle {
    async fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<RawPosition, EphemerisError> {
        self.adapter().await?.position(body, instant).await
    }

    async fn rise_set(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<SolarDay, EphemerisError> {
        self.adapter().await?.rise_set(date, location).await
    }

    async fn house_cusps(
        &self,
        instant: DateTime<Utc>,
        location: &Location,
    ) -> Result<RawHouses, EphemerisError> {
        self.adapter().await?.house_cusps(instant, location).await
    }
}
