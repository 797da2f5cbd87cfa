//! One-call chart pipeline tying every calculator together.

use crate::alignments::{Alignment, AlignmentDetector, AlignmentSettings};
use crate::almanac::{merge_events, upcoming_events, UpcomingEvent};
use crate::elemental::{ElementalEngine, ElementalProfile, ProfileContext, Weather};
use crate::ephemeris::{Body, Ephemeris, FiniteDifferenceSpeed, Location, RawPosition};
use crate::error::{AstroError, Result};
use crate::houses::{compute_houses, HouseCusps};
use crate::lunar::{moon_phase, MoonPhaseInfo};
use crate::temporal::{
    approximate_planetary_hour, day_ruler_for, planetary_hour, tattva_at, PlanetaryHour,
    SolarFrame, Tattva,
};
use crate::western::BodyPlacement;
use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;

pub const DEFAULT_EVENT_HORIZON_DAYS: i64 = 365;
/// Events this many days before the query date are still reported, so that
/// proximity windows reaching back over the query instant are seen.
const EVENT_LOOKBACK_DAYS: i64 = 3;
/// Anchor for the tattva cycle when no sunrise is known.
const NOMINAL_SUNRISE_HOUR: u32 = 6;

#[derive(Debug, Clone)]
pub struct ChartRequest {
    /// Query instant; its offset defines the local wall clock
    pub instant: DateTime<FixedOffset>,
    pub location: Option<Location>,
    pub weather: Option<Weather>,
    /// Eclipses, alignments or anything else the almanac does not generate
    pub extra_events: Vec<UpcomingEvent>,
}

impl ChartRequest {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self {
            instant,
            location: None,
            weather: None,
            extra_events: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_event(mut self, event: UpcomingEvent) -> Self {
        self.extra_events.push(event);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartReport {
    pub instant: DateTime<FixedOffset>,
    pub location: Option<Location>,
    pub placements: Vec<BodyPlacement>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub houses: Option<HouseCusps>,
    pub alignments: Vec<Alignment>,
    pub planetary_hour: PlanetaryHour,
    pub tattva: Tattva,
    pub moon_phase: MoonPhaseInfo,
    pub events: Vec<UpcomingEvent>,
    pub elemental: ElementalProfile,
}

impl ChartReport {
    pub fn placement(&self, body: Body) -> Option<&BodyPlacement> {
        self.placements.iter().find(|p| p.body == body)
    }
}

/// Computes full charts against an injected ephemeris.
///
/// Positions go through [`FiniteDifferenceSpeed`], so backends that never
/// report speed still yield retrograde flags.
pub struct AstroEngine<E> {
    ephemeris: Arc<FiniteDifferenceSpeed<E>>,
    detector: AlignmentDetector,
    elemental: ElementalEngine,
    event_horizon_days: i64,
}

impl<E: Ephemeris + 'static> AstroEngine<E> {
    pub fn new(ephemeris: E) -> Self {
        Self {
            ephemeris: Arc::new(FiniteDifferenceSpeed::new(ephemeris)),
            detector: AlignmentDetector::new(),
            elemental: ElementalEngine::default(),
            event_horizon_days: DEFAULT_EVENT_HORIZON_DAYS,
        }
    }

    pub fn with_elemental_engine(mut self, elemental: ElementalEngine) -> Self {
        self.elemental = elemental;
        self
    }

    pub fn with_alignment_settings(mut self, settings: AlignmentSettings) -> Self {
        self.detector = AlignmentDetector::with_settings(settings);
        self
    }

    pub fn with_event_horizon_days(mut self, days: i64) -> Self {
        self.event_horizon_days = days.max(0);
        self
    }

    pub fn ephemeris(&self) -> &E {
        self.ephemeris.inner()
    }

    /// Positions of all seven bodies, fetched concurrently. Any single
    /// failure fails the whole call.
    pub async fn positions(&self, instant: DateTime<Utc>) -> Result<Vec<(Body, RawPosition)>> {
        let mut tasks = JoinSet::new();
        for body in Body::ALL {
            let ephemeris = Arc::clone(&self.ephemeris);
            tasks.spawn(async move { (body, ephemeris.position(body, instant).await) });
        }

        let mut positions = Vec::with_capacity(Body::ALL.len());
        while let Some(joined) = tasks.join_next().await {
            let (body, result) = joined.map_err(|e| AstroError::Task {
                message: e.to_string(),
            })?;
            positions.push((body, result?));
        }
        positions.sort_by_key(|(body, _)| *body);
        Ok(positions)
    }

    pub async fn placements(&self, instant: DateTime<Utc>) -> Result<Vec<BodyPlacement>> {
        let positions = self.positions(instant).await?;
        Ok(positions
            .into_iter()
            .map(|(body, raw)| BodyPlacement::new(body, raw.longitude, raw.is_retrograde()))
            .collect())
    }

    /// Planetary hour and tattva from real sunrise/sunset.
    async fn solar_rulers(
        &self,
        local: DateTime<FixedOffset>,
        location: &Location,
    ) -> Result<(PlanetaryHour, Tattva)> {
        let instant = local.with_timezone(&Utc);
        let date = local.date_naive();
        let today = self.ephemeris.rise_set(date, location).await?;
        let mut frame = SolarFrame::new(today);

        // the ruler always comes from the local calendar day, even in the
        // pre-dawn part of a night that began yesterday
        if instant < today.sunrise {
            let previous_date = date - Duration::days(1);
            frame = frame.with_previous(self.ephemeris.rise_set(previous_date, location).await?);
        } else if instant >= today.sunset {
            let next_date = date + Duration::days(1);
            frame = frame.with_next(self.ephemeris.rise_set(next_date, location).await?);
        }

        let hour = planetary_hour(instant, &frame, day_ruler_for(date.weekday()));
        Ok((hour, tattva_at(today.sunrise, instant)))
    }

    fn nominal_rulers(local: DateTime<FixedOffset>) -> (PlanetaryHour, Tattva) {
        let hour = approximate_planetary_hour(local);
        let sunrise = local
            .date_naive()
            .and_hms_opt(NOMINAL_SUNRISE_HOUR, 0, 0)
            .and_then(|naive| local.offset().from_local_datetime(&naive).single())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| local.with_timezone(&Utc));
        (hour, tattva_at(sunrise, local.with_timezone(&Utc)))
    }

    pub async fn compute(&self, request: &ChartRequest) -> Result<ChartReport> {
        let local = request.instant;
        let instant = local.with_timezone(&Utc);
        log::debug!("computing chart for {}", local);

        let placements = self.placements(instant).await?;
        let alignments = self.detector.detect(&placements);
        log::debug!("{} alignments detected", alignments.len());

        let (houses, (hour, tattva)) = match &request.location {
            Some(location) => {
                let houses = compute_houses(self.ephemeris.as_ref(), instant, location).await;
                (Some(houses), self.solar_rulers(local, location).await?)
            }
            None => {
                log::debug!("no location given, using wall-clock planetary hour");
                (None, Self::nominal_rulers(local))
            }
        };

        let longitude_of = |body: Body| {
            placements
                .iter()
                .find(|p| p.body == body)
                .map(|p| p.longitude)
                .unwrap_or_default()
        };
        let phase = moon_phase(longitude_of(Body::Sun), longitude_of(Body::Moon));

        let today = local.date_naive();
        let almanac = upcoming_events(
            today - Duration::days(EVENT_LOOKBACK_DAYS),
            today + Duration::days(self.event_horizon_days),
        );
        let events = merge_events(almanac, request.extra_events.iter().cloned());

        let ctx = ProfileContext {
            instant: local,
            location: request.location.as_ref(),
            placements: &placements,
            alignments: &alignments,
            hour,
            tattva,
            weather: request.weather,
            events: &events,
        };
        let elemental = self.elemental.compute(&ctx);

        Ok(ChartReport {
            instant: local,
            location: request.location.clone(),
            placements,
            houses,
            alignments,
            planetary_hour: hour,
            tattva,
            moon_phase: phase,
            events,
            elemental,
        })
    }
}
