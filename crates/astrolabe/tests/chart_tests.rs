use astrolabe::almanac::{EventKind, UpcomingEvent};
use astrolabe::chart::{AstroEngine, ChartRequest};
use astrolabe::elemental::{Weather, BASE};
use astrolabe::ephemeris::*;
use astrolabe::AstroError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed longitudes; without reported speed, bodies drift slowly (Saturn backwards).
struct FixedSky {
    longitudes: [f64; 7],
    report_speed: bool,
    fail_houses: bool,
    fail_body: Option<Body>,
    calls: AtomicUsize,
}

impl FixedSky {
    fn new(longitudes: [f64; 7]) -> Self {
        Self {
            longitudes,
            report_speed: true,
            fail_houses: false,
            fail_body: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn index(body: Body) -> usize {
        Body::ALL.iter().position(|b| *b == body).unwrap()
    }
}

#[async_trait]
impl Ephemeris for FixedSky {
    async fn position(&self, body: Body, instant: DateTime<Utc>) -> Result<RawPosition, EphemerisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_body == Some(body) {
            return Err(EphemerisError::CalculationFailed {
                body: body.to_string(),
                datetime: instant,
                message: "no data".to_string(),
            });
        }
        let base = self.longitudes[Self::index(body)];
        if self.report_speed {
            return Ok(RawPosition {
                longitude: base,
                speed: Some(1.0),
            });
        }
        // Saturn drifts backwards, everything else forwards
        let hours = (instant.timestamp() % 86_400) as f64 / 3600.0;
        let rate = if body == Body::Saturn { -0.01 } else { 0.01 };
        Ok(RawPosition {
            longitude: (base + rate * hours).rem_euclid(360.0),
            speed: None,
        })
    }

    async fn rise_set(&self, date: NaiveDate, _location: &Location) -> Result<SolarDay, EphemerisError> {
        let at = |h| Utc.from_utc_datetime(&date.and_hms_opt(h, 0, 0).unwrap());
        Ok(SolarDay {
            sunrise: at(6),
            sunset: at(18),
        })
    }

    async fn house_cusps(&self, _instant: DateTime<Utc>, _location: &Location) -> Result<RawHouses, EphemerisError> {
        if self.fail_houses {
            return Err(EphemerisError::HouseCalculationFailed {
                message: "polar latitude".to_string(),
            });
        }
        Ok(RawHouses {
            cusps: std::array::from_fn(|i| 100.0 + 30.0 * i as f64),
            ascendant: 100.0,
            midheaven: 10.0,
        })
    }
}

const SKY: [f64; 7] = [135.0, 315.0, 140.0, 20.0, 200.0, 65.0, 330.0];

fn utc_instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn test_full_chart_with_location() {
    let engine = AstroEngine::new(FixedSky::new(SKY));
    // 2024-08-07 is a Wednesday
    let request = ChartRequest::new(utc_instant(2024, 8, 7, 7))
        .with_location(Location::new(40.0, 0.0))
        .with_weather(Weather::Clear);
    let report = engine.compute(&request).await.unwrap();

    assert_eq!(report.placements.len(), 7);
    assert_eq!(report.placements[0].body, Body::Sun);

    let houses = report.houses.as_ref().unwrap();
    assert!(!houses.degraded);
    assert_eq!(houses.descendant, 280.0);
    assert_eq!(houses.imum_coeli, 190.0);

    assert!(!report.planetary_hour.approximate);
    assert!(report.planetary_hour.is_day);
    assert_eq!(report.planetary_hour.day_ruler, Body::Mercury);
    assert_eq!(report.planetary_hour.hour_index, 1);
    assert_eq!(report.planetary_hour.ruler, Body::Moon);

    // Sun 135, Moon 315: full
    assert_eq!(report.moon_phase.phase, astrolabe::MoonPhase::FullMoon);

    assert!(!report.events.is_empty());
    assert_eq!(report.events[0].name, "Perseids");
    assert!(report.elemental.entry("weather").is_some());
    assert!(report.elemental.entry("latitude").is_some());
}

#[tokio::test]
async fn test_chart_without_location_is_approximate() {
    let engine = AstroEngine::new(FixedSky::new(SKY));
    let report = engine
        .compute(&ChartRequest::new(utc_instant(2024, 8, 7, 7)))
        .await
        .unwrap();

    assert!(report.houses.is_none());
    assert!(report.planetary_hour.approximate);
    assert!(report.elemental.hour_approximate);
    assert!(report.elemental.entry("latitude").is_none());
    // 07:00 is 60 minutes after the nominal 06:00 sunrise
    assert_eq!(report.tattva, astrolabe::Tattva::Tejas);
}

#[tokio::test]
async fn test_pre_dawn_uses_calendar_day_ruler() {
    let engine = AstroEngine::new(FixedSky::new(SKY));
    // Thursday 03:00, in the night that began Wednesday evening
    let request = ChartRequest::new(utc_instant(2024, 8, 8, 3)).with_location(Location::new(40.0, 0.0));
    let report = engine.compute(&request).await.unwrap();

    assert!(!report.planetary_hour.is_day);
    assert_eq!(report.planetary_hour.day_ruler, Body::Jupiter);
    assert_eq!(report.planetary_hour.hour_index, 9);
    assert_eq!(report.planetary_hour.ruler, Body::Sun);
}

#[tokio::test]
async fn test_house_failure_degrades() {
    let mut sky = FixedSky::new(SKY);
    sky.fail_houses = true;
    let engine = AstroEngine::new(sky);
    let request = ChartRequest::new(utc_instant(2024, 3, 1, 12)).with_location(Location::new(51.5, -0.1));
    let report = engine.compute(&request).await.unwrap();

    let houses = report.houses.unwrap();
    assert!(houses.degraded);
    assert_eq!(houses.cusps[0], houses.ascendant);
    assert!((houses.descendant - (houses.ascendant + 180.0).rem_euclid(360.0)).abs() < 1e-9);
}

#[tokio::test]
async fn test_position_failure_propagates() {
    let mut sky = FixedSky::new(SKY);
    sky.fail_body = Some(Body::Mars);
    let engine = AstroEngine::new(sky);
    let result = engine.compute(&ChartRequest::new(utc_instant(2024, 3, 1, 12))).await;
    assert!(matches!(result, Err(AstroError::Ephemeris(_))));
}

#[tokio::test]
async fn test_missing_speed_is_estimated() {
    let mut sky = FixedSky::new(SKY);
    sky.report_speed = false;
    let engine = AstroEngine::new(sky);
    let placements = engine.placements(utc_instant(2024, 3, 1, 12).with_timezone(&Utc)).await.unwrap();

    for p in &placements {
        assert_eq!(p.retrograde, p.body == Body::Saturn, "{}", p.body);
    }
    // one sample plus one finite-difference sample per body
    assert_eq!(engine.ephemeris().calls.load(Ordering::SeqCst), 14);
}

#[tokio::test]
async fn test_caller_events_are_merged_and_active() {
    let engine = AstroEngine::new(FixedSky::new(SKY)).with_event_horizon_days(30);
    let instant = utc_instant(2024, 4, 8, 15);
    let eclipse = UpcomingEvent::new(
        EventKind::SolarEclipse,
        "Total Solar Eclipse",
        instant.date_naive(),
        "Path of totality across North America",
    );
    let report = engine
        .compute(&ChartRequest::new(instant).with_event(eclipse))
        .await
        .unwrap();

    assert_eq!(report.events[0].kind, EventKind::SolarEclipse);
    assert!(report.events.iter().any(|e| e.name == "Lyrids"));
    assert!(report.events.iter().all(|e| e.date <= instant.date_naive() + Duration::days(30)));
    assert_eq!(report.elemental.entry("event_spirit").unwrap().deltas.spirit, 15.0);
}

#[tokio::test]
async fn test_report_serializes() {
    let engine = AstroEngine::new(FixedSky::new(SKY));
    let report = engine
        .compute(&ChartRequest::new(utc_instant(2024, 8, 7, 7)).with_location(Location::new(40.0, 0.0)))
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["placements"][0]["body"], "sun");
    assert!(json["elemental"]["breakdown"].is_array());
    assert!(json["elemental"]["fire"].as_f64().unwrap() >= 0.0);
    let totals = report.elemental.breakdown.iter().fold(BASE, |acc, e| acc + e.deltas);
    assert!((totals.air - report.elemental.air).abs() < 1e-9);
}
