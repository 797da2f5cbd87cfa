//! Day rulers and planetary hours.
//!
//! Daylight (sunrise → sunset) and night (sunset → next sunrise) are each
//! split into twelve equal hours. The ruler of hour N in either span is N
//! Chaldean steps on from the day ruler of the local calendar day.

use crate::ephemeris::{Body, SolarDay};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Descending apparent speed.
pub const CHALDEAN_ORDER: [Body; 7] = [
    Body::Saturn,
    Body::Jupiter,
    Body::Mars,
    Body::Sun,
    Body::Venus,
    Body::Mercury,
    Body::Moon,
];

/// Sunday first.
const DAY_RULERS: [Body; 7] = [
    Body::Sun,
    Body::Moon,
    Body::Mars,
    Body::Mercury,
    Body::Jupiter,
    Body::Venus,
    Body::Saturn,
];

pub const HOURS_PER_SPAN: u8 = 12;

/// Used whenever a span has no positive length.
const FALLBACK_HOUR_SECONDS: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetaryHour {
    pub ruler: Body,
    pub day_ruler: Body,
    /// 0-11 within the current day or night span
    pub hour_index: u8,
    pub is_day: bool,
    /// Set when the hour was derived from the wall clock instead of
    /// sunrise/sunset.
    pub approximate: bool,
}

/// Sunrise/sunset of the local calendar day plus whichever neighbour the
/// query instant needs: the previous day's sunset before sunrise, the next
/// day's sunrise after sunset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarFrame {
    pub today: SolarDay,
    pub previous_sunset: Option<DateTime<Utc>>,
    pub next_sunrise: Option<DateTime<Utc>>,
}

impl SolarFrame {
    pub fn new(today: SolarDay) -> Self {
        Self {
            today,
            previous_sunset: None,
            next_sunrise: None,
        }
    }

    pub fn with_previous(mut self, previous: SolarDay) -> Self {
        self.previous_sunset = Some(previous.sunset);
        self
    }

    pub fn with_next(mut self, next: SolarDay) -> Self {
        self.next_sunrise = Some(next.sunrise);
        self
    }
}

/// Ruler of the weekday, 0 = Sunday. Indices wrap modulo 7.
pub fn day_ruler(weekday_from_sunday: u32) -> Body {
    DAY_RULERS[(weekday_from_sunday % 7) as usize]
}

pub fn day_ruler_for(weekday: Weekday) -> Body {
    day_ruler(weekday.num_days_from_sunday())
}

/// Walk `steps` forward through the Chaldean order from `start`.
pub fn chaldean_walk(start: Body, steps: u32) -> Body {
    let origin = CHALDEAN_ORDER
        .iter()
        .position(|b| *b == start)
        .unwrap_or_default();
    CHALDEAN_ORDER[(origin + steps as usize) % CHALDEAN_ORDER.len()]
}

/// Hour index within a span, clamped to 0-11. Non-positive spans use a
/// fixed one-hour planetary hour.
pub fn hour_index_in_span(
    instant: DateTime<Utc>,
    span_start: DateTime<Utc>,
    span_end: DateTime<Utc>,
) -> u8 {
    let span_seconds = (span_end - span_start).num_milliseconds() as f64 / 1000.0;
    let hour_seconds = if span_seconds > 0.0 {
        span_seconds / HOURS_PER_SPAN as f64
    } else {
        FALLBACK_HOUR_SECONDS
    };
    let elapsed = (instant - span_start).num_milliseconds() as f64 / 1000.0;
    let index = (elapsed / hour_seconds).floor();
    index.clamp(0.0, (HOURS_PER_SPAN - 1) as f64) as u8
}

/// Planetary hour at `instant` using real sunrise/sunset.
pub fn planetary_hour(instant: DateTime<Utc>, frame: &SolarFrame, day_ruler: Body) -> PlanetaryHour {
    let SolarDay { sunrise, sunset } = frame.today;
    let fallback_span = Duration::seconds(FALLBACK_HOUR_SECONDS as i64 * HOURS_PER_SPAN as i64);

    let (is_day, start, end) = if instant < sunrise {
        let start = frame.previous_sunset.unwrap_or(sunrise - fallback_span);
        (false, start, sunrise)
    } else if instant < sunset {
        (true, sunrise, sunset)
    } else {
        let end = frame.next_sunrise.unwrap_or(sunset + fallback_span);
        (false, sunset, end)
    };

    let hour_index = hour_index_in_span(instant, start, end);

    PlanetaryHour {
        ruler: chaldean_walk(day_ruler, hour_index as u32),
        day_ruler,
        hour_index,
        is_day,
        approximate: false,
    }
}

/// Wall-clock approximation for when no location is known: every clock
/// hour since local midnight is one planetary hour, walked from the day
/// ruler.
pub fn approximate_planetary_hour(local: DateTime<FixedOffset>) -> PlanetaryHour {
    let day_ruler = day_ruler_for(local.weekday());
    let hour = local.hour();
    PlanetaryHour {
        ruler: chaldean_walk(day_ruler, hour),
        day_ruler,
        hour_index: (hour % HOURS_PER_SPAN as u32) as u8,
        is_day: (6..18).contains(&hour),
        approximate: true,
    }
}
