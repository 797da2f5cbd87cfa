//! Recurring annual sky events on fixed calendar dates.
//!
//! Dates are approximate civil dates, not solved from the Sun's longitude.
//! Eclipses and planetary alignments are never generated here; they only
//! arrive as caller-supplied events.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_EVENTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SummerSolstice,
    WinterSolstice,
    SpringEquinox,
    AutumnEquinox,
    MeteorShower,
    SolarEclipse,
    LunarEclipse,
    PlanetaryAlignment,
}

impl EventKind {
    /// How far from the event's local noon an instant may be and still
    /// count as under the event's influence.
    pub fn proximity_window(&self) -> Duration {
        match self {
            EventKind::SummerSolstice
            | EventKind::WinterSolstice
            | EventKind::SpringEquinox
            | EventKind::AutumnEquinox => Duration::days(1),
            EventKind::MeteorShower => Duration::days(3),
            EventKind::SolarEclipse | EventKind::LunarEclipse | EventKind::PlanetaryAlignment => {
                Duration::hours(24)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub visibility: Option<String>,
}

impl UpcomingEvent {
    pub fn new(
        kind: EventKind,
        name: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            date,
            description: description.into(),
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = Some(visibility.into());
        self
    }

    /// Noon of the event date in the given offset.
    pub fn local_noon(&self, offset: FixedOffset) -> Option<DateTime<Utc>> {
        let noon = self.date.and_hms_opt(12, 0, 0)?;
        offset
            .from_local_datetime(&noon)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether `instant` falls inside this event's proximity window.
    pub fn is_active(&self, instant: DateTime<FixedOffset>) -> bool {
        match self.local_noon(*instant.offset()) {
            Some(noon) => {
                let distance = instant.with_timezone(&Utc) - noon;
                let window = self.kind.proximity_window();
                distance <= window && distance >= -window
            }
            None => false,
        }
    }
}

struct SeasonalMarker {
    kind: EventKind,
    name: &'static str,
    month: u32,
    day: u32,
    description: &'static str,
}

const SEASONAL_MARKERS: [SeasonalMarker; 4] = [
    SeasonalMarker {
        kind: EventKind::SpringEquinox,
        name: "Spring Equinox",
        month: 3,
        day: 20,
        description: "Day and night of equal length as the Sun enters Aries",
    },
    SeasonalMarker {
        kind: EventKind::SummerSolstice,
        name: "Summer Solstice",
        month: 6,
        day: 21,
        description: "Longest day of the year as the Sun enters Cancer",
    },
    SeasonalMarker {
        kind: EventKind::AutumnEquinox,
        name: "Autumn Equinox",
        month: 9,
        day: 22,
        description: "Day and night of equal length as the Sun enters Libra",
    },
    SeasonalMarker {
        kind: EventKind::WinterSolstice,
        name: "Winter Solstice",
        month: 12,
        day: 21,
        description: "Shortest day of the year as the Sun enters Capricorn",
    },
];

struct MeteorShower {
    name: &'static str,
    month: u32,
    day: u32,
    radiant: &'static str,
}

const METEOR_SHOWERS: [MeteorShower; 7] = [
    MeteorShower { name: "Quadrantids", month: 1, day: 3, radiant: "Boötes" },
    MeteorShower { name: "Lyrids", month: 4, day: 22, radiant: "Lyra" },
    MeteorShower { name: "Eta Aquariids", month: 5, day: 6, radiant: "Aquarius" },
    MeteorShower { name: "Perseids", month: 8, day: 12, radiant: "Perseus" },
    MeteorShower { name: "Orionids", month: 10, day: 21, radiant: "Orion" },
    MeteorShower { name: "Leonids", month: 11, day: 17, radiant: "Leo" },
    MeteorShower { name: "Geminids", month: 12, day: 14, radiant: "Gemini" },
];

/// Static viewing notes for the known showers.
pub fn meteor_visibility(name: &str) -> Option<&'static str> {
    match name {
        "Quadrantids" => Some("Up to 120 meteors per hour, best before dawn"),
        "Lyrids" => Some("Around 18 meteors per hour, best after midnight"),
        "Eta Aquariids" => Some("Around 50 meteors per hour, favours the southern hemisphere"),
        "Perseids" => Some("Up to 100 meteors per hour, best after midnight"),
        "Orionids" => Some("Around 20 meteors per hour, best after midnight"),
        "Leonids" => Some("Around 15 meteors per hour, best before dawn"),
        "Geminids" => Some("Up to 150 meteors per hour, visible most of the night"),
        _ => None,
    }
}

/// Solstices, equinoxes and meteor shower peaks in `[start, end]`, sorted by
/// date and capped at [`MAX_EVENTS`].
pub fn upcoming_events(start: NaiveDate, end: NaiveDate) -> Vec<UpcomingEvent> {
    if end < start {
        return Vec::new();
    }

    let mut events = Vec::new();
    for year in start.year()..=end.year() {
        for marker in &SEASONAL_MARKERS {
            if let Some(date) = NaiveDate::from_ymd_opt(year, marker.month, marker.day) {
                events.push(UpcomingEvent::new(
                    marker.kind,
                    marker.name,
                    date,
                    marker.description,
                ));
            }
        }

        for shower in &METEOR_SHOWERS {
            let Some(mut date) = NaiveDate::from_ymd_opt(year, shower.month, shower.day) else {
                continue;
            };
            if date < start {
                match NaiveDate::from_ymd_opt(year + 1, shower.month, shower.day) {
                    Some(next) => date = next,
                    None => continue,
                }
            }
            let mut event = UpcomingEvent::new(
                EventKind::MeteorShower,
                shower.name,
                date,
                format!("{} meteor shower peak, radiating from {}", shower.name, shower.radiant),
            );
            if let Some(text) = meteor_visibility(shower.name) {
                event = event.with_visibility(text);
            }
            events.push(event);
        }
    }

    events.retain(|e| e.date >= start && e.date <= end);
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    events.dedup_by(|a, b| a.date == b.date && a.name == b.name && a.kind == b.kind);
    events.truncate(MAX_EVENTS);
    events
}

/// Almanac output merged with caller-supplied events, re-sorted and
/// deduplicated. The cap only applies to the almanac part.
pub fn merge_events(
    mut almanac: Vec<UpcomingEvent>,
    extra: impl IntoIterator<Item = UpcomingEvent>,
) -> Vec<UpcomingEvent> {
    almanac.extend(extra);
    almanac.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    almanac.dedup_by(|a, b| a.date == b.date && a.name == b.name && a.kind == b.kind);
    almanac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_filters_and_sorts() {
        let events = upcoming_events(date(2024, 6, 1), date(2024, 9, 30));
        let names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Summer Solstice", "Perseids", "Autumn Equinox"]);
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_truncates_to_ten() {
        let events = upcoming_events(date(2024, 1, 1), date(2025, 12, 31));
        assert_eq!(events.len(), MAX_EVENTS);
        assert_eq!(events[0].name, "Quadrantids");
    }

    #[test]
    fn test_meteor_rolls_forward() {
        let events = upcoming_events(date(2024, 12, 20), date(2025, 1, 10));
        let quadrantids: Vec<_> = events.iter().filter(|e| e.name == "Quadrantids").collect();
        assert_eq!(quadrantids.len(), 1);
        assert_eq!(quadrantids[0].date, date(2025, 1, 3));
        assert!(quadrantids[0].visibility.is_some());
    }

    #[test]
    fn test_proximity() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let solstice = UpcomingEvent::new(EventKind::SummerSolstice, "Summer Solstice", date(2024, 6, 21), "");
        let near = offset.with_ymd_and_hms(2024, 6, 22, 11, 0, 0).unwrap();
        let far = offset.with_ymd_and_hms(2024, 6, 22, 13, 0, 0).unwrap();
        assert!(solstice.is_active(near));
        assert!(!solstice.is_active(far));

        let perseids = UpcomingEvent::new(EventKind::MeteorShower, "Perseids", date(2024, 8, 12), "");
        assert!(perseids.is_active(offset.with_ymd_and_hms(2024, 8, 15, 0, 0, 0).unwrap()));
        assert!(!perseids.is_active(offset.with_ymd_and_hms(2024, 8, 16, 0, 0, 0).unwrap()));
    }
}
