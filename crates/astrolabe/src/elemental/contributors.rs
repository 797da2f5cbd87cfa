//! Named sources feeding the elemental profile.
//!
//! Each contributor looks at the shared [`ProfileContext`] (and, if it needs
//! to, the totals accumulated so far) and either returns its net deltas or
//! `None` when it does not apply.

use crate::alignments::{Alignment, AlignmentKind};
use crate::almanac::{EventKind, UpcomingEvent};
use crate::elemental::types::{ElementDeltas, Weather};
use crate::ephemeris::{Body, Location};
use crate::temporal::{PlanetaryHour, Tattva};
use crate::western::{BodyPlacement, Dignity};
use crate::zodiac::Element;
use chrono::{DateTime, Datelike, FixedOffset, Timelike};

/// Everything a contributor may read.
#[derive(Debug, Clone)]
pub struct ProfileContext<'a> {
    /// Query instant in the caller's local offset
    pub instant: DateTime<FixedOffset>,
    pub location: Option<&'a Location>,
    pub placements: &'a [BodyPlacement],
    pub alignments: &'a [Alignment],
    pub hour: PlanetaryHour,
    pub tattva: Tattva,
    pub weather: Option<Weather>,
    pub events: &'a [UpcomingEvent],
}

impl<'a> ProfileContext<'a> {
    pub fn active_events(&self) -> impl Iterator<Item = &'a UpcomingEvent> + '_ {
        self.events.iter().filter(move |e| e.is_active(self.instant))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub deltas: ElementDeltas,
    pub detail: String,
}

impl Contribution {
    pub fn new(deltas: ElementDeltas, detail: impl Into<String>) -> Self {
        Self {
            deltas,
            detail: detail.into(),
        }
    }
}

pub trait Contributor: Send + Sync {
    /// Source name recorded in the breakdown
    fn name(&self) -> &'static str;

    fn contribute(&self, ctx: &ProfileContext<'_>, running: &ElementDeltas) -> Option<Contribution>;
}

fn signed(v: f64) -> String {
    if v >= 0.0 {
        format!("+{}", v)
    } else {
        format!("{}", v)
    }
}

// Physical sources

pub struct PlacementContributor;

impl PlacementContributor {
    pub fn weight(body: Body) -> f64 {
        match body {
            Body::Sun => 10.0,
            Body::Moon => 8.0,
            _ => 4.0,
        }
    }
}

impl Contributor for PlacementContributor {
    fn name(&self) -> &'static str {
        "placements"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        if ctx.placements.is_empty() {
            return None;
        }
        let mut deltas = ElementDeltas::ZERO;
        let mut parts = Vec::with_capacity(ctx.placements.len());
        for p in ctx.placements {
            let weight = Self::weight(p.body);
            deltas.add_to(p.element(), weight);
            parts.push(format!(
                "{} {:.0}° {} ({} {})",
                p.body,
                p.degree().floor(),
                p.sign,
                p.element(),
                signed(weight)
            ));
        }
        Some(Contribution::new(deltas, parts.join(", ")))
    }
}

pub struct TattvaContributor;

impl Contributor for TattvaContributor {
    fn name(&self) -> &'static str {
        "tattva"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let element = ctx.tattva.element();
        if element == Element::Spirit {
            return None;
        }
        Some(Contribution::new(
            ElementDeltas::single(element, 8.0),
            format!("{} tattva ({} +8)", ctx.tattva, element),
        ))
    }
}

/// Planet → element used for hour rulers. Distinct from sign elements.
pub fn hour_element(body: Body) -> Element {
    match body {
        Body::Saturn => Element::Earth,
        Body::Sun | Body::Mars => Element::Fire,
        Body::Jupiter | Body::Mercury => Element::Air,
        Body::Moon | Body::Venus => Element::Water,
    }
}

pub struct HourContributor;

impl Contributor for HourContributor {
    fn name(&self) -> &'static str {
        "planetary_hour"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let element = hour_element(ctx.hour.ruler);
        let approx = if ctx.hour.approximate { ", approximate" } else { "" };
        Some(Contribution::new(
            ElementDeltas::single(element, 6.0),
            format!("hour of {}{} ({} +6)", ctx.hour.ruler, approx, element),
        ))
    }
}

pub struct EnvironmentContributor;

impl Contributor for EnvironmentContributor {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn contribute(&self, _ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        Some(Contribution::new(
            ElementDeltas {
                fire: 4.0,
                earth: 15.0,
                air: 6.0,
                water: 8.0,
                spirit: 0.0,
            },
            "terrestrial baseline",
        ))
    }
}

pub struct LatitudeContributor;

impl LatitudeContributor {
    /// (fire, water) for an absolute latitude; zero crossing at 45°.
    pub fn tradeoff(latitude: f64) -> (f64, f64) {
        let fire = 10.0 * (1.0 - latitude.abs().min(90.0) / 45.0);
        (fire, -fire / 2.0)
    }
}

impl Contributor for LatitudeContributor {
    fn name(&self) -> &'static str {
        "latitude"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let location = ctx.location?;
        let (fire, water) = Self::tradeoff(location.latitude);
        Some(Contribution::new(
            ElementDeltas {
                fire,
                water,
                ..ElementDeltas::ZERO
            },
            format!("latitude {:.1}°", location.latitude),
        ))
    }
}

pub struct DiurnalContributor;

impl Contributor for DiurnalContributor {
    fn name(&self) -> &'static str {
        "diurnal"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let hour = ctx.instant.hour();
        if (9..16).contains(&hour) {
            Some(Contribution::new(
                ElementDeltas::single(Element::Fire, 8.0),
                format!("daytime ({:02}:00 local)", hour),
            ))
        } else if hour >= 20 || hour < 3 {
            Some(Contribution::new(
                ElementDeltas::single(Element::Water, 8.0),
                format!("night-time ({:02}:00 local)", hour),
            ))
        } else {
            None
        }
    }
}

pub struct SeasonContributor;

impl SeasonContributor {
    /// Season name and element for a month, by hemisphere.
    pub fn season(month: u32, southern: bool) -> (&'static str, Element) {
        let month = if southern { (month + 5) % 12 + 1 } else { month };
        match month {
            3..=5 => ("spring", Element::Air),
            6..=8 => ("summer", Element::Fire),
            9..=11 => ("autumn", Element::Earth),
            _ => ("winter", Element::Water),
        }
    }
}

impl Contributor for SeasonContributor {
    fn name(&self) -> &'static str {
        "season"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let southern = ctx.location.map(|l| l.is_southern()).unwrap_or(false);
        let (name, element) = Self::season(ctx.instant.month(), southern);
        let hemisphere = if southern { "southern" } else { "northern" };
        Some(Contribution::new(
            ElementDeltas::single(element, 10.0),
            format!("{} {} ({} +10)", hemisphere, name, element),
        ))
    }
}

pub struct WeatherContributor;

impl WeatherContributor {
    pub fn deltas(weather: Weather) -> ElementDeltas {
        let (fire, earth, air, water) = match weather {
            Weather::Clear => (15.0, 0.0, 5.0, 0.0),
            Weather::Clouds => (-5.0, 0.0, 8.0, 5.0),
            Weather::Rain => (-8.0, 5.0, 0.0, 18.0),
            Weather::Drizzle => (0.0, 0.0, 3.0, 10.0),
            Weather::Thunderstorm => (11.0, 0.0, 22.0, 22.0),
            Weather::Snow => (-12.0, 8.0, 0.0, 12.0),
            Weather::Mist => (0.0, 0.0, -5.0, 10.0),
            Weather::Fog => (0.0, 3.0, -6.0, 12.0),
            Weather::Haze => (0.0, 4.0, 6.0, -4.0),
            Weather::Wind => (0.0, -5.0, 20.0, 0.0),
            Weather::Tornado => (6.0, -8.0, 30.0, 0.0),
        };
        ElementDeltas {
            fire,
            earth,
            air,
            water,
            spirit: 0.0,
        }
    }
}

impl Contributor for WeatherContributor {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let weather = ctx.weather?;
        Some(Contribution::new(Self::deltas(weather), weather.name()))
    }
}

pub struct EventContributor;

impl EventContributor {
    pub fn deltas(kind: EventKind) -> ElementDeltas {
        let (fire, earth, air, water) = match kind {
            EventKind::SummerSolstice => (10.0, 0.0, 0.0, -3.0),
            EventKind::WinterSolstice => (-3.0, 0.0, 0.0, 10.0),
            EventKind::SpringEquinox | EventKind::AutumnEquinox => (0.0, 5.0, 5.0, 0.0),
            EventKind::MeteorShower => (5.0, 0.0, 5.0, 0.0),
            EventKind::SolarEclipse => (12.0, 0.0, 0.0, -6.0),
            EventKind::LunarEclipse => (-6.0, 0.0, 0.0, 12.0),
            EventKind::PlanetaryAlignment => (0.0, 5.0, 5.0, 0.0),
        };
        ElementDeltas {
            fire,
            earth,
            air,
            water,
            spirit: 0.0,
        }
    }
}

impl Contributor for EventContributor {
    fn name(&self) -> &'static str {
        "events"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let mut deltas = ElementDeltas::ZERO;
        let mut names = Vec::new();
        for event in ctx.active_events() {
            deltas += Self::deltas(event.kind);
            names.push(event.name.as_str());
        }
        if names.is_empty() {
            return None;
        }
        Some(Contribution::new(deltas, names.join(", ")))
    }
}

// Spirit sources

pub const SPIRIT_BASE: f64 = 10.0;

pub struct SpiritSeed;

impl Contributor for SpiritSeed {
    fn name(&self) -> &'static str {
        "spirit_seed"
    }

    fn contribute(&self, _ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        Some(Contribution::new(ElementDeltas::spirit(SPIRIT_BASE), "spirit base"))
    }
}

pub struct AlignmentSpiritContributor;

impl AlignmentSpiritContributor {
    pub fn spirit_for(alignment: &Alignment) -> f64 {
        let n = alignment.bodies.len() as f64;
        match alignment.kind {
            AlignmentKind::Conjunction => 3.0 * n,
            AlignmentKind::Linear => 2.0 * n,
            AlignmentKind::Opposition => -2.0 * n,
            AlignmentKind::Stellium => 8.0,
        }
    }
}

impl Contributor for AlignmentSpiritContributor {
    fn name(&self) -> &'static str {
        "alignments"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        if ctx.alignments.is_empty() {
            return None;
        }
        let total: f64 = ctx.alignments.iter().map(Self::spirit_for).sum();
        let count = |kind: AlignmentKind| ctx.alignments.iter().filter(|a| a.kind == kind).count();
        Some(Contribution::new(
            ElementDeltas::spirit(total),
            format!(
                "{} conjunction(s), {} opposition(s), {} linear, {} stellium(s)",
                count(AlignmentKind::Conjunction),
                count(AlignmentKind::Opposition),
                count(AlignmentKind::Linear),
                count(AlignmentKind::Stellium)
            ),
        ))
    }
}

pub struct AkashaContributor;

impl Contributor for AkashaContributor {
    fn name(&self) -> &'static str {
        "akasha"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        (ctx.tattva == Tattva::Akasha)
            .then(|| Contribution::new(ElementDeltas::spirit(10.0), "Akasha tattva (Spirit +10)"))
    }
}

pub struct EventSpiritContributor;

impl EventSpiritContributor {
    pub fn spirit_for(kind: EventKind) -> f64 {
        match kind {
            EventKind::SummerSolstice | EventKind::WinterSolstice => 8.0,
            EventKind::SpringEquinox | EventKind::AutumnEquinox => 10.0,
            EventKind::MeteorShower => 6.0,
            EventKind::SolarEclipse | EventKind::LunarEclipse => 15.0,
            EventKind::PlanetaryAlignment => 12.0,
        }
    }
}

impl Contributor for EventSpiritContributor {
    fn name(&self) -> &'static str {
        "event_spirit"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let mut total = 0.0;
        let mut names = Vec::new();
        for event in ctx.active_events() {
            total += Self::spirit_for(event.kind);
            names.push(event.name.as_str());
        }
        if names.is_empty() {
            return None;
        }
        Some(Contribution::new(ElementDeltas::spirit(total), names.join(", ")))
    }
}

pub struct HourSpiritContributor;

impl Contributor for HourSpiritContributor {
    fn name(&self) -> &'static str {
        "hour_spirit"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let bonus = match ctx.hour.ruler {
            Body::Saturn => 5.0,
            Body::Jupiter => 4.0,
            Body::Sun | Body::Moon => 3.0,
            _ => return None,
        };
        Some(Contribution::new(
            ElementDeltas::spirit(bonus),
            format!("hour of {}", ctx.hour.ruler),
        ))
    }
}

pub struct BalanceContributor;

impl BalanceContributor {
    pub const MAX_BONUS: f64 = 10.0;
    pub const RANGE_LIMIT: f64 = 0.15;

    /// Bonus for a relative range `(max - min) / max` over physical totals.
    pub fn bonus(totals: &ElementDeltas) -> f64 {
        let (min, max) = totals.physical_range();
        if max <= 0.0 {
            return 0.0;
        }
        let relative = (max - min) / max;
        if relative < Self::RANGE_LIMIT {
            Self::MAX_BONUS * (1.0 - relative / Self::RANGE_LIMIT)
        } else {
            0.0
        }
    }
}

impl Contributor for BalanceContributor {
    fn name(&self) -> &'static str {
        "balance"
    }

    fn contribute(&self, _ctx: &ProfileContext<'_>, running: &ElementDeltas) -> Option<Contribution> {
        let bonus = Self::bonus(running);
        (bonus > 0.0).then(|| {
            Contribution::new(
                ElementDeltas::spirit(bonus),
                format!("elements within {:.0}% of each other", Self::RANGE_LIMIT * 100.0),
            )
        })
    }
}

pub struct AfflictionContributor;

impl Contributor for AfflictionContributor {
    fn name(&self) -> &'static str {
        "afflictions"
    }

    fn contribute(&self, ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        let detriments = ctx
            .placements
            .iter()
            .filter(|p| p.dignity == Dignity::Detriment)
            .count();
        let retrogrades = ctx.placements.iter().filter(|p| p.retrograde).count();
        if detriments == 0 && retrogrades == 0 {
            return None;
        }
        let penalty = -3.0 * detriments as f64 - 2.0 * retrogrades as f64;
        Some(Contribution::new(
            ElementDeltas::spirit(penalty),
            format!("{} in detriment, {} retrograde", detriments, retrogrades),
        ))
    }
}
