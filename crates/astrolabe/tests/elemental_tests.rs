use astrolabe::alignments::{detect_alignments, Alignment, AlignmentKind};
use astrolabe::almanac::{EventKind, UpcomingEvent};
use astrolabe::elemental::*;
use astrolabe::ephemeris::{Body, Location};
use astrolabe::temporal::{PlanetaryHour, Tattva};
use astrolabe::western::BodyPlacement;
use astrolabe::zodiac::Element;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

const TOLERANCE: f64 = 1e-9;

fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
}

fn hour(ruler: Body) -> PlanetaryHour {
    PlanetaryHour {
        ruler,
        day_ruler: ruler,
        hour_index: 0,
        is_day: true,
        approximate: false,
    }
}

fn sample_placements() -> Vec<BodyPlacement> {
    vec![
        BodyPlacement::new(Body::Sun, 135.0, false),
        BodyPlacement::new(Body::Moon, 290.0, false),
        BodyPlacement::new(Body::Mercury, 140.0, true),
        BodyPlacement::new(Body::Venus, 20.0, false),
        BodyPlacement::new(Body::Mars, 200.0, false),
        BodyPlacement::new(Body::Jupiter, 65.0, false),
        BodyPlacement::new(Body::Saturn, 330.0, true),
    ]
}

fn assert_breakdown_sums(profile: &ElementalProfile) {
    let mut sum = BASE;
    for entry in &profile.breakdown {
        sum += entry.deltas;
    }
    assert!((sum.fire - profile.fire).abs() < TOLERANCE, "fire {} vs {}", sum.fire, profile.fire);
    assert!((sum.earth - profile.earth).abs() < TOLERANCE);
    assert!((sum.air - profile.air).abs() < TOLERANCE);
    assert!((sum.water - profile.water).abs() < TOLERANCE);
    assert!((sum.spirit - profile.spirit).abs() < TOLERANCE);
}

#[test]
fn test_breakdown_invariant_across_inputs() {
    let placements = sample_placements();
    let alignments = detect_alignments(&placements);
    let events = vec![
        UpcomingEvent::new(
            EventKind::SummerSolstice,
            "Summer Solstice",
            NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            "",
        ),
        UpcomingEvent::new(
            EventKind::LunarEclipse,
            "Lunar Eclipse",
            NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            "",
        ),
    ];
    let locations = [
        None,
        Some(Location::new(0.0, 0.0)),
        Some(Location::new(-33.9, 151.2)),
        Some(Location::new(78.2, 15.6)),
    ];

    for location in &locations {
        for weather in std::iter::once(None).chain(Weather::ALL.iter().copied().map(Some)) {
            for tattva in Tattva::CYCLE {
                for h in [1, 10, 17, 22] {
                    let ctx = ProfileContext {
                        instant: local(2024, 6, 21, h),
                        location: location.as_ref(),
                        placements: &placements,
                        alignments: &alignments,
                        hour: hour(Body::Saturn),
                        tattva,
                        weather,
                        events: &events,
                    };
                    let profile = elemental_profile(&ctx);
                    assert_breakdown_sums(&profile);
                    assert!(profile.fire >= 0.0 && profile.water >= 0.0);
                    assert!(profile.spirit >= 0.0);
                }
            }
        }
    }
}

#[test]
fn test_thunderstorm_entry() {
    let ctx = ProfileContext {
        instant: local(2024, 4, 2, 17),
        location: None,
        placements: &[],
        alignments: &[],
        hour: hour(Body::Venus),
        tattva: Tattva::Apas,
        weather: Some("ThunderStorm".parse().unwrap()),
        events: &[],
    };
    let profile = elemental_profile(&ctx);
    let entry = profile.entry("weather").expect("weather entry");
    assert_eq!(entry.deltas.water, 22.0);
    assert_eq!(entry.deltas.air, 22.0);
    assert_eq!(entry.deltas.fire, 11.0);
    assert_eq!(entry.deltas.earth, 0.0);
    assert_eq!(entry.deltas.spirit, 0.0);
}

#[test]
fn test_sources_appear_in_registry_order() {
    let placements = sample_placements();
    let location = Location::new(10.0, 0.0);
    let ctx = ProfileContext {
        instant: local(2024, 1, 10, 12),
        location: Some(&location),
        placements: &placements,
        alignments: &[],
        hour: hour(Body::Jupiter),
        tattva: Tattva::Akasha,
        weather: Some(Weather::Rain),
        events: &[],
    };
    let profile = elemental_profile(&ctx);
    let sources: Vec<&str> = profile.breakdown.iter().map(|e| e.source.as_str()).collect();
    assert_eq!(
        sources,
        vec![
            "placements",
            "planetary_hour",
            "environment",
            "latitude",
            "diurnal",
            "season",
            "weather",
            "spirit_seed",
            "akasha",
            "hour_spirit",
            "balance",
            "afflictions",
        ]
    );
    assert_eq!(profile.moon_sign, Some(astrolabe::zodiac::ZodiacSign::Capricorn));
    assert_eq!(profile.hour_ruler, Body::Jupiter);
}

#[test]
fn test_spirit_sources() {
    let placements = sample_placements();
    let ctx = ProfileContext {
        instant: local(2024, 1, 10, 18),
        location: None,
        placements: &placements,
        alignments: &[],
        hour: hour(Body::Saturn),
        tattva: Tattva::Akasha,
        weather: None,
        events: &[],
    };
    let profile = elemental_profile(&ctx);
    // Moon, Venus, Mars and Jupiter sit in detriment; Mercury and Saturn
    // are retrograde
    assert_eq!(profile.entry("afflictions").unwrap().deltas.spirit, -16.0);
    assert_eq!(profile.entry("akasha").unwrap().deltas.spirit, 10.0);
    assert_eq!(profile.entry("hour_spirit").unwrap().deltas.spirit, 5.0);
}

#[test]
fn test_active_event_deltas() {
    let eclipse_day = NaiveDate::from_ymd_opt(2024, 4, 8).unwrap();
    let events = vec![
        UpcomingEvent::new(EventKind::SolarEclipse, "Solar Eclipse", eclipse_day, ""),
        UpcomingEvent::new(EventKind::MeteorShower, "Lyrids", NaiveDate::from_ymd_opt(2024, 4, 22).unwrap(), ""),
    ];
    let ctx = ProfileContext {
        instant: local(2024, 4, 8, 18),
        location: None,
        placements: &[],
        alignments: &[],
        hour: hour(Body::Mars),
        tattva: Tattva::Tejas,
        weather: None,
        events: &events,
    };
    let profile = elemental_profile(&ctx);
    let physical = profile.entry("events").unwrap();
    assert_eq!(physical.deltas.fire, 12.0);
    assert_eq!(physical.deltas.water, -6.0);
    assert_eq!(physical.detail, "Solar Eclipse");
    assert_eq!(profile.entry("event_spirit").unwrap().deltas.spirit, 15.0);
}

struct Sunshine;

impl Contributor for Sunshine {
    fn name(&self) -> &'static str {
        "sunshine"
    }

    fn contribute(&self, _ctx: &ProfileContext<'_>, _running: &ElementDeltas) -> Option<Contribution> {
        Some(Contribution::new(ElementDeltas::single(Element::Fire, 3.0), "extra"))
    }
}

#[test]
fn test_custom_contributor_is_appended() {
    let engine = ElementalEngine::default().with_contributor(Sunshine);
    assert_eq!(engine.contributor_names().last(), Some(&"sunshine"));

    let ctx = ProfileContext {
        instant: local(2024, 4, 2, 17),
        location: None,
        placements: &[],
        alignments: &[],
        hour: hour(Body::Venus),
        tattva: Tattva::Apas,
        weather: None,
        events: &[],
    };
    let with = engine.compute(&ctx);
    let without = ElementalEngine::default().compute(&ctx);
    assert_eq!(with.fire - without.fire, 3.0);
    assert_breakdown_sums(&with);
}

#[test]
fn test_diurnal_window_edges() {
    let cases = [
        (8, 0, None),
        (9, 0, Some(ElementDeltas::single(Element::Fire, 8.0))),
        (15, 59, Some(ElementDeltas::single(Element::Fire, 8.0))),
        (16, 0, None),
        (19, 59, None),
        (20, 0, Some(ElementDeltas::single(Element::Water, 8.0))),
        (0, 0, Some(ElementDeltas::single(Element::Water, 8.0))),
        (2, 59, Some(ElementDeltas::single(Element::Water, 8.0))),
        (3, 0, None),
    ];
    for (h, m, expected) in cases {
        let instant = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, h, m, 0)
            .unwrap();
        let ctx = ProfileContext {
            instant,
            location: None,
            placements: &[],
            alignments: &[],
            hour: hour(Body::Mars),
            tattva: Tattva::Vayu,
            weather: None,
            events: &[],
        };
        let profile = elemental_profile(&ctx);
        let actual = profile.entry("diurnal").map(|e| e.deltas);
        assert_eq!(actual, expected, "{:02}:{:02}", h, m);
    }
}

#[test]
fn test_running_spirit_is_floored_before_later_bonuses() {
    let pairs = [
        (Body::Sun, Body::Saturn),
        (Body::Moon, Body::Mars),
        (Body::Venus, Body::Jupiter),
    ];
    let oppositions: Vec<Alignment> = pairs
        .iter()
        .map(|(a, b)| Alignment {
            bodies: vec![*a, *b],
            kind: AlignmentKind::Opposition,
            description: String::new(),
            strength: 100,
        })
        .collect();
    let ctx = ProfileContext {
        instant: local(2024, 5, 1, 17),
        location: None,
        placements: &[],
        alignments: &oppositions,
        hour: hour(Body::Mars),
        tattva: Tattva::Akasha,
        weather: None,
        events: &[],
    };
    let profile = elemental_profile(&ctx);

    // seed 10, three oppositions -12, floored to 0, then Akasha +10
    assert_eq!(profile.entry("alignments").unwrap().deltas.spirit, -12.0);
    assert_eq!(profile.entry("spirit_floor").unwrap().deltas.spirit, 2.0);
    assert_eq!(profile.spirit, 10.0);
    let sources: Vec<&str> = profile.breakdown.iter().map(|e| e.source.as_str()).collect();
    let floor_at = sources.iter().position(|s| *s == "spirit_floor").unwrap();
    assert_eq!(sources[floor_at - 1], "alignments");
    assert_eq!(sources[floor_at + 1], "akasha");
    assert_breakdown_sums(&profile);
}
