//! Astrolabe: astrological computation engine.
//!
//! Turns an instant, an optional location and optional weather into sign
//! placements, dignities, planetary hours, houses, lunar phase, alignments,
//! calendar events and a weighted elemental profile.

pub mod alignments;
pub mod almanac;
pub mod chart;
pub mod elemental;
pub mod ephemeris;
pub mod error;
pub mod geocode;
pub mod houses;
pub mod lunar;
pub mod temporal;
pub mod western;
pub mod zodiac;

pub use alignments::{detect_alignments, Alignment, AlignmentDetector, AlignmentKind};
pub use almanac::{upcoming_events, EventKind, UpcomingEvent};
pub use chart::{AstroEngine, ChartReport, ChartRequest};
pub use elemental::{ElementalEngine, ElementalProfile, Weather};
pub use ephemeris::{
    Body, Ephemeris, EphemerisError, EphemerisHandle, HouseSystem, Location, SwissEphemerisAdapter,
};
pub use error::AstroError;
pub use geocode::{GeocodeError, Geocoder, ZippopotamGeocoder};
pub use houses::HouseCusps;
pub use lunar::{moon_phase, MoonPhase, MoonPhaseInfo};
pub use temporal::{PlanetaryHour, Tattva};
pub use western::{dignity_of, BodyPlacement, Dignity};
pub use zodiac::{longitude_to_sign, Element, ZodiacSign};
