pub mod hours;
pub mod tattva;

pub use hours::{
    approximate_planetary_hour, chaldean_walk, day_ruler, day_ruler_for, planetary_hour,
    PlanetaryHour, SolarFrame, CHALDEAN_ORDER,
};
pub use tattva::{tattva_at, Tattva};
