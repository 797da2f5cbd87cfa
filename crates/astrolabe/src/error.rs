use crate::ephemeris::EphemerisError;
use crate::geocode::GeocodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AstroError {
    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),

    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Position task failed: {message}")]
    Task { message: String },
}

pub type Result<T> = std::result::Result<T, AstroError>;
