//! Postal code → coordinates lookup.

use crate::ephemeris::Location;
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.zippopotam.us";
pub const DEFAULT_COUNTRY: &str = "us";

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Malformed postal code: {0:?}")]
    InvalidPostalCode(String),

    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoding service returned status {status}")]
    Status { status: u16 },

    #[error("Unexpected geocoding response: {message}")]
    InvalidResponse { message: String },
}

/// Looks up coordinates for a postal code. `Ok(None)` means the service
/// knows of no such code.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn postal_code_to_location(&self, code: &str) -> Result<Option<Location>, GeocodeError>;
}

fn postal_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9 -]{0,8}[A-Za-z0-9])?$")
            .expect("postal code pattern is valid")
    })
}

/// Letters, digits, inner spaces or hyphens; 1 to 10 characters.
pub fn is_valid_postal_code(code: &str) -> bool {
    postal_code_pattern().is_match(code)
}

#[derive(Debug, Deserialize)]
struct ZippopotamResponse {
    #[serde(default)]
    places: Vec<ZippopotamPlace>,
}

#[derive(Debug, Deserialize)]
struct ZippopotamPlace {
    latitude: String,
    longitude: String,
}

/// Client for zippopotam.us style services: `GET {base}/{country}/{code}`.
#[derive(Debug, Clone)]
pub struct ZippopotamGeocoder {
    client: Client,
    base_url: String,
    country: String,
}

impl Default for ZippopotamGeocoder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_COUNTRY)
    }
}

impl ZippopotamGeocoder {
    pub fn new(base_url: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country: country.into(),
        }
    }

    pub fn url_for(&self, code: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.country, code)
    }
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64, GeocodeError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| GeocodeError::InvalidResponse {
            message: format!("{} {:?}: {}", field, value, e),
        })
}

#[async_trait]
impl Geocoder for ZippopotamGeocoder {
    async fn postal_code_to_location(&self, code: &str) -> Result<Option<Location>, GeocodeError> {
        let code = code.trim();
        if !is_valid_postal_code(code) {
            return Err(GeocodeError::InvalidPostalCode(code.to_string()));
        }

        let url = self.url_for(code);
        log::debug!("geocoding {} via {}", code, url);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("postal code {} not found", code);
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(GeocodeError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: ZippopotamResponse = response.json().await?;
        let Some(place) = body.places.first() else {
            return Ok(None);
        };

        let latitude = parse_coordinate("latitude", &place.latitude)?;
        let longitude = parse_coordinate("longitude", &place.longitude)?;
        Ok(Some(Location::new(latitude, longitude).with_postal_code(code)))
    }
}
