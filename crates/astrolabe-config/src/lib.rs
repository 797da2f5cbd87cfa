use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_GEOCODER_URL: &str = "https://api.zippopotam.us";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_HOUSE_SYSTEM: &str = "placidus";
pub const DEFAULT_EVENT_HORIZON_DAYS: i64 = 365;

/// Largest UTC offset accepted, in minutes.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSettings {
    /// Falls back to `SWISS_EPHEMERIS_PATH`, then the system default
    pub path: Option<PathBuf>,
    pub house_system: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderSettings {
    pub base_url: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub utc_offset_minutes: i32,
    pub event_horizon_days: i64,
    pub weather: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstrolabeSettings {
    /// Coordinates, when configured
    pub location: Option<LocationSettings>,
    /// Postal code to geocode when no coordinates are configured
    pub postal_code: Option<String>,
    pub ephemeris: EphemerisSettings,
    pub geocoder: GeocoderSettings,
    pub chart: ChartSettings,
}

impl Default for AstrolabeSettings {
    fn default() -> Self {
        Self {
            location: None,
            postal_code: None,
            ephemeris: EphemerisSettings {
                path: None,
                house_system: DEFAULT_HOUSE_SYSTEM.to_string(),
            },
            geocoder: GeocoderSettings {
                base_url: DEFAULT_GEOCODER_URL.to_string(),
                country: DEFAULT_COUNTRY.to_string(),
            },
            chart: ChartSettings {
                utc_offset_minutes: 0,
                event_horizon_days: DEFAULT_EVENT_HORIZON_DAYS,
                weather: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LocationToml {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    house_system: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GeocoderToml {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ChartToml {
    #[serde(default)]
    utc_offset_minutes: Option<i32>,
    #[serde(default)]
    event_horizon_days: Option<i64>,
    #[serde(default)]
    weather: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    location: LocationToml,
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    geocoder: GeocoderToml,
    #[serde(default)]
    chart: ChartToml,
}

/// Try common relative paths for `configs/astrolabe.toml`.
pub fn read_config_toml_text() -> anyhow::Result<String> {
    let paths = ["configs/astrolabe.toml", "../../configs/astrolabe.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load astrolabe.toml from {:?}", paths);
}

pub fn parse_settings(text: &str) -> anyhow::Result<AstrolabeSettings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse astrolabe.toml: {e}"))?;
    let defaults = AstrolabeSettings::default();

    let LocationToml {
        latitude,
        longitude,
        postal_code,
    } = root.location;
    let location = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => {
            validate_coordinates(latitude, longitude)?;
            Some(LocationSettings {
                latitude,
                longitude,
                postal_code: postal_code.clone(),
            })
        }
        (None, None) => None,
        _ => anyhow::bail!("[location] needs both latitude and longitude, or neither"),
    };

    let utc_offset_minutes = root
        .chart
        .utc_offset_minutes
        .unwrap_or(defaults.chart.utc_offset_minutes);
    if utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
        anyhow::bail!("chart.utc_offset_minutes out of range: {utc_offset_minutes}");
    }
    let event_horizon_days = root
        .chart
        .event_horizon_days
        .unwrap_or(defaults.chart.event_horizon_days);
    if event_horizon_days < 0 {
        anyhow::bail!("chart.event_horizon_days must not be negative: {event_horizon_days}");
    }

    Ok(AstrolabeSettings {
        location,
        postal_code,
        ephemeris: EphemerisSettings {
            path: root.ephemeris.path,
            house_system: root
                .ephemeris
                .house_system
                .unwrap_or(defaults.ephemeris.house_system),
        },
        geocoder: GeocoderSettings {
            base_url: root.geocoder.base_url.unwrap_or(defaults.geocoder.base_url),
            country: root.geocoder.country.unwrap_or(defaults.geocoder.country),
        },
        chart: ChartSettings {
            utc_offset_minutes,
            event_horizon_days,
            weather: root.chart.weather,
        },
    })
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> anyhow::Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        anyhow::bail!("latitude out of range: {latitude}");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        anyhow::bail!("longitude out of range: {longitude}");
    }
    Ok(())
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<AstrolabeSettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_settings(&text)
}

pub fn load_settings() -> anyhow::Result<AstrolabeSettings> {
    let text = read_config_toml_text()?;
    parse_settings(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(parse_settings("").unwrap(), AstrolabeSettings::default());
    }

    #[test]
    fn test_full_file() {
        let text = r#"
[location]
latitude = 51.48
longitude = -0.0015
postal_code = "SE10"

[ephemeris]
path = "/opt/ephe"
house_system = "koch"

[geocoder]
base_url = "http://localhost:8080"
country = "gb"

[chart]
utc_offset_minutes = 60
event_horizon_days = 90
weather = "Rain"
"#;
        let settings = parse_settings(text).unwrap();
        let location = settings.location.unwrap();
        assert_eq!(location.latitude, 51.48);
        assert_eq!(location.postal_code.as_deref(), Some("SE10"));
        assert_eq!(settings.ephemeris.path, Some(PathBuf::from("/opt/ephe")));
        assert_eq!(settings.ephemeris.house_system, "koch");
        assert_eq!(settings.geocoder.country, "gb");
        assert_eq!(settings.chart.utc_offset_minutes, 60);
        assert_eq!(settings.chart.event_horizon_days, 90);
        assert_eq!(settings.chart.weather.as_deref(), Some("Rain"));
    }

    #[test]
    fn test_postal_code_only() {
        let settings = parse_settings("[location]\npostal_code = \"90210\"\n").unwrap();
        assert!(settings.location.is_none());
        assert_eq!(settings.postal_code.as_deref(), Some("90210"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(parse_settings("[location]\nlatitude = 10.0\n").is_err());
        assert!(parse_settings("[location]\nlatitude = 95.0\nlongitude = 0.0\n").is_err());
        assert!(parse_settings("[chart]\nutc_offset_minutes = 1200\n").is_err());
        assert!(parse_settings("[chart]\nevent_horizon_days = -1\n").is_err());
        assert!(parse_settings("[chart\n").is_err());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart]\nweather = \"Snow\"").unwrap();
        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.chart.weather.as_deref(), Some("Snow"));
        assert!(load_settings_from(Path::new("/nonexistent/astrolabe.toml")).is_err());
    }
}
