use anyhow::Context;
use astrolabe::almanac::{EventKind, UpcomingEvent};
use astrolabe::geocode::{Geocoder, ZippopotamGeocoder};
use astrolabe::{AstroEngine, ChartRequest, EphemerisHandle, HouseSystem, Location, Weather};
use astrolabe_config::{validate_coordinates, AstrolabeSettings};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "astrolabe")]
#[command(about = "Compute an astrological chart report as JSON")]
struct Args {
    /// Path to configuration file (defaults to configs/astrolabe.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Instant to chart, RFC 3339 (defaults to now)
    #[arg(long)]
    at: Option<String>,

    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    /// Postal code to geocode when no coordinates are given
    #[arg(long)]
    postal_code: Option<String>,

    /// Weather condition, e.g. Clear, Rain, Thunderstorm
    #[arg(long)]
    weather: Option<String>,

    #[arg(long)]
    house_system: Option<String>,

    /// Directory holding the Swiss Ephemeris data files
    #[arg(long)]
    ephemeris_path: Option<PathBuf>,

    /// Offset used when --at is not given
    #[arg(long, allow_negative_numbers = true)]
    utc_offset_minutes: Option<i32>,

    #[arg(long)]
    horizon_days: Option<i64>,

    /// Extra event as kind=YYYY-MM-DD, e.g. solar_eclipse=2024-04-08
    #[arg(long = "event")]
    events: Vec<String>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<AstrolabeSettings> {
    match path {
        Some(p) => astrolabe_config::load_settings_from(p),
        None => match astrolabe_config::load_settings() {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::info!("{e}; using default settings");
                Ok(AstrolabeSettings::default())
            }
        },
    }
}

fn parse_event(arg: &str) -> anyhow::Result<UpcomingEvent> {
    let (kind, date) = arg
        .split_once('=')
        .with_context(|| format!("event {arg:?} is not kind=YYYY-MM-DD"))?;
    let kind: EventKind = serde_json::from_value(serde_json::Value::String(kind.trim().to_string()))
        .with_context(|| format!("unknown event kind {kind:?}"))?;
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid event date {date:?}"))?;
    let name = serde_json::to_value(kind)?
        .as_str()
        .unwrap_or_default()
        .split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Ok(UpcomingEvent::new(kind, name, date, "supplied on the command line"))
}

async fn geocode(settings: &AstrolabeSettings, code: &str) -> anyhow::Result<Option<Location>> {
    let geocoder = ZippopotamGeocoder::new(&settings.geocoder.base_url, &settings.geocoder.country);
    let found = geocoder.postal_code_to_location(code).await?;
    if found.is_none() {
        log::warn!("postal code {} not found, continuing without a location", code);
    }
    Ok(found)
}

async fn resolve_location(args: &Args, settings: &AstrolabeSettings) -> anyhow::Result<Option<Location>> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        validate_coordinates(lat, lon)?;
        return Ok(Some(Location::new(lat, lon)));
    }
    if let Some(code) = &args.postal_code {
        return geocode(settings, code).await;
    }
    if let Some(loc) = &settings.location {
        let mut location = Location::new(loc.latitude, loc.longitude);
        location.postal_code = loc.postal_code.clone();
        return Ok(Some(location));
    }
    match &settings.postal_code {
        Some(code) => geocode(settings, code).await,
        None => Ok(None),
    }
}

fn resolve_instant(args: &Args, settings: &AstrolabeSettings) -> anyhow::Result<DateTime<FixedOffset>> {
    if let Some(at) = &args.at {
        return DateTime::parse_from_rfc3339(at).with_context(|| format!("invalid --at {at:?}"));
    }
    let minutes = args
        .utc_offset_minutes
        .unwrap_or(settings.chart.utc_offset_minutes);
    let offset = FixedOffset::east_opt(minutes * 60)
        .with_context(|| format!("UTC offset out of range: {minutes} minutes"))?;
    Ok(Utc::now().with_timezone(&offset))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let settings = load_settings(args.config.as_ref())?;

    let house_system: HouseSystem = args
        .house_system
        .as_deref()
        .unwrap_or(&settings.ephemeris.house_system)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let ephemeris_path = args.ephemeris_path.clone().or(settings.ephemeris.path.clone());
    let horizon = args.horizon_days.unwrap_or(settings.chart.event_horizon_days);

    let instant = resolve_instant(&args, &settings)?;
    let location = resolve_location(&args, &settings).await?;

    let mut request = ChartRequest::new(instant);
    if let Some(location) = location {
        request = request.with_location(location);
    }
    if let Some(raw) = args.weather.as_ref().or(settings.chart.weather.as_ref()) {
        match raw.parse::<Weather>() {
            Ok(weather) => request = request.with_weather(weather),
            Err(e) => log::warn!("{}; ignoring weather", e),
        }
    }
    for arg in &args.events {
        request = request.with_event(parse_event(arg)?);
    }

    log::info!(
        "charting {} ({})",
        instant,
        request
            .location
            .as_ref()
            .map(|l| format!("{:.4}, {:.4}", l.latitude, l.longitude))
            .unwrap_or_else(|| "no location".to_string())
    );

    let handle = EphemerisHandle::new(ephemeris_path, house_system);
    let engine = AstroEngine::new(handle).with_event_horizon_days(horizon);
    let report = engine.compute(&request).await?;

    log::info!(
        "dominant element {}, hour of {}, {}",
        report.elemental.dominant(),
        report.planetary_hour.ruler,
        report.moon_phase.phase
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}
