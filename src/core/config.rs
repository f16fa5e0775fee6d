//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.roadside/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::geo::SpanDeltas;
use crate::location::PositionOptions;
use crate::services::providers::directions::DEFAULT_DIRECTIONS_BASE_URL;
use crate::services::providers::places::{DEFAULT_FUEL_TYPE, DEFAULT_PLACES_BASE_URL};
use crate::services::providers::yelp::{DEFAULT_FOOD_TERM, DEFAULT_YELP_BASE_URL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoadsideConfig {
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CredentialsConfig {
    pub yelp_api_key: Option<String>,
    pub places_api_key: Option<String>,
    pub directions_api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointsConfig {
    pub yelp_base_url: Option<String>,
    pub places_base_url: Option<String>,
    pub directions_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    pub radius_meters: Option<u32>,
    pub food_term: Option<String>,
    pub fuel_type: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MapConfig {
    pub latitude_delta: Option<f64>,
    pub aspect_ratio: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NetworkConfig {
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LocationConfig {
    pub high_accuracy: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub max_age_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_RADIUS_METERS: u32 = 8500;
pub const DEFAULT_LATITUDE_DELTA: f64 = 0.0922;
pub const DEFAULT_ASPECT_RATIO: f64 = 0.5625;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_LOCATION_MAX_AGE_MS: u64 = 1_000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub yelp_api_key: Option<String>,
    pub places_api_key: Option<String>,
    pub directions_api_key: Option<String>,
    pub yelp_base_url: String,
    pub places_base_url: String,
    pub directions_base_url: String,
    pub radius_meters: u32,
    pub food_term: String,
    pub fuel_type: String,
    pub deltas: SpanDeltas,
    pub request_timeout: Duration,
    pub position_options: PositionOptions,
}

/// The three provider secrets, checked present and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub yelp_api_key: String,
    pub places_api_key: String,
    pub directions_api_key: String,
}

impl ResolvedConfig {
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials {
            yelp_api_key: require(&self.yelp_api_key, "YELP_API_KEY")?,
            places_api_key: require(&self.places_api_key, "GOOGLE_PLACES_KEY")?,
            directions_api_key: require(&self.directions_api_key, "GOOGLE_DIRECTIONS_KEY")?,
        })
    }
}

fn require(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::MissingCredential(name)),
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    MissingCredential(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingCredential(name) => write!(
                f,
                "missing credential {name} (set it in the environment or ~/.roadside/config.toml)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.roadside/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".roadside").join("config.toml"))
}

/// Load config from `~/.roadside/config.toml`, or from `path` when given.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `RoadsideConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<RoadsideConfig, ConfigError> {
    let path = match path.map(Path::to_path_buf).or_else(config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RoadsideConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RoadsideConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: RoadsideConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Search: {:?}, map: {:?}", config.search, config.map);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Roadside Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [credentials]
# yelp_api_key = "..."               # Or set YELP_API_KEY
# places_api_key = "..."             # Or set GOOGLE_PLACES_KEY
# directions_api_key = "..."         # Or set GOOGLE_DIRECTIONS_KEY

# [endpoints]
# yelp_base_url = "https://api.yelp.com/v3"
# places_base_url = "https://maps.googleapis.com/maps/api/place"
# directions_base_url = "https://maps.googleapis.com/maps/api/directions"

# [search]
# radius_meters = 8500
# food_term = "food"
# fuel_type = "gas_station"

# [map]
# latitude_delta = 0.0922
# aspect_ratio = 0.5625              # viewport width / height

# [network]
# request_timeout_secs = 10

# [location]
# high_accuracy = true
# timeout_ms = 20000
# max_age_ms = 1000
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_radius` comes from the `--radius` flag (None = not specified).
pub fn resolve(config: &RoadsideConfig, cli_radius: Option<u32>) -> ResolvedConfig {
    resolve_with(config, cli_radius, |name| std::env::var(name).ok())
}

/// `resolve` with an injectable environment lookup.
pub fn resolve_with(
    config: &RoadsideConfig,
    cli_radius: Option<u32>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Credentials: env → config
    let yelp_api_key = env("YELP_API_KEY").or_else(|| config.credentials.yelp_api_key.clone());
    let places_api_key =
        env("GOOGLE_PLACES_KEY").or_else(|| config.credentials.places_api_key.clone());
    let directions_api_key =
        env("GOOGLE_DIRECTIONS_KEY").or_else(|| config.credentials.directions_api_key.clone());

    // Endpoints: env → config → default
    let yelp_base_url = env("YELP_BASE_URL")
        .or_else(|| config.endpoints.yelp_base_url.clone())
        .unwrap_or_else(|| DEFAULT_YELP_BASE_URL.to_string());
    let places_base_url = env("PLACES_BASE_URL")
        .or_else(|| config.endpoints.places_base_url.clone())
        .unwrap_or_else(|| DEFAULT_PLACES_BASE_URL.to_string());
    let directions_base_url = env("DIRECTIONS_BASE_URL")
        .or_else(|| config.endpoints.directions_base_url.clone())
        .unwrap_or_else(|| DEFAULT_DIRECTIONS_BASE_URL.to_string());

    // Radius: CLI → config → default
    let radius_meters = cli_radius
        .or(config.search.radius_meters)
        .unwrap_or(DEFAULT_RADIUS_METERS);

    let deltas = SpanDeltas::from_aspect_ratio(
        config.map.latitude_delta.unwrap_or(DEFAULT_LATITUDE_DELTA),
        config.map.aspect_ratio.unwrap_or(DEFAULT_ASPECT_RATIO),
    );

    let position_options = PositionOptions {
        enable_high_accuracy: config.location.high_accuracy.unwrap_or(true),
        timeout: Duration::from_millis(
            config
                .location
                .timeout_ms
                .unwrap_or(DEFAULT_LOCATION_TIMEOUT_MS),
        ),
        maximum_age: Duration::from_millis(
            config
                .location
                .max_age_ms
                .unwrap_or(DEFAULT_LOCATION_MAX_AGE_MS),
        ),
    };

    ResolvedConfig {
        yelp_api_key,
        places_api_key,
        directions_api_key,
        yelp_base_url,
        places_base_url,
        directions_base_url,
        radius_meters,
        food_term: config
            .search
            .food_term
            .clone()
            .unwrap_or_else(|| DEFAULT_FOOD_TERM.to_string()),
        fuel_type: config
            .search
            .fuel_type
            .clone()
            .unwrap_or_else(|| DEFAULT_FUEL_TYPE.to_string()),
        deltas,
        request_timeout: Duration::from_secs(
            config
                .network
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        position_options,
    }
}
