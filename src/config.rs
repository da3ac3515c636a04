//! TOML-based outlook configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::balance::DEFAULT_CAPACITY_FACTOR;
use crate::demand::DEFAULT_DEMAND_GROWTH_RATE;
use crate::error::ConfigError;
use crate::gateway::GatewayPolicy;
use crate::price::{
    DEFAULT_BASE_YEAR, DEFAULT_URBAN_POPULATION_THRESHOLD, DEFAULT_URBAN_PREMIUM, FORECAST_YEARS,
    PriceSettings,
};
use crate::profile::{DEFAULT_BASE_PRICE_CENTS, RegionProfileStore};

/// Environment variable consulted when `[noaa].token` is unset.
pub const NOAA_TOKEN_ENV: &str = "NOAA_API_TOKEN";
/// Environment variable consulted when `[eia].token` is unset.
pub const EIA_TOKEN_ENV: &str = "EIA_API_TOKEN";
/// Longest cache TTL accepted, one year.
pub const MAX_TTL_HOURS: u64 = 8760;

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset. Load from TOML
/// with [`OutlookConfig::from_toml_file`] or pick a preset with
/// [`OutlookConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutlookConfig {
    /// Balance, price and demand model parameters.
    pub engine: EngineConfig,
    /// Shared timeout, retry and cache settings for remote sources.
    pub gateway: GatewayConfig,
    /// Climate records service.
    pub noaa: NoaaConfig,
    /// Retail electricity sales service.
    pub eia: EiaConfig,
    /// Weather archive, forecast and climate model service.
    pub open_meteo: OpenMeteoConfig,
}

/// Balance, price and demand model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Share of nameplate capacity delivered over a year (0.0–1.0].
    pub capacity_factor: f64,
    /// Base price (¢/kWh) for regions without one.
    pub default_base_price: f64,
    /// Year price forecasts are measured from.
    pub base_year: i32,
    /// Price multiplier for urban localities (>= 1.0).
    pub urban_premium: f64,
    /// Locality population at which the urban premium applies.
    pub urban_population_threshold: u64,
    /// Demand growth applied when no weather summary is available.
    pub demand_growth_rate: f64,
    /// Optional profile table replacing the built-in one.
    pub profiles_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity_factor: DEFAULT_CAPACITY_FACTOR,
            default_base_price: DEFAULT_BASE_PRICE_CENTS,
            base_year: DEFAULT_BASE_YEAR,
            urban_premium: DEFAULT_URBAN_PREMIUM,
            urban_population_threshold: DEFAULT_URBAN_POPULATION_THRESHOLD,
            demand_growth_rate: DEFAULT_DEMAND_GROWTH_RATE,
            profiles_path: None,
        }
    }
}

impl EngineConfig {
    /// Price projector settings carried by this section.
    pub fn price_settings(&self) -> PriceSettings {
        PriceSettings {
            urban_premium: self.urban_premium,
            urban_population_threshold: self.urban_population_threshold,
            base_year: self.base_year,
        }
    }

    /// Loads the profile table (file or built-in) with the configured
    /// default base price.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the profile file is unreadable or invalid.
    pub fn profile_store(&self) -> Result<RegionProfileStore, ConfigError> {
        let store = match &self.profiles_path {
            Some(path) => RegionProfileStore::from_toml_file(path)?,
            None => RegionProfileStore::builtin(),
        };
        store
            .with_default_base_price(self.default_base_price)
            .map_err(|e| ConfigError::new("engine.default_base_price", e.message))
    }
}

/// Shared timeout, retry and cache settings for remote sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Upper bound on one remote attempt, seconds (> 0).
    pub timeout_secs: u64,
    /// Attempts per fetch including the first (>= 1).
    pub max_attempts: u32,
    /// Delay before the first retry, milliseconds.
    pub retry_delay_ms: u64,
    /// Cache TTL for climate and energy records, hours (1..=8760).
    pub records_ttl_hours: u64,
    /// Cache TTL for weather data, hours (1..=8760).
    pub weather_ttl_hours: u64,
    /// Never call remote services.
    pub offline: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 2,
            retry_delay_ms: 250,
            records_ttl_hours: 24,
            weather_ttl_hours: 12,
            offline: false,
        }
    }
}

impl GatewayConfig {
    pub fn policy(&self) -> GatewayPolicy {
        GatewayPolicy {
            timeout: Duration::from_secs(self.timeout_secs),
            max_attempts: self.max_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            offline: self.offline,
        }
    }

    pub fn records_ttl(&self) -> Duration {
        Duration::from_secs(self.records_ttl_hours.saturating_mul(3600))
    }

    pub fn weather_ttl(&self) -> Duration {
        Duration::from_secs(self.weather_ttl_hours.saturating_mul(3600))
    }
}

/// Climate records service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoaaConfig {
    pub base_url: String,
    /// API token; unset means every request is simulated.
    pub token: Option<String>,
}

impl Default for NoaaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ncei.noaa.gov/cdo-web/api/v2".to_string(),
            token: None,
        }
    }
}

/// Retail electricity sales service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EiaConfig {
    pub base_url: String,
    /// API key; unset means every request is simulated.
    pub token: Option<String>,
}

impl Default for EiaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.eia.gov/v2".to_string(),
            token: None,
        }
    }
}

/// Weather archive, forecast and climate model service. No key required.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenMeteoConfig {
    pub archive_url: String,
    pub forecast_url: String,
    pub climate_url: String,
    /// Climate model identifier for long-range projections.
    pub climate_model: String,
    /// Default short-range forecast length (1–16 days).
    pub forecast_days: u32,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            archive_url: "https://archive-api.open-meteo.com/v1/archive".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            climate_url: "https://climate-api.open-meteo.com/v1/climate".to_string(),
            climate_model: "MRI_AGCM3_2_S".to_string(),
            forecast_days: 16,
        }
    }
}

impl OutlookConfig {
    /// Returns the default configuration: live sources, built-in tables.
    pub fn default_preset() -> Self {
        Self::default()
    }

    /// Returns the offline preset: every remote call is simulated.
    pub fn offline() -> Self {
        Self {
            gateway: GatewayConfig {
                offline: true,
                ..GatewayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "offline"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_preset()),
            "offline" => Ok(Self::offline()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Fills unset tokens from `NOAA_API_TOKEN` / `EIA_API_TOKEN`.
    pub fn with_env_credentials(self) -> Self {
        self.with_credentials_from(|name| std::env::var(name).ok())
    }

    /// Fills unset tokens through `lookup`. Empty values count as unset.
    pub fn with_credentials_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if self.noaa.token.is_none() {
            self.noaa.token = lookup(NOAA_TOKEN_ENV);
        }
        if self.eia.token.is_none() {
            self.eia.token = lookup(EIA_TOKEN_ENV);
        }
        self
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let e = &self.engine;

        if !(e.capacity_factor > 0.0 && e.capacity_factor <= 1.0) {
            errors.push(ConfigError::new("engine.capacity_factor", "must be in (0.0, 1.0]"));
        }
        if !(e.default_base_price.is_finite() && e.default_base_price > 0.0) {
            errors.push(ConfigError::new("engine.default_base_price", "must be > 0"));
        }
        if !FORECAST_YEARS.contains(&e.base_year) {
            errors.push(ConfigError::new(
                "engine.base_year",
                format!("must be in {}..={}", FORECAST_YEARS.start(), FORECAST_YEARS.end()),
            ));
        }
        if !(e.urban_premium.is_finite() && e.urban_premium >= 1.0) {
            errors.push(ConfigError::new("engine.urban_premium", "must be >= 1.0"));
        }
        if !(e.demand_growth_rate.is_finite() && e.demand_growth_rate > -1.0) {
            errors.push(ConfigError::new("engine.demand_growth_rate", "must be > -1.0"));
        }
        if let Some(path) = &e.profiles_path
            && !path.is_file()
        {
            errors.push(ConfigError::new(
                "engine.profiles_path",
                format!("\"{}\" is not a file", path.display()),
            ));
        }

        let g = &self.gateway;
        if g.timeout_secs == 0 {
            errors.push(ConfigError::new("gateway.timeout_secs", "must be > 0"));
        }
        if g.max_attempts == 0 {
            errors.push(ConfigError::new("gateway.max_attempts", "must be >= 1"));
        }
        for (field, hours) in [
            ("gateway.records_ttl_hours", g.records_ttl_hours),
            ("gateway.weather_ttl_hours", g.weather_ttl_hours),
        ] {
            if !(1..=MAX_TTL_HOURS).contains(&hours) {
                errors.push(ConfigError::new(field, format!("must be in 1..={MAX_TTL_HOURS}")));
            }
        }

        for (field, url) in [
            ("noaa.base_url", &self.noaa.base_url),
            ("eia.base_url", &self.eia.base_url),
            ("open_meteo.archive_url", &self.open_meteo.archive_url),
            ("open_meteo.forecast_url", &self.open_meteo.forecast_url),
            ("open_meteo.climate_url", &self.open_meteo.climate_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(ConfigError::new(field, "must be an http(s) URL"));
            }
        }

        let om = &self.open_meteo;
        if om.climate_model.trim().is_empty() {
            errors.push(ConfigError::new("open_meteo.climate_model", "must not be empty"));
        }
        if !(1..=16).contains(&om.forecast_days) {
            errors.push(ConfigError::new("open_meteo.forecast_days", "must be in [1, 16]"));
        }

        errors
    }
}
