//! Open-Meteo weather archive, forecast and climate-model client.
//!
//! No credential is needed. Historical and forecast requests fall back to a
//! latitude-based simulation seeded by the cache key. Climate projections
//! try the model endpoint first, then extrapolate ten years of history, and
//! only simulate when that history is itself unavailable.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OpenMeteoConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::forecast::{project_from_trend, simulate_projection};
use crate::gateway::clock::Clock;
use crate::gateway::{DataGateway, GatewayPolicy, SeededRng, bounded};
use crate::price::DEFAULT_BASE_YEAR;

use super::{Dataset, GeoPoint, send_json};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,temperature_2m_mean,\
relative_humidity_2m_mean,wind_speed_10m_max,precipitation_sum,shortwave_radiation_sum";
const CLIMATE_FIELDS: &str = "temperature_2m_mean,temperature_2m_max,temperature_2m_min,\
precipitation_sum,shortwave_radiation_sum";

/// Longest short-range forecast the service offers.
pub const MAX_FORECAST_DAYS: u32 = 16;
/// Years of history used for trend extrapolation.
pub const TREND_HISTORY_YEARS: i32 = 10;

/// One day of the series. Any column may be missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherDay {
    pub date: String,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_mean: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub precipitation: Option<f64>,
    pub solar_radiation: Option<f64>,
}

/// Aggregate over days that report a mean temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeatherSummary {
    /// °C
    pub avg_temp_max: f64,
    /// °C
    pub avg_temp_min: f64,
    /// °C
    pub avg_temp_mean: f64,
    /// %
    pub avg_humidity: f64,
    /// m/s
    pub avg_wind_speed: f64,
    /// mm over the whole period
    pub total_precipitation: f64,
    pub avg_solar_radiation: f64,
    pub days_analyzed: usize,
}

pub type WeatherData = Dataset<WeatherDay, WeatherSummary>;

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: Option<DailySeries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DailySeries {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    temperature_2m_mean: Vec<Option<f64>>,
    relative_humidity_2m_mean: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    shortwave_radiation_sum: Vec<Option<f64>>,
}

impl DailySeries {
    fn into_days(self) -> Vec<WeatherDay> {
        let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();
        self.time
            .iter()
            .enumerate()
            .map(|(i, date)| WeatherDay {
                date: date.clone(),
                temp_max: at(&self.temperature_2m_max, i),
                temp_min: at(&self.temperature_2m_min, i),
                temp_mean: at(&self.temperature_2m_mean, i),
                humidity: at(&self.relative_humidity_2m_mean, i),
                wind_speed: at(&self.wind_speed_10m_max, i),
                precipitation: at(&self.precipitation_sum, i),
                solar_radiation: at(&self.shortwave_radiation_sum, i),
            })
            .collect()
    }
}

/// Reduces a daily series to a summary over days with a mean temperature.
///
/// Missing columns on a valid day count as zero. Returns `None` when no day
/// has a mean temperature.
pub fn summarize(days: &[WeatherDay]) -> Option<WeatherSummary> {
    let valid: Vec<&WeatherDay> = days.iter().filter(|d| d.temp_mean.is_some()).collect();
    if valid.is_empty() {
        return None;
    }
    let n = valid.len() as f64;
    let sum = |f: fn(&WeatherDay) -> Option<f64>| -> f64 {
        valid.iter().map(|&d| f(d).unwrap_or(0.0)).sum()
    };
    Some(WeatherSummary {
        avg_temp_max: sum(|d| d.temp_max) / n,
        avg_temp_min: sum(|d| d.temp_min) / n,
        avg_temp_mean: sum(|d| d.temp_mean) / n,
        avg_humidity: sum(|d| d.humidity) / n,
        avg_wind_speed: sum(|d| d.wind_speed) / n,
        total_precipitation: sum(|d| d.precipitation),
        avg_solar_radiation: sum(|d| d.solar_radiation) / n,
        days_analyzed: valid.len(),
    })
}

/// Deterministic stand-in for observed weather over `days` days.
pub fn simulate_weather(key: &str, latitude: f64, days: usize) -> WeatherData {
    let mut rng = SeededRng::from_key(key);
    let climate = simulate_projection(latitude, 0);
    let offset = rng.span(-1.5, 3.0);
    let period = days as f64 / 365.0;
    WeatherData::synthesized(WeatherSummary {
        avg_temp_max: climate.avg_temp_max + offset,
        avg_temp_min: climate.avg_temp_min + offset,
        avg_temp_mean: climate.avg_temp_mean + offset,
        avg_humidity: climate.avg_humidity + rng.span(-5.0, 10.0),
        avg_wind_speed: climate.avg_wind_speed + rng.span(-0.5, 1.0),
        total_precipitation: climate.total_precipitation * period * rng.span(0.8, 0.4),
        avg_solar_radiation: climate.avg_solar_radiation + rng.span(-10.0, 20.0),
        days_analyzed: days,
    })
}

fn days_between(start_date: &str, end_date: &str) -> Option<usize> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(end_date, "%Y-%m-%d").ok()?;
    usize::try_from((end - start).num_days() + 1).ok()
}

/// Year part of a `YYYY-MM-DD` date, any number of year digits.
fn year_of(date: &str) -> Option<i32> {
    date.split('-').next()?.parse().ok()
}

/// Weather archive, forecast and climate-model access.
#[derive(Debug)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    config: OpenMeteoConfig,
    gateway: DataGateway<WeatherData>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl OpenMeteoClient {
    pub fn new(
        config: &OpenMeteoConfig,
        http: reqwest::Client,
        clock: Arc<dyn Clock>,
        policy: GatewayPolicy,
        ttl: Duration,
    ) -> Self {
        Self {
            http,
            config: config.clone(),
            gateway: DataGateway::new("open-meteo", Arc::clone(&clock), policy),
            clock,
            ttl,
        }
    }

    pub fn gateway(&self) -> &DataGateway<WeatherData> {
        &self.gateway
    }

    /// Calendar year of the injected clock.
    pub fn reference_year(&self) -> i32 {
        i64::try_from(self.clock.now_ms())
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .map_or(DEFAULT_BASE_YEAR, |t| t.year())
    }

    /// Observed daily weather for a date range (`YYYY-MM-DD`, inclusive).
    pub async fn historical(&self, point: GeoPoint, start_date: &str, end_date: &str) -> WeatherData {
        let key = format!("hist_{}_{}_{start_date}_{end_date}", point.lat, point.lon);
        let days = days_between(start_date, end_date).unwrap_or(365);
        let fetched = self
            .gateway
            .fetch(
                &key,
                self.ttl,
                || {
                    let request = self.http.get(&self.config.archive_url).query(&[
                        ("latitude", point.lat.to_string()),
                        ("longitude", point.lon.to_string()),
                        ("start_date", start_date.to_string()),
                        ("end_date", end_date.to_string()),
                        ("daily", DAILY_FIELDS.to_string()),
                        ("temperature_unit", "celsius".to_string()),
                        ("wind_speed_unit", "ms".to_string()),
                        ("precipitation_unit", "mm".to_string()),
                    ]);
                    request_daily(request)
                },
                |key| simulate_weather(key, point.lat, days),
            )
            .await;
        WeatherData::from_fetched(fetched)
    }

    /// Short-range forecast; `days` is clamped to 1–16.
    pub async fn forecast(&self, point: GeoPoint, days: u32) -> WeatherData {
        let days = days.clamp(1, MAX_FORECAST_DAYS);
        let key = format!("forecast_{}_{}_{days}", point.lat, point.lon);
        let fetched = self
            .gateway
            .fetch(
                &key,
                self.ttl,
                || {
                    let request = self.http.get(&self.config.forecast_url).query(&[
                        ("latitude", point.lat.to_string()),
                        ("longitude", point.lon.to_string()),
                        ("daily", DAILY_FIELDS.to_string()),
                        ("forecast_days", days.to_string()),
                        ("temperature_unit", "celsius".to_string()),
                        ("wind_speed_unit", "ms".to_string()),
                        ("precipitation_unit", "mm".to_string()),
                    ]);
                    request_daily(request)
                },
                |key| simulate_weather(key, point.lat, days as usize),
            )
            .await;
        WeatherData::from_fetched(fetched)
    }

    /// Forecast using the configured default length.
    pub async fn default_forecast(&self, point: GeoPoint) -> WeatherData {
        self.forecast(point, self.config.forecast_days).await
    }

    /// Long-range climate projection for a future date range.
    ///
    /// Falls back to trend extrapolation from the last ten full years of
    /// history, then to [`simulate_projection`]. Projection offsets are
    /// measured from the clock's current year.
    pub async fn climate_projection(
        &self,
        point: GeoPoint,
        start_date: &str,
        end_date: &str,
    ) -> WeatherData {
        let key = format!("climate_{}_{}_{start_date}_{end_date}", point.lat, point.lon);
        let reference_year = self.reference_year();
        let years_ahead = year_of(start_date)
            .unwrap_or(reference_year)
            .saturating_sub(reference_year);
        let fetched = self
            .gateway
            .fetch_staged(
                &key,
                self.ttl,
                || self.request_climate(point, start_date, end_date, reference_year, years_ahead),
                |_| {
                    WeatherData::synthesized(simulate_projection(point.lat, years_ahead)).projected()
                },
            )
            .await;
        WeatherData::from_fetched(fetched)
    }

    async fn request_climate(
        &self,
        point: GeoPoint,
        start_date: &str,
        end_date: &str,
        reference_year: i32,
        years_ahead: i32,
    ) -> GatewayResult<WeatherData> {
        let request = self.http.get(&self.config.climate_url).query(&[
            ("latitude", point.lat.to_string()),
            ("longitude", point.lon.to_string()),
            ("start_date", start_date.to_string()),
            ("end_date", end_date.to_string()),
            ("models", self.config.climate_model.clone()),
            ("daily", CLIMATE_FIELDS.to_string()),
            ("temperature_unit", "celsius".to_string()),
        ]);
        let limit = self.gateway.policy().timeout;
        match bounded(limit, request_daily(request)).await {
            Ok(data) if data.summary.is_some() => Ok(data.projected()),
            Ok(_) => {
                warn!("climate model returned no usable days, using trend projection");
                self.project_from_history(point, reference_year, years_ahead).await
            }
            Err(e) => {
                warn!(error = %e, "climate model unavailable, using trend projection");
                self.project_from_history(point, reference_year, years_ahead).await
            }
        }
    }

    async fn project_from_history(
        &self,
        point: GeoPoint,
        reference_year: i32,
        years_ahead: i32,
    ) -> GatewayResult<WeatherData> {
        let start = format!("{}-01-01", reference_year - TREND_HISTORY_YEARS);
        let end = format!("{}-12-31", reference_year - 1);
        let history = self.historical(point, &start, &end).await;
        if history.simulated {
            return Err(GatewayError::Projection("history is simulated".into()));
        }
        let summary = history
            .summary
            .ok_or_else(|| GatewayError::Projection("history has no usable days".into()))?;
        debug!(years_ahead, "projecting climate from {start}..{end}");
        Ok(WeatherData {
            days: Vec::new(),
            summary: Some(project_from_trend(&summary, years_ahead)),
            simulated: false,
            projected: true,
        })
    }
}

async fn request_daily(request: reqwest::RequestBuilder) -> GatewayResult<WeatherData> {
    let response: DailyResponse = send_json(request).await?;
    let days = response.daily.map(DailySeries::into_days).unwrap_or_default();
    let summary = summarize(&days);
    Ok(WeatherData::observed(days, summary))
}
