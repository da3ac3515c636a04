//! Remote data sources, each funnelled through a [`DataGateway`].
//!
//! * [`noaa`] - daily climate records by ZIP code
//! * [`eia`] - annual retail electricity sales by region
//! * [`open_meteo`] - weather archive, short-range forecast, climate projections
//!
//! All three return the same [`Dataset`] shape.
//!
//! [`DataGateway`]: crate::gateway::DataGateway

pub mod eia;
pub mod noaa;
pub mod open_meteo;

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::OutlookConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::clock::Clock;
use crate::gateway::Fetched;

use self::eia::{EiaClient, SalesData};
use self::noaa::{ClimateRecords, NoaaClient};
use self::open_meteo::{OpenMeteoClient, WeatherData};

const USER_AGENT: &str = concat!("grid-outlook/", env!("CARGO_PKG_VERSION"));

/// Per-day records plus their aggregate.
///
/// `days` is empty for synthesised and projected results. `summary` is
/// `None` when the upstream payload held no usable rows; callers treat that
/// as "no data", not as an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset<D, S> {
    pub days: Vec<D>,
    pub summary: Option<S>,
    pub simulated: bool,
    pub projected: bool,
}

impl<D, S> Dataset<D, S> {
    /// Observed data.
    pub fn observed(days: Vec<D>, summary: Option<S>) -> Self {
        Self {
            days,
            summary,
            simulated: false,
            projected: false,
        }
    }

    /// Synthesised summary without per-day records.
    pub fn synthesized(summary: S) -> Self {
        Self {
            days: Vec::new(),
            summary: Some(summary),
            simulated: true,
            projected: false,
        }
    }

    /// Marks the dataset as a projection of future conditions.
    pub fn projected(mut self) -> Self {
        self.projected = true;
        self
    }

    /// Unwraps a gateway result, carrying its `simulated` marker over.
    pub fn from_fetched(fetched: Fetched<Self>) -> Self {
        let mut data = fetched.payload;
        data.simulated = fetched.simulated;
        data
    }
}

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Which series a historical batch collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryKind {
    Climate,
    Electricity,
    #[default]
    Both,
}

impl HistoryKind {
    fn climate(self) -> bool {
        matches!(self, Self::Climate | Self::Both)
    }

    fn electricity(self) -> bool {
        matches!(self, Self::Electricity | Self::Both)
    }
}

/// Location for a historical batch: ZIP code for climate records, region
/// for electricity sales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLocation {
    pub zip: String,
    pub region: String,
}

/// One year of a historical batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearHistory {
    pub year: i32,
    pub climate: Option<ClimateRecords>,
    pub electricity: Option<SalesData>,
}

/// Weather for one location of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationWeather {
    pub location: GeoPoint,
    pub weather: WeatherData,
}

/// All remote sources behind one shared HTTP client and clock.
#[derive(Debug)]
pub struct DataHub {
    pub noaa: NoaaClient,
    pub eia: EiaClient,
    pub weather: OpenMeteoClient,
}

impl DataHub {
    /// Builds every client from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Source URLs, credentials and gateway policy
    /// * `clock` - Time source shared by all caches
    /// * `populations` - Region populations for simulated electricity sales
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client cannot be built.
    pub fn new(
        config: &OutlookConfig,
        clock: Arc<dyn Clock>,
        populations: HashMap<String, u64>,
    ) -> GatewayResult<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let policy = config.gateway.policy();
        Ok(Self {
            noaa: NoaaClient::new(
                &config.noaa,
                http.clone(),
                Arc::clone(&clock),
                policy,
                config.gateway.records_ttl(),
            ),
            eia: EiaClient::new(
                &config.eia,
                http.clone(),
                Arc::clone(&clock),
                policy,
                config.gateway.records_ttl(),
                populations,
            ),
            weather: OpenMeteoClient::new(
                &config.open_meteo,
                http,
                clock,
                policy,
                config.gateway.weather_ttl(),
            ),
        })
    }

    /// Climate and electricity history for every year in
    /// `start_year..=end_year`, in year order.
    ///
    /// Years are fetched concurrently; an empty range yields an empty vector.
    pub async fn historical(
        &self,
        location: &HistoryLocation,
        start_year: i32,
        end_year: i32,
        kind: HistoryKind,
    ) -> Vec<YearHistory> {
        join_all((start_year..=end_year).map(|year| async move {
            let start = format!("{year}-01-01");
            let end = format!("{year}-12-31");
            let climate = async {
                if kind.climate() {
                    Some(self.noaa.climate_records(&location.zip, &start, &end).await)
                } else {
                    None
                }
            };
            let electricity = async {
                if kind.electricity() {
                    Some(self.eia.retail_sales(&location.region, year).await)
                } else {
                    None
                }
            };
            let (climate, electricity) = tokio::join!(climate, electricity);
            YearHistory {
                year,
                climate,
                electricity,
            }
        }))
        .await
    }

    /// Historical weather for several locations, in input order.
    pub async fn weather_batch(
        &self,
        locations: &[GeoPoint],
        start_date: &str,
        end_date: &str,
    ) -> Vec<LocationWeather> {
        join_all(locations.iter().map(|&location| async move {
            LocationWeather {
                location,
                weather: self.weather.historical(location, start_date, end_date).await,
            }
        }))
        .await
    }
}

/// Sends `request` and decodes a JSON body, mapping non-success statuses to
/// [`GatewayError::Status`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> GatewayResult<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        return Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        });
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ManualClock;

    fn offline_hub() -> DataHub {
        let populations = HashMap::from([("TX".to_string(), 29_145_505)]);
        DataHub::new(
            &OutlookConfig::offline(),
            Arc::new(ManualClock::new(1_748_736_000_000)),
            populations,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn historical_batch_is_in_year_order() {
        let hub = offline_hub();
        let location = HistoryLocation {
            zip: "73301".into(),
            region: "TX".into(),
        };
        let years = hub.historical(&location, 2018, 2022, HistoryKind::Both).await;
        let order: Vec<i32> = years.iter().map(|y| y.year).collect();
        assert_eq!(order, vec![2018, 2019, 2020, 2021, 2022]);
        assert!(years.iter().all(|y| y.climate.is_some() && y.electricity.is_some()));
    }

    #[tokio::test]
    async fn historical_kind_selects_series() {
        let hub = offline_hub();
        let location = HistoryLocation {
            zip: "73301".into(),
            region: "TX".into(),
        };
        let years = hub.historical(&location, 2020, 2020, HistoryKind::Electricity).await;
        assert_eq!(years.len(), 1);
        assert!(years[0].climate.is_none());
        assert!(years[0].electricity.as_ref().is_some_and(|e| e.simulated));
        assert!(hub.historical(&location, 2021, 2020, HistoryKind::Both).await.is_empty());
    }

    #[tokio::test]
    async fn weather_batch_preserves_input_order() {
        let hub = offline_hub();
        let points = [
            GeoPoint::new(61.2, -149.9),
            GeoPoint::new(25.8, -80.2),
            GeoPoint::new(40.7, -74.0),
        ];
        let batch = hub.weather_batch(&points, "2024-01-01", "2024-12-31").await;
        let got: Vec<GeoPoint> = batch.iter().map(|w| w.location).collect();
        assert_eq!(got, points);
        // Anchorage simulates colder than Miami.
        let temp = |i: usize| {
            batch[i]
                .weather
                .summary
                .as_ref()
                .map_or(f64::NAN, |s| s.avg_temp_mean)
        };
        assert!(temp(0) < temp(1));
    }
}
