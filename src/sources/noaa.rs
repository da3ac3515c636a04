//! NOAA climate data client (GHCND daily summaries by ZIP code).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::NoaaConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::clock::Clock;
use crate::gateway::{DataGateway, GatewayPolicy, SeededRng};

use super::{Dataset, send_json};

const DATA_TYPES: &str = "TMAX,TMIN,AWND,PRCP";

/// Measurements recorded on one date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClimateDay {
    pub date: String,
    /// Maximum temperature, °C.
    pub tmax: Option<f64>,
    /// Minimum temperature, °C.
    pub tmin: Option<f64>,
    /// Average wind speed, m/s.
    pub awnd: Option<f64>,
    /// Precipitation, mm.
    pub prcp: Option<f64>,
}

/// First and last date covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateSummary {
    /// `(Σ max + Σ min) / 2 / days`
    pub avg_temp: f64,
    pub avg_temp_max: f64,
    pub avg_temp_min: f64,
    pub avg_wind_speed: f64,
    pub total_precipitation: f64,
    pub days_analyzed: usize,
    pub date_range: DateRange,
}

pub type ClimateRecords = Dataset<ClimateDay, ClimateSummary>;

#[derive(Debug, Deserialize)]
struct DataResponse {
    #[serde(default)]
    results: Vec<DataRecord>,
}

#[derive(Debug, Deserialize)]
struct DataRecord {
    /// ISO timestamp, e.g. `2024-01-01T00:00:00`.
    date: String,
    datatype: String,
    value: f64,
}

/// Groups records by calendar date, in date order.
fn group_by_date(records: Vec<DataRecord>) -> Vec<ClimateDay> {
    let mut days: BTreeMap<String, ClimateDay> = BTreeMap::new();
    for record in records {
        let date = record
            .date
            .split('T')
            .next()
            .unwrap_or(&record.date)
            .to_string();
        let day = days.entry(date.clone()).or_insert_with(|| ClimateDay {
            date,
            ..ClimateDay::default()
        });
        match record.datatype.as_str() {
            "TMAX" => day.tmax = Some(record.value),
            "TMIN" => day.tmin = Some(record.value),
            "AWND" => day.awnd = Some(record.value),
            "PRCP" => day.prcp = Some(record.value),
            _ => {}
        }
    }
    days.into_values().collect()
}

/// Aggregates grouped days; `None` when there are none.
pub fn summarize(days: &[ClimateDay]) -> Option<ClimateSummary> {
    let (first, last) = (days.first()?, days.last()?);
    let n = days.len() as f64;
    let total = |f: fn(&ClimateDay) -> Option<f64>| -> f64 { days.iter().filter_map(f).sum() };
    let (sum_max, sum_min) = (total(|d| d.tmax), total(|d| d.tmin));
    Some(ClimateSummary {
        avg_temp: (sum_max + sum_min) / 2.0 / n,
        avg_temp_max: sum_max / n,
        avg_temp_min: sum_min / n,
        avg_wind_speed: total(|d| d.awnd) / n,
        total_precipitation: total(|d| d.prcp),
        days_analyzed: days.len(),
        date_range: DateRange {
            start: first.date.clone(),
            end: last.date.clone(),
        },
    })
}

/// Deterministic stand-in for a year of records at one ZIP code.
pub fn simulate_climate(key: &str, start_date: &str, end_date: &str) -> ClimateRecords {
    let mut rng = SeededRng::from_key(key);
    ClimateRecords::synthesized(ClimateSummary {
        avg_temp: rng.span(15.0, 20.0),
        avg_temp_max: rng.span(20.0, 25.0),
        avg_temp_min: rng.span(10.0, 15.0),
        avg_wind_speed: rng.span(2.0, 5.0),
        total_precipitation: rng.span(0.0, 1000.0),
        days_analyzed: 365,
        date_range: DateRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        },
    })
}

/// Climate records service behind a 24 h cache.
#[derive(Debug)]
pub struct NoaaClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    gateway: DataGateway<ClimateRecords>,
    ttl: Duration,
}

impl NoaaClient {
    pub fn new(
        config: &NoaaConfig,
        http: reqwest::Client,
        clock: Arc<dyn Clock>,
        policy: GatewayPolicy,
        ttl: Duration,
    ) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            gateway: DataGateway::new("noaa", clock, policy),
            ttl,
        }
    }

    pub fn gateway(&self) -> &DataGateway<ClimateRecords> {
        &self.gateway
    }

    /// Daily max/min temperature, wind and precipitation for a ZIP code.
    ///
    /// Without a token every request is simulated.
    pub async fn climate_records(&self, zip: &str, start_date: &str, end_date: &str) -> ClimateRecords {
        let key = format!("noaa_{zip}_{start_date}_{end_date}");
        let fetched = self
            .gateway
            .fetch(
                &key,
                self.ttl,
                || self.request(zip, start_date, end_date),
                |key| simulate_climate(key, start_date, end_date),
            )
            .await;
        ClimateRecords::from_fetched(fetched)
    }

    async fn request(&self, zip: &str, start_date: &str, end_date: &str) -> GatewayResult<ClimateRecords> {
        let token = self.token.as_deref().ok_or(GatewayError::MissingCredential("NOAA"))?;
        let request = self
            .http
            .get(format!("{}/data", self.base_url))
            .header("token", token)
            .query(&[
                ("datasetid", "GHCND".to_string()),
                ("locationid", format!("ZIP:{zip}")),
                ("startdate", start_date.to_string()),
                ("enddate", end_date.to_string()),
                ("datatypeid", DATA_TYPES.to_string()),
                ("units", "metric".to_string()),
                ("limit", "1000".to_string()),
            ]);
        let response: DataResponse = send_json(request).await?;
        let days = group_by_date(response.results);
        let summary = summarize(&days);
        Ok(ClimateRecords::observed(days, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ManualClock;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(base_url: &str, token: Option<&str>) -> NoaaClient {
        let config = NoaaConfig {
            base_url: base_url.to_string(),
            token: token.map(str::to_string),
        };
        let policy = GatewayPolicy {
            max_attempts: 1,
            ..GatewayPolicy::default()
        };
        NoaaClient::new(
            &config,
            reqwest::Client::new(),
            Arc::new(ManualClock::new(0)),
            policy,
            Duration::from_secs(24 * 3600),
        )
    }

    #[test]
    fn records_group_by_date() {
        let records = vec![
            DataRecord {
                date: "2024-01-02T00:00:00".into(),
                datatype: "TMAX".into(),
                value: 10.0,
            },
            DataRecord {
                date: "2024-01-01T00:00:00".into(),
                datatype: "TMAX".into(),
                value: 6.0,
            },
            DataRecord {
                date: "2024-01-01T00:00:00".into(),
                datatype: "TMIN".into(),
                value: -2.0,
            },
            DataRecord {
                date: "2024-01-02T00:00:00".into(),
                datatype: "PRCP".into(),
                value: 3.5,
            },
        ];
        let days = group_by_date(records);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-01");
        let s = summarize(&days).unwrap();
        assert_eq!(s.avg_temp_max, 8.0);
        assert_eq!(s.avg_temp_min, -1.0);
        assert_eq!(s.avg_temp, 3.5);
        assert_eq!(s.total_precipitation, 3.5);
        assert_eq!(s.date_range.start, "2024-01-01");
        assert_eq!(s.date_range.end, "2024-01-02");
    }

    #[test]
    fn no_rows_means_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[tokio::test]
    async fn missing_token_simulates_without_request() {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let c = client(&server.url(), None);
        let a = c.climate_records("80301", "2024-01-01", "2024-12-31").await;
        assert!(a.simulated);
        assert_eq!(a, simulate_climate("noaa_80301_2024-01-01_2024-12-31", "2024-01-01", "2024-12-31"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn token_is_sent_and_response_parsed() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/data")
            .match_header("token", "secret")
            .match_query(Matcher::UrlEncoded("locationid".into(), "ZIP:80301".into()))
            .with_status(200)
            .with_body(
                json!({
                    "results": [
                        {"date": "2024-06-01T00:00:00", "datatype": "TMAX", "value": 28.0},
                        {"date": "2024-06-01T00:00:00", "datatype": "TMIN", "value": 12.0},
                        {"date": "2024-06-01T00:00:00", "datatype": "AWND", "value": 3.0}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let c = client(&server.url(), Some("secret"));
        let data = c.climate_records("80301", "2024-06-01", "2024-06-01").await;
        assert!(!data.simulated);
        assert_eq!(data.days.len(), 1);
        assert_eq!(data.summary.map(|s| s.avg_temp), Some(20.0));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_results_yield_no_summary() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/data")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let c = client(&server.url(), Some("secret"));
        let data = c.climate_records("00000", "2024-01-01", "2024-01-31").await;
        assert!(!data.simulated);
        assert!(data.summary.is_none());
    }
}
