//! EIA retail electricity sales client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::EiaConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::clock::Clock;
use crate::gateway::{DataGateway, GatewayPolicy};
use crate::profile::resolve_region;

use super::{Dataset, send_json};

/// Unit of the sales figures returned by the service.
pub const EIA_SALES_UNIT: &str = "million kilowatthours";
/// Unit of simulated sales figures.
pub const SIMULATED_SALES_UNIT: &str = "megawatthours";
/// Population assumed for regions missing from the population table.
pub const DEFAULT_POPULATION: u64 = 5_000_000;
/// Average annual consumption per resident, kWh.
pub const KWH_PER_CAPITA: f64 = 11_000.0;

/// Sales broken down by customer sector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SectorSales {
    pub residential: f64,
    pub commercial: f64,
    pub industrial: f64,
    pub transportation: f64,
    pub total: f64,
}

/// Annual sales of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub region: String,
    pub year: i32,
    pub sales: SectorSales,
    pub unit: String,
    /// `total / 12`
    pub avg_monthly: f64,
}

/// One upstream row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(default)]
    pub period: String,
    #[serde(default, rename = "sectorid")]
    pub sector: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub sales: Option<f64>,
}

pub type SalesData = Dataset<SalesRecord, SalesSummary>;

#[derive(Debug, Deserialize)]
struct SalesResponse {
    response: Option<SalesBody>,
}

#[derive(Debug, Deserialize)]
struct SalesBody {
    #[serde(default)]
    data: Vec<SalesRecord>,
}

/// The service reports figures as strings or numbers and sometimes `null`.
fn number_or_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match serde_json::Value::deserialize(de)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Folds rows into the sector breakdown.
///
/// An `ALL` row, when present, is the total; otherwise the total is the sum
/// of all rows. Returns `None` when there are no rows.
pub fn summarize(region: &str, year: i32, records: &[SalesRecord]) -> Option<SalesSummary> {
    if records.is_empty() {
        return None;
    }
    let mut sales = SectorSales::default();
    let mut row_sum = 0.0;
    let mut all_row: Option<f64> = None;
    for record in records {
        let value = record.sales.unwrap_or(0.0);
        match record.sector.trim().to_ascii_uppercase().as_str() {
            "ALL" => {
                *all_row.get_or_insert(0.0) += value;
                continue;
            }
            "RES" | "RESIDENTIAL" => sales.residential += value,
            "COM" | "COMMERCIAL" => sales.commercial += value,
            "IND" | "INDUSTRIAL" => sales.industrial += value,
            "TRA" | "TRANSPORTATION" => sales.transportation += value,
            _ => {}
        }
        row_sum += value;
    }
    sales.total = all_row.unwrap_or(row_sum);
    Some(SalesSummary {
        region: region.to_string(),
        year,
        sales,
        unit: EIA_SALES_UNIT.to_string(),
        avg_monthly: sales.total / 12.0,
    })
}

/// Sales estimate from population at 11,000 kWh per resident.
pub fn simulate_sales(region: &str, year: i32, population: Option<u64>) -> SalesData {
    let people = population.unwrap_or(DEFAULT_POPULATION) as f64;
    let total = people * KWH_PER_CAPITA / 1000.0;
    SalesData::synthesized(SalesSummary {
        region: region.to_string(),
        year,
        sales: SectorSales {
            residential: total * 0.38,
            commercial: total * 0.36,
            industrial: total * 0.26,
            transportation: total * 0.001,
            total,
        },
        unit: SIMULATED_SALES_UNIT.to_string(),
        avg_monthly: total / 12.0,
    })
}

/// Retail sales service behind a 24 h cache.
#[derive(Debug)]
pub struct EiaClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    populations: HashMap<String, u64>,
    gateway: DataGateway<SalesData>,
    ttl: Duration,
}

impl EiaClient {
    pub fn new(
        config: &EiaConfig,
        http: reqwest::Client,
        clock: Arc<dyn Clock>,
        policy: GatewayPolicy,
        ttl: Duration,
        populations: HashMap<String, u64>,
    ) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            populations,
            gateway: DataGateway::new("eia", clock, policy),
            ttl,
        }
    }

    pub fn gateway(&self) -> &DataGateway<SalesData> {
        &self.gateway
    }

    /// Annual retail sales for a region (code or state name).
    ///
    /// Without a token every request is simulated from population.
    pub async fn retail_sales(&self, region: &str, year: i32) -> SalesData {
        let code = resolve_region(region);
        let key = format!("eia_{code}_{year}");
        let population = self.populations.get(&code).copied();
        let fetched = self
            .gateway
            .fetch(
                &key,
                self.ttl,
                || self.request(&code, year),
                |_| simulate_sales(&code, year, population),
            )
            .await;
        SalesData::from_fetched(fetched)
    }

    async fn request(&self, code: &str, year: i32) -> GatewayResult<SalesData> {
        let token = self.token.as_deref().ok_or(GatewayError::MissingCredential("EIA"))?;
        let year_str = year.to_string();
        let request = self
            .http
            .get(format!("{}/electricity/retail-sales/data/", self.base_url))
            .query(&[
                ("api_key", token),
                ("frequency", "annual"),
                ("data[0]", "sales"),
                ("facets[stateid][]", code),
                ("start", year_str.as_str()),
                ("end", year_str.as_str()),
                ("sort[0][column]", "period"),
                ("sort[0][direction]", "desc"),
            ]);
        let response: SalesResponse = send_json(request).await?;
        let records = response.response.map(|r| r.data).unwrap_or_default();
        let summary = summarize(code, year, &records);
        Ok(SalesData::observed(records, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ManualClock;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn record(sector: &str, sales: f64) -> SalesRecord {
        SalesRecord {
            period: "2023".into(),
            sector: sector.into(),
            sales: Some(sales),
        }
    }

    fn client(base_url: &str, token: Option<&str>) -> EiaClient {
        let config = EiaConfig {
            base_url: base_url.to_string(),
            token: token.map(str::to_string),
        };
        let policy = GatewayPolicy {
            max_attempts: 1,
            ..GatewayPolicy::default()
        };
        EiaClient::new(
            &config,
            reqwest::Client::new(),
            Arc::new(ManualClock::new(0)),
            policy,
            Duration::from_secs(24 * 3600),
            HashMap::from([("TX".to_string(), 29_145_505)]),
        )
    }

    #[test]
    fn all_row_is_the_total() {
        let rows = [
            record("RES", 100.0),
            record("COM", 80.0),
            record("IND", 60.0),
            record("ALL", 245.0),
        ];
        let s = summarize("TX", 2023, &rows).unwrap();
        assert_eq!(s.sales.residential, 100.0);
        assert_eq!(s.sales.total, 245.0);
        assert!((s.avg_monthly - 245.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn total_sums_rows_without_all() {
        let rows = [record("residential", 10.0), record("TRA", 1.0), record("OTH", 4.0)];
        let s = summarize("TX", 2023, &rows).unwrap();
        assert_eq!(s.sales.transportation, 1.0);
        assert_eq!(s.sales.total, 15.0);
    }

    #[test]
    fn no_rows_means_no_summary() {
        assert!(summarize("TX", 2023, &[]).is_none());
    }

    #[test]
    fn sales_accept_strings_and_numbers() {
        let rows: Vec<SalesRecord> = serde_json::from_value(json!([
            {"period": "2023", "sectorid": "RES", "sales": "12.5"},
            {"period": "2023", "sectorid": "COM", "sales": 7},
            {"period": "2023", "sectorid": "IND", "sales": null}
        ]))
        .unwrap();
        assert_eq!(rows[0].sales, Some(12.5));
        assert_eq!(rows[1].sales, Some(7.0));
        assert_eq!(rows[2].sales, None);
    }

    #[test]
    fn simulation_scales_with_population() {
        let data = simulate_sales("TX", 2024, Some(1_000));
        let s = data.summary.unwrap();
        assert_eq!(s.sales.total, 11_000.0);
        assert!((s.sales.residential - 4_180.0).abs() < 1e-9);
        let unknown = simulate_sales("ZZ", 2024, None).summary.unwrap();
        assert_eq!(unknown.sales.total, 55_000_000.0);
    }

    #[tokio::test]
    async fn missing_token_uses_population_table() {
        let c = client("http://127.0.0.1:9", None);
        let data = c.retail_sales("Texas", 2024).await;
        assert!(data.simulated);
        let s = data.summary.unwrap();
        assert_eq!(s.region, "TX");
        assert!((s.sales.total - 29_145_505.0 * 11.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn live_response_is_aggregated() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/electricity/retail-sales/data/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "k".into()),
                Matcher::UrlEncoded("facets[stateid][]".into(), "CA".into()),
                Matcher::UrlEncoded("start".into(), "2023".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "response": {
                        "data": [
                            {"period": "2023", "sectorid": "RES", "sales": "90000"},
                            {"period": "2023", "sectorid": "ALL", "sales": "250000"}
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let c = client(&server.url(), Some("k"));
        let data = c.retail_sales("ca", 2023).await;
        assert!(!data.simulated);
        assert_eq!(data.days.len(), 2);
        let s = data.summary.unwrap();
        assert_eq!(s.sales.total, 250_000.0);
        assert_eq!(s.unit, EIA_SALES_UNIT);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let c = client(&server.url(), Some("k"));
        let data = c.retail_sales("TX", 2022).await;
        assert!(data.simulated);
        assert_eq!(data, simulate_sales("TX", 2022, Some(29_145_505)));
    }
}
