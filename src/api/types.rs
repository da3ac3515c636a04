//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::balance::{EnergyBalance, GenerationMix};
use crate::price::{PriceForecast, PriceLevel};
use crate::recommend::ExpansionRecommendation;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Known region codes in alphabetical order.
#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Resolved region code.
    pub region: String,
    #[serde(flatten)]
    pub balance: EnergyBalance,
    pub is_deficit: bool,
}

#[derive(Debug, Serialize)]
pub struct MixResponse {
    pub region: String,
    /// Percent share per source.
    pub mix: GenerationMix,
    pub renewable_pct: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub region: String,
    pub recommendations: Vec<ExpansionRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub region: String,
    #[serde(flatten)]
    pub forecast: PriceForecast,
    pub level: PriceLevel,
}

/// Raw query parameters; parsed by the handlers so malformed values yield
/// an [`ErrorResponse`] instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RegionQuery {
    /// Comma-separated forecast years, e.g. `2030,2035`.
    pub years: Option<String>,
    /// Locality population.
    pub population: Option<String>,
    /// Expected annual demand in MWh.
    pub future_demand_mwh: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
