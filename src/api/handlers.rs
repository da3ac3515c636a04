//! Request handlers for the API endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::engine::{OutlookEngine, OutlookRequest};
use crate::price::{FORECAST_YEARS, PriceLevel};
use crate::profile::resolve_region;
use crate::report::RegionOutlook;
use crate::sources::GeoPoint;

use super::types::{
    BalanceResponse, ErrorResponse, HealthResponse, MixResponse, PriceResponse, RecommendationsResponse,
    RegionQuery, RegionsResponse,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn bad_request(error: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

fn parse_param<T: FromStr>(
    name: &str,
    value: Option<&str>,
) -> Result<Option<T>, (StatusCode, Json<ErrorResponse>)> {
    value
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| bad_request(format!("invalid `{name}`: \"{v}\"")))
        })
        .transpose()
}

fn parse_years(value: Option<&str>) -> Result<Vec<i32>, (StatusCode, Json<ErrorResponse>)> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| match s.trim().parse() {
            Ok(year) if FORECAST_YEARS.contains(&year) => Ok(year),
            Ok(_) => Err(bad_request(format!(
                "year out of range in `years`: \"{s}\" (expected {}..={})",
                FORECAST_YEARS.start(),
                FORECAST_YEARS.end()
            ))),
            Err(_) => Err(bad_request(format!("invalid year in `years`: \"{s}\""))),
        })
        .collect()
}

/// `GET /health` → 200
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /regions` → 200 + `RegionsResponse`
pub async fn list_regions(State(engine): State<Arc<OutlookEngine>>) -> Json<RegionsResponse> {
    let regions = engine
        .store()
        .regions()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(RegionsResponse { regions })
}

/// `GET /regions/{code}/balance`
///
/// Unknown regions report an all-zero balance.
pub async fn get_balance(
    State(engine): State<Arc<OutlookEngine>>,
    Path(code): Path<String>,
) -> Json<BalanceResponse> {
    let region = resolve_region(&code);
    let balance = engine.energy_balance(&region);
    Json(BalanceResponse {
        region,
        is_deficit: balance.is_deficit(),
        balance,
    })
}

/// `GET /regions/{code}/mix`
pub async fn get_mix(
    State(engine): State<Arc<OutlookEngine>>,
    Path(code): Path<String>,
) -> Json<MixResponse> {
    let region = resolve_region(&code);
    Json(MixResponse {
        mix: engine.generation_mix(&region),
        renewable_pct: engine.renewable_percentage(&region),
        region,
    })
}

/// `GET /regions/{code}/recommendations?future_demand_mwh=X`
pub async fn get_recommendations(
    State(engine): State<Arc<OutlookEngine>>,
    Path(code): Path<String>,
    Query(query): Query<RegionQuery>,
) -> ApiResult<RecommendationsResponse> {
    let future_demand: Option<f64> =
        parse_param("future_demand_mwh", query.future_demand_mwh.as_deref())?;
    let region = resolve_region(&code);
    Ok(Json(RecommendationsResponse {
        recommendations: engine.recommendations(&region, future_demand),
        region,
    }))
}

/// `GET /regions/{code}/price?years=2030,2035&population=N`
///
/// Without `years` the configured default horizon is used.
pub async fn get_price(
    State(engine): State<Arc<OutlookEngine>>,
    Path(code): Path<String>,
    Query(query): Query<RegionQuery>,
) -> ApiResult<PriceResponse> {
    let years = parse_years(query.years.as_deref())?;
    let population: Option<u64> = parse_param("population", query.population.as_deref())?;
    let region = resolve_region(&code);
    let forecast = engine.price_forecast(&region, &years, population);
    Ok(Json(PriceResponse {
        level: PriceLevel::classify(forecast.current_price_cents_per_kwh),
        forecast,
        region,
    }))
}

/// `GET /regions/{code}/outlook?years=..&population=..&lat=..&lon=..`
///
/// `lat` and `lon` must be given together; they enable the demand estimate.
pub async fn get_outlook(
    State(engine): State<Arc<OutlookEngine>>,
    Path(code): Path<String>,
    Query(query): Query<RegionQuery>,
) -> ApiResult<RegionOutlook> {
    let lat: Option<f64> = parse_param("lat", query.lat.as_deref())?;
    let lon: Option<f64> = parse_param("lon", query.lon.as_deref())?;
    let location = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        (None, None) => None,
        _ => return Err(bad_request("`lat` and `lon` must be given together".into())),
    };
    let request = OutlookRequest {
        region: code,
        years: parse_years(query.years.as_deref())?,
        population: parse_param("population", query.population.as_deref())?,
        location,
        future_demand_mwh: parse_param("future_demand_mwh", query.future_demand_mwh.as_deref())?,
    };
    Ok(Json(engine.outlook(&request).await))
}
