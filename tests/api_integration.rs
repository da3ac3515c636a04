//! Integration tests for the REST API.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use grid_outlook::api::router;

async fn get(uri: &str) -> (StatusCode, Value) {
    let app = router(Arc::new(common::offline_engine()));
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let (status, json) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn regions_are_sorted() {
    let (status, json) = get("/regions").await;
    assert_eq!(status, StatusCode::OK);
    let regions: Vec<&str> = json["regions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(regions.contains(&"TX"));
    assert!(regions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn texas_balance() {
    let (status, json) = get("/regions/texas/balance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["region"], "TX");
    assert_eq!(json["total_capacity_mw"], 152_408.0);
    assert_eq!(json["annual_generation_mwh"], 667_547_040.0);
    assert_eq!(json["is_deficit"], false);
}

#[tokio::test]
async fn unknown_region_is_not_an_error() {
    let (status, json) = get("/regions/ZZ/balance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_capacity_mw"], 0.0);
    assert!(json["self_sufficiency_pct"].is_null());

    let (status, json) = get("/regions/ZZ/recommendations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["recommendations"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn mix_sums_to_one_hundred() {
    let (status, json) = get("/regions/CA/mix").await;
    assert_eq!(status, StatusCode::OK);
    let total: f64 = json["mix"]
        .as_object()
        .unwrap()
        .values()
        .filter_map(Value::as_f64)
        .sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn recommendations_for_idaho() {
    let (status, json) = get("/regions/ID/recommendations").await;
    assert_eq!(status, StatusCode::OK);
    let recs = json["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["source"], "geothermal");
}

#[tokio::test]
async fn price_with_years_and_population() {
    let (status, json) = get("/regions/TX/price?years=2025,2030&population=2000000").await;
    assert_eq!(status, StatusCode::OK);
    let by_year = json["forecast_by_year"].as_object().unwrap();
    assert_eq!(by_year.len(), 2);
    assert_eq!(by_year["2025"], json["current_price_cents_per_kwh"]);
}

#[tokio::test]
async fn malformed_query_returns_400() {
    for uri in [
        "/regions/TX/price?years=2030,later",
        "/regions/TX/price?population=many",
        "/regions/TX/recommendations?future_demand_mwh=x",
        "/regions/TX/outlook?lat=30.2",
    ] {
        let (status, json) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json.get("error").is_some(), "{uri}");
    }
}

#[tokio::test]
async fn extreme_years_are_rejected() {
    for uri in [
        "/regions/TX/price?years=-2147483648",
        "/regions/TX/price?years=2030,2147483647",
        "/regions/TX/outlook?years=1899",
    ] {
        let (status, json) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].as_str().is_some_and(|e| e.contains("out of range")), "{uri}");
    }
    let (status, _) = get("/regions/TX/price?years=1900,2200").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn outlook_with_location_includes_demand() {
    let (status, json) = get("/regions/TX/outlook?years=2030&lat=30.27&lon=-97.74&population=950000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["region"], "TX");
    assert!(json["demand"]["predicted"].as_f64().is_some_and(|d| d > 0.0));
    assert!(json["price_level"].is_string());
}
