//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use grid_outlook::config::OutlookConfig;
use grid_outlook::engine::OutlookEngine;
use grid_outlook::gateway::ManualClock;

/// 2025-06-01T00:00:00Z in epoch milliseconds.
pub const JUNE_2025_MS: u64 = 1_748_736_000_000;

/// Tolerance for floating-point comparisons.
pub const EPS: f64 = 1e-6;

/// Manual clock reading 2025-06-01.
pub fn june_2025_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(JUNE_2025_MS))
}

/// Engine with every remote call simulated.
pub fn offline_engine() -> OutlookEngine {
    engine_with(&OutlookConfig::offline(), june_2025_clock())
}

/// Engine over `config` and `clock`.
pub fn engine_with(config: &OutlookConfig, clock: Arc<ManualClock>) -> OutlookEngine {
    OutlookEngine::new(config, clock).expect("engine should build")
}

/// Configuration whose sources all point at `server_url`, with tokens set
/// and a single attempt per fetch.
pub fn mock_config(server_url: &str) -> OutlookConfig {
    let mut config = OutlookConfig::default();
    config.gateway.max_attempts = 1;
    config.gateway.timeout_secs = 5;
    config.noaa.base_url = server_url.to_string();
    config.noaa.token = Some("noaa-token".into());
    config.eia.base_url = server_url.to_string();
    config.eia.token = Some("eia-token".into());
    config.open_meteo.archive_url = format!("{server_url}/archive");
    config.open_meteo.forecast_url = format!("{server_url}/forecast");
    config.open_meteo.climate_url = format!("{server_url}/climate");
    config
}

/// Asserts `a` and `b` agree to within [`EPS`].
pub fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < EPS, "{a} != {b}");
}
