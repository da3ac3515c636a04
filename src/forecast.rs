//! Long-range climate projections used when the climate model is unavailable.

use crate::sources::open_meteo::WeatherSummary;

/// Warming trend applied to the mean temperature (°C per year).
pub const TEMP_TREND_PER_YEAR: f64 = 0.03;

/// Days covered by a projected summary.
pub const PROJECTED_DAYS: usize = 365;

/// Extrapolates a historical summary `years_ahead` years forward.
///
/// Maxima warm faster (×1.2) and minima slower (×0.8) than the mean;
/// humidity and precipitation creep up while solar radiation decays by 2%
/// a year. Wind speed is carried over unchanged.
///
/// # Arguments
///
/// * `history` - Summary of the reference period
/// * `years_ahead` - Target start year minus the reference year (may be negative)
pub fn project_from_trend(history: &WeatherSummary, years_ahead: i32) -> WeatherSummary {
    let y = f64::from(years_ahead);
    let warming = TEMP_TREND_PER_YEAR * y;
    WeatherSummary {
        avg_temp_max: history.avg_temp_max + warming * 1.2,
        avg_temp_min: history.avg_temp_min + warming * 0.8,
        avg_temp_mean: history.avg_temp_mean + warming,
        avg_humidity: history.avg_humidity * (1.0 + y * 0.001),
        avg_wind_speed: history.avg_wind_speed,
        total_precipitation: history.total_precipitation * (1.0 + y * 0.005),
        avg_solar_radiation: history.avg_solar_radiation * 0.98_f64.powi(years_ahead),
        days_analyzed: PROJECTED_DAYS,
    }
}

/// Latitude-only climate estimate, warmed by the same trend.
///
/// Base temperature falls 0.6 °C per degree of latitude from 30 °C at the
/// equator; humidity is in percent. Used when neither the climate model nor
/// real history exists.
pub fn simulate_projection(latitude: f64, years_ahead: i32) -> WeatherSummary {
    let abs_lat = latitude.abs();
    let base_temp = 30.0 - abs_lat * 0.6;
    let warming = TEMP_TREND_PER_YEAR * f64::from(years_ahead);
    WeatherSummary {
        avg_temp_max: base_temp + 8.0 + warming,
        avg_temp_min: base_temp - 5.0 + warming,
        avg_temp_mean: base_temp + warming,
        avg_humidity: 65.0 - abs_lat * 0.5,
        avg_wind_speed: 3.0 + (abs_lat * std::f64::consts::PI / 90.0).sin().abs() * 2.0,
        total_precipitation: 800.0 - abs_lat * 10.0,
        avg_solar_radiation: 200.0 - abs_lat * 2.0,
        days_analyzed: PROJECTED_DAYS,
    }
}
