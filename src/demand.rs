//! Weather-adjusted electricity demand.
//!
//! [`DemandProjector::predict`] needs a weather summary. When none is
//! available the caller decides what to do; [`estimate_demand`] is the
//! composition used by the engine, falling back to a flat growth multiplier.

use std::fmt;

use serde::Serialize;

use crate::sources::open_meteo::WeatherSummary;

/// Per-capita demand in MW (15 kW).
pub const PER_CAPITA_DEMAND_MW: f64 = 0.015;
/// Annual growth multiplier used when no weather summary is available.
pub const DEFAULT_DEMAND_GROWTH_RATE: f64 = 0.015;

const COOLING_THRESHOLD_C: f64 = 20.0;
const HEATING_THRESHOLD_C: f64 = 15.0;
const SOLAR_NORMALISATION: f64 = 250.0;

/// Converts a baseline demand into a weather-adjusted prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandProjector {
    pub cooling_weight: f64,
    pub heating_weight: f64,
    pub solar_offset_weight: f64,
}

impl Default for DemandProjector {
    fn default() -> Self {
        Self {
            cooling_weight: 0.3,
            heating_weight: 0.25,
            solar_offset_weight: 0.1,
        }
    }
}

impl DemandProjector {
    /// `(avg_temp_mean − 20) / 10`, floored at zero.
    pub fn cooling_factor(avg_temp_mean: f64) -> f64 {
        ((avg_temp_mean - COOLING_THRESHOLD_C) / 10.0).max(0.0)
    }

    /// `(15 − avg_temp_mean) / 15`, floored at zero.
    pub fn heating_factor(avg_temp_mean: f64) -> f64 {
        ((HEATING_THRESHOLD_C - avg_temp_mean) / 15.0).max(0.0)
    }

    /// Multiplier applied to the baseline for the given conditions.
    pub fn weather_impact(&self, avg_temp_mean: f64, avg_solar_radiation: f64) -> f64 {
        1.0 + Self::cooling_factor(avg_temp_mean) * self.cooling_weight
            + Self::heating_factor(avg_temp_mean) * self.heating_weight
            - (avg_solar_radiation / SOLAR_NORMALISATION) * self.solar_offset_weight
    }

    /// Weather-adjusted demand, in the unit of `baseline`.
    pub fn predict(&self, baseline: f64, summary: &WeatherSummary) -> f64 {
        baseline * self.weather_impact(summary.avg_temp_mean, summary.avg_solar_radiation)
    }
}

/// Locality baseline in MW: `population × 0.015 × (1 + |lat − 35| × 0.01)`.
///
/// Demand rises with distance from the temperate 35th parallel.
pub fn baseline_from_population(population: u64, latitude: f64) -> f64 {
    population as f64 * PER_CAPITA_DEMAND_MW * (1.0 + (latitude - 35.0).abs() * 0.01)
}

/// How a [`DemandEstimate`] was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DemandBasis {
    /// Weather summary from the data gateway.
    Weather {
        /// The summary itself was synthesised.
        simulated: bool,
    },
    /// No summary; flat growth multiplier applied.
    GrowthFallback,
}

impl fmt::Display for DemandBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weather { simulated: false } => f.write_str("weather"),
            Self::Weather { simulated: true } => f.write_str("simulated weather"),
            Self::GrowthFallback => f.write_str("growth fallback"),
        }
    }
}

/// Predicted demand together with the baseline it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandEstimate {
    pub baseline: f64,
    pub predicted: f64,
    pub basis: DemandBasis,
}

/// Predicts from `summary` when present, else `baseline × (1 + growth_rate)`.
pub fn estimate_demand(
    projector: &DemandProjector,
    baseline: f64,
    summary: Option<(&WeatherSummary, bool)>,
    growth_rate: f64,
) -> DemandEstimate {
    match summary {
        Some((summary, simulated)) => DemandEstimate {
            baseline,
            predicted: projector.predict(baseline, summary),
            basis: DemandBasis::Weather { simulated },
        },
        None => DemandEstimate {
            baseline,
            predicted: baseline * (1.0 + growth_rate),
            basis: DemandBasis::GrowthFallback,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(temp: f64, solar: f64) -> WeatherSummary {
        WeatherSummary {
            avg_temp_mean: temp,
            avg_solar_radiation: solar,
            ..WeatherSummary::default()
        }
    }

    #[test]
    fn mild_weather_without_sun_is_neutral() {
        let p = DemandProjector::default();
        // 17.5 °C sits between the heating and cooling thresholds.
        assert_eq!(p.predict(100.0, &summary(17.5, 0.0)), 100.0);
    }

    #[test]
    fn hot_weather_adds_cooling_load() {
        let p = DemandProjector::default();
        // cooling = 1.0, solar offset = 0.4 → 1 + 0.3 − 0.04
        let got = p.predict(100.0, &summary(30.0, 100.0));
        assert!((got - 126.0).abs() < 1e-9);
    }

    #[test]
    fn cold_weather_adds_heating_load() {
        let p = DemandProjector::default();
        // heating = 1.0 at 0 °C → 1 + 0.25
        assert!((p.predict(200.0, &summary(0.0, 0.0)) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn population_baseline_grows_away_from_35th_parallel() {
        assert!((baseline_from_population(1_000_000, 35.0) - 15_000.0).abs() < 1e-9);
        assert!((baseline_from_population(1_000_000, 45.0) - 16_500.0).abs() < 1e-9);
        assert_eq!(
            baseline_from_population(10, 25.0),
            baseline_from_population(10, 45.0)
        );
    }

    #[test]
    fn missing_summary_falls_back_to_growth() {
        let p = DemandProjector::default();
        let est = estimate_demand(&p, 1000.0, None, DEFAULT_DEMAND_GROWTH_RATE);
        assert_eq!(est.basis, DemandBasis::GrowthFallback);
        assert!((est.predicted - 1015.0).abs() < 1e-9);

        let s = summary(30.0, 0.0);
        let est = estimate_demand(&p, 1000.0, Some((&s, true)), DEFAULT_DEMAND_GROWTH_RATE);
        assert_eq!(est.basis, DemandBasis::Weather { simulated: true });
        assert!((est.predicted - 1300.0).abs() < 1e-9);
    }
}
