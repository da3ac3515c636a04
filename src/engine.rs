//! Outlook engine that wires the profile table, calculators and data hub.
//!
//! [`OutlookEngine`] is the one entry point the CLI and HTTP API share. The
//! pure calculations (balance, mix, recommendations, price) never touch the
//! network; only [`OutlookEngine::demand_estimate`] and
//! [`OutlookEngine::outlook`] with a location go through the [`DataHub`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::balance::{BalanceCalculator, EnergyBalance, GenerationMix};
use crate::config::{EngineConfig, OutlookConfig};
use crate::demand::{DemandEstimate, DemandProjector, baseline_from_population, estimate_demand};
use crate::error::OutlookError;
use crate::gateway::clock::Clock;
use crate::price::{PriceForecast, PriceLevel, PriceProjector};
use crate::profile::{RegionProfileStore, resolve_region};
use crate::recommend::{ExpansionRecommendation, RecommendationEngine};
use crate::report::RegionOutlook;
use crate::sources::eia::DEFAULT_POPULATION;
use crate::sources::{DataHub, GeoPoint};

/// What to derive for one region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlookRequest {
    /// Region code or state name.
    pub region: String,
    /// Calendar years to forecast prices for; empty means the configured
    /// base year plus 5 and 10.
    pub years: Vec<i32>,
    /// Locality population for the urban premium and demand baseline.
    pub population: Option<u64>,
    /// Locality coordinates; enables the demand estimate.
    pub location: Option<GeoPoint>,
    /// Expected annual demand (MWh) used instead of today's consumption
    /// when sizing recommendations.
    pub future_demand_mwh: Option<f64>,
}

impl OutlookRequest {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }
}

/// Region calculators plus remote data access.
#[derive(Debug)]
pub struct OutlookEngine {
    settings: EngineConfig,
    store: RegionProfileStore,
    demand: DemandProjector,
    hub: DataHub,
}

impl OutlookEngine {
    /// Creates a new engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `clock` - Time source for caches and the reference year
    ///
    /// # Errors
    ///
    /// Returns `OutlookError::Config` if the profile table cannot be loaded
    /// and `OutlookError::Gateway` if the HTTP client cannot be built.
    pub fn new(config: &OutlookConfig, clock: Arc<dyn Clock>) -> Result<Self, OutlookError> {
        let store = config.engine.profile_store()?;
        let populations: HashMap<String, u64> = store
            .regions()
            .into_iter()
            .filter_map(|code| store.population(code).map(|p| (code.to_string(), p)))
            .collect();
        let hub = DataHub::new(config, clock, populations)?;
        info!(
            regions = store.len(),
            offline = config.gateway.offline,
            "outlook engine ready"
        );
        Ok(Self {
            settings: config.engine.clone(),
            store,
            demand: DemandProjector::default(),
            hub,
        })
    }

    pub fn store(&self) -> &RegionProfileStore {
        &self.store
    }

    /// Remote sources, for history and weather queries.
    pub fn hub(&self) -> &DataHub {
        &self.hub
    }

    pub fn settings(&self) -> &EngineConfig {
        &self.settings
    }

    pub fn calculator(&self) -> BalanceCalculator<'_> {
        BalanceCalculator::with_capacity_factor(&self.store, self.settings.capacity_factor)
    }

    pub fn energy_balance(&self, region: &str) -> EnergyBalance {
        self.calculator().energy_balance(region)
    }

    pub fn generation_mix(&self, region: &str) -> GenerationMix {
        self.calculator().generation_mix(region)
    }

    pub fn renewable_percentage(&self, region: &str) -> f64 {
        self.calculator().renewable_percentage(region)
    }

    /// Ranked capacity additions, optionally sized against future demand.
    pub fn recommendations(
        &self,
        region: &str,
        future_demand_mwh: Option<f64>,
    ) -> Vec<ExpansionRecommendation> {
        RecommendationEngine::new(self.calculator()).recommend_for_demand(region, future_demand_mwh)
    }

    fn price_projector(&self) -> PriceProjector<'_> {
        PriceProjector::with_settings(self.calculator(), self.settings.price_settings())
    }

    /// Current price and one projected price per requested year.
    pub fn price_forecast(
        &self,
        region: &str,
        years: &[i32],
        population: Option<u64>,
    ) -> PriceForecast {
        let years = if years.is_empty() {
            self.default_years()
        } else {
            years.to_vec()
        };
        self.price_projector().forecast(region, &years, population)
    }

    /// Base year plus 5 and plus 10.
    pub fn default_years(&self) -> Vec<i32> {
        let base = self.settings.base_year;
        vec![base.saturating_add(5), base.saturating_add(10)]
    }

    /// Weather-adjusted demand for a locality.
    ///
    /// Uses a climate projection when `target_year` lies after the clock's
    /// current year and the short-range forecast otherwise. Falls back to
    /// growth-rate scaling when no weather summary is available.
    ///
    /// # Arguments
    ///
    /// * `location` - Locality coordinates
    /// * `population` - Locality population; `DEFAULT_POPULATION` if unknown
    /// * `target_year` - Year the estimate is for, if any
    pub async fn demand_estimate(
        &self,
        location: GeoPoint,
        population: Option<u64>,
        target_year: Option<i32>,
    ) -> DemandEstimate {
        let baseline =
            baseline_from_population(population.unwrap_or(DEFAULT_POPULATION), location.lat);
        let reference_year = self.hub.weather.reference_year();
        let weather = match target_year {
            Some(year) if year > reference_year => {
                let start = format!("{year}-01-01");
                let end = format!("{year}-12-31");
                self.hub.weather.climate_projection(location, &start, &end).await
            }
            _ => self.hub.weather.default_forecast(location).await,
        };
        let summary = weather.summary.as_ref().map(|s| (s, weather.simulated));
        let estimate = estimate_demand(
            &self.demand,
            baseline,
            summary,
            self.settings.demand_growth_rate,
        );
        debug!(
            baseline = estimate.baseline,
            predicted = estimate.predicted,
            basis = %estimate.basis,
            "demand estimate"
        );
        estimate
    }

    /// Full outlook for one region.
    ///
    /// Unknown regions produce an all-zero balance, no recommendations and
    /// prices from the default base price.
    pub async fn outlook(&self, request: &OutlookRequest) -> RegionOutlook {
        let region = resolve_region(&request.region);
        let calc = self.calculator();
        let price = self.price_forecast(&region, &request.years, request.population);

        let demand = match request.location {
            Some(location) => {
                let population = request.population.or_else(|| self.store.population(&region));
                let target_year = price.forecast_by_year.keys().next().copied();
                Some(self.demand_estimate(location, population, target_year).await)
            }
            None => None,
        };

        RegionOutlook {
            balance: calc.energy_balance(&region),
            mix: calc.generation_mix(&region),
            renewable_pct: calc.renewable_percentage(&region),
            recommendations: self.recommendations(&region, request.future_demand_mwh),
            price_level: PriceLevel::classify(price.current_price_cents_per_kwh),
            price,
            demand,
            region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::DemandBasis;
    use crate::gateway::ManualClock;
    use crate::profile::EnergySource;

    fn engine() -> OutlookEngine {
        OutlookEngine::new(&OutlookConfig::offline(), Arc::new(ManualClock::new(0))).unwrap()
    }

    #[test]
    fn test_populations_reach_electricity_simulation() {
        let e = engine();
        assert!(e.store().population("TX").is_some());
        assert_eq!(e.default_years(), vec![2030, 2035]);
    }

    #[test]
    fn test_empty_years_use_defaults() {
        let e = engine();
        let f = e.price_forecast("TX", &[], None);
        let years: Vec<i32> = f.forecast_by_year.keys().copied().collect();
        assert_eq!(years, vec![2030, 2035]);
    }

    #[tokio::test]
    async fn test_outlook_without_location_has_no_demand() {
        let e = engine();
        let o = e.outlook(&OutlookRequest::new("Texas")).await;
        assert_eq!(o.region, "TX");
        assert!(o.demand.is_none());
        assert!(o.has_capacity());
        assert_eq!(o.recommendations[0].source, EnergySource::Solar);
    }

    #[tokio::test]
    async fn test_offline_demand_uses_simulated_weather() {
        let e = engine();
        let request = OutlookRequest {
            location: Some(GeoPoint::new(30.27, -97.74)),
            population: Some(1_000_000),
            ..OutlookRequest::new("TX")
        };
        let o = e.outlook(&request).await;
        let demand = o.demand.unwrap();
        assert_eq!(demand.basis, DemandBasis::Weather { simulated: true });
        assert!((demand.baseline - baseline_from_population(1_000_000, 30.27)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_region_outlook() {
        let e = engine();
        let o = e.outlook(&OutlookRequest::new("ZZ")).await;
        assert!(!o.has_capacity());
        assert!(o.recommendations.is_empty());
        assert_eq!(o.balance.self_sufficiency_pct, None);
        assert_eq!(o.price.current_price_cents_per_kwh, 12.0);
    }
}
