//! Retail price adjustment and multi-year price projection.
//!
//! The current price scales a region's base price by three independent
//! factors (deficit, renewable share, urban premium). Forecasts apply a
//! per-year projection to that current price; every target year is computed
//! on its own, with no state carried between years.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::balance::{BalanceCalculator, EnergyBalance};
use crate::profile::resolve_region;

/// Price multiplier for urban localities.
pub const DEFAULT_URBAN_PREMIUM: f64 = 1.05;
/// Locality population at or above which the urban premium applies.
pub const DEFAULT_URBAN_POPULATION_THRESHOLD: u64 = 1_000_000;
/// Year the forecasts are measured from.
pub const DEFAULT_BASE_YEAR: i32 = 2025;
/// Years accepted as forecast targets and as the base year.
pub const FORECAST_YEARS: RangeInclusive<i32> = 1900..=2200;

const INFLATION_RATE: f64 = 0.02;
const RENEWABLE_GROWTH_RATE: f64 = 0.02;
const RENEWABLE_PRICE_IMPACT: f64 = 0.15;
const DEFICIT_GROWTH_RATE: f64 = 0.01;
const TECH_DISCOUNT_RATE: f64 = 0.005;

/// Tunables for the price projector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSettings {
    pub urban_premium: f64,
    pub urban_population_threshold: u64,
    pub base_year: i32,
}

impl Default for PriceSettings {
    fn default() -> Self {
        Self {
            urban_premium: DEFAULT_URBAN_PREMIUM,
            urban_population_threshold: DEFAULT_URBAN_POPULATION_THRESHOLD,
            base_year: DEFAULT_BASE_YEAR,
        }
    }
}

/// Qualitative label for a retail price in cents/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PriceLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl PriceLevel {
    /// Classifies a price: `> 20` Very High, `> 15` High, `> 12` Moderate,
    /// `> 10` Low, otherwise Very Low.
    pub fn classify(cents_per_kwh: f64) -> Self {
        if cents_per_kwh > 20.0 {
            Self::VeryHigh
        } else if cents_per_kwh > 15.0 {
            Self::High
        } else if cents_per_kwh > 12.0 {
            Self::Moderate
        } else if cents_per_kwh > 10.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        })
    }
}

/// Current price plus independently computed per-year forecasts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceForecast {
    pub current_price_cents_per_kwh: f64,
    pub forecast_by_year: BTreeMap<i32, f64>,
}

impl PriceForecast {
    /// Forecast for one year, if it was requested.
    pub fn for_year(&self, year: i32) -> Option<f64> {
        self.forecast_by_year.get(&year).copied()
    }
}

/// `1 + (100 − self-sufficiency)/100 × 0.3` in deficit, else `1.0`.
pub fn deficit_factor(balance: &EnergyBalance) -> f64 {
    match balance.self_sufficiency_pct {
        Some(pct) if pct < 100.0 => 1.0 + (100.0 - pct) / 100.0 * 0.3,
        _ => 1.0,
    }
}

/// `1 − renewable share × 0.1`, with the share given in percent.
pub fn renewable_factor(renewable_pct: f64) -> f64 {
    1.0 - (renewable_pct / 100.0) * 0.1
}

/// Projects `current_price` `years_ahead` years forward.
///
/// Negative offsets run the same formula backwards. At `years_ahead == 0`
/// the result is `current_price` exactly, since every factor is exactly 1.
pub fn project_price(current_price: f64, years_ahead: i32, in_deficit: bool) -> f64 {
    let y = f64::from(years_ahead);
    let inflation = (1.0 + INFLATION_RATE).powi(years_ahead);
    let renewable_discount = 1.0 - y * RENEWABLE_GROWTH_RATE * RENEWABLE_PRICE_IMPACT;
    let deficit_growth = if in_deficit {
        1.0 + y * DEFICIT_GROWTH_RATE
    } else {
        1.0
    };
    let tech_discount = 1.0 - y * TECH_DISCOUNT_RATE;
    current_price * inflation * renewable_discount * deficit_growth * tech_discount
}

/// Computes adjusted and forecast retail prices for regions.
#[derive(Debug, Clone, Copy)]
pub struct PriceProjector<'a> {
    calculator: BalanceCalculator<'a>,
    settings: PriceSettings,
}

impl<'a> PriceProjector<'a> {
    pub fn new(calculator: BalanceCalculator<'a>) -> Self {
        Self::with_settings(calculator, PriceSettings::default())
    }

    pub fn with_settings(calculator: BalanceCalculator<'a>, settings: PriceSettings) -> Self {
        Self {
            calculator,
            settings,
        }
    }

    pub fn settings(&self) -> &PriceSettings {
        &self.settings
    }

    /// Whether a locality of this population earns the urban premium.
    pub fn is_urban(&self, locality_population: Option<u64>) -> bool {
        locality_population.is_some_and(|p| p >= self.settings.urban_population_threshold)
    }

    /// Adjusted price in cents/kWh for today.
    ///
    /// # Arguments
    ///
    /// * `region` - Region code or state name
    /// * `locality_population` - Population of the queried locality, if known
    pub fn current_price(&self, region: &str, locality_population: Option<u64>) -> f64 {
        let code = resolve_region(region);
        let balance = self.calculator.energy_balance(&code);
        let base = self.calculator.store().base_price(&code);
        let urban = if self.is_urban(locality_population) {
            self.settings.urban_premium
        } else {
            1.0
        };
        base * deficit_factor(&balance)
            * renewable_factor(self.calculator.renewable_percentage(&code))
            * urban
    }

    /// Price for one target year, measured from the configured base year.
    pub fn price_for_year(
        &self,
        region: &str,
        target_year: i32,
        locality_population: Option<u64>,
    ) -> f64 {
        let code = resolve_region(region);
        let in_deficit = self.calculator.energy_balance(&code).is_deficit();
        project_price(
            self.current_price(&code, locality_population),
            target_year.saturating_sub(self.settings.base_year),
            in_deficit,
        )
    }

    /// Current price and one forecast per requested year. Duplicate years
    /// collapse into one entry.
    pub fn forecast(
        &self,
        region: &str,
        years: &[i32],
        locality_population: Option<u64>,
    ) -> PriceForecast {
        let code = resolve_region(region);
        let current = self.current_price(&code, locality_population);
        let in_deficit = self.calculator.energy_balance(&code).is_deficit();
        let forecast_by_year = years
            .iter()
            .map(|&year| {
                let years_ahead = year.saturating_sub(self.settings.base_year);
                (year, project_price(current, years_ahead, in_deficit))
            })
            .collect();
        PriceForecast {
            current_price_cents_per_kwh: current,
            forecast_by_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CapacityMix, RegionEnergyProfile, RegionProfileStore};

    fn deficit_store() -> RegionProfileStore {
        // 1000 MW coal: 4,380,000 MWh against 8,760,000 MWh, 50% self-sufficient.
        RegionProfileStore::from_profiles([(
            "XA",
            RegionEnergyProfile {
                capacity: CapacityMix::from_array([0.0, 1000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
                annual_consumption_mwh: 8_760_000.0,
                base_price_cents_per_kwh: Some(10.0),
                population: None,
            },
        )])
        .unwrap()
    }

    #[test]
    fn forecast_at_base_year_equals_current_price() {
        let store = RegionProfileStore::builtin();
        let projector = PriceProjector::new(BalanceCalculator::new(&store));
        for region in store.regions() {
            let f = projector.forecast(region, &[DEFAULT_BASE_YEAR], Some(2_000_000));
            assert_eq!(f.for_year(DEFAULT_BASE_YEAR), Some(f.current_price_cents_per_kwh));
        }
        for price in [0.0, 7.3, 12.0, 31.25] {
            assert_eq!(project_price(price, 0, true), price);
            assert_eq!(project_price(price, 0, false), price);
        }
    }

    #[test]
    fn deficit_raises_current_price() {
        let store = deficit_store();
        let projector = PriceProjector::new(BalanceCalculator::new(&store));
        // 10 × (1 + 0.5 × 0.3) × 1.0 × 1.0
        assert!((projector.current_price("XA", None) - 11.5).abs() < 1e-12);
    }

    #[test]
    fn urban_premium_applies_at_threshold() {
        let store = deficit_store();
        let projector = PriceProjector::new(BalanceCalculator::new(&store));
        let rural = projector.current_price("XA", Some(999_999));
        let urban = projector.current_price("XA", Some(1_000_000));
        assert_eq!(rural, projector.current_price("XA", None));
        assert!((urban / rural - 1.05).abs() < 1e-12);
    }

    #[test]
    fn texas_current_price() {
        let store = RegionProfileStore::builtin();
        let calc = BalanceCalculator::new(&store);
        let projector = PriceProjector::new(calc);
        let expected = store.base_price("TX") * renewable_factor(calc.renewable_percentage("TX"));
        assert!((projector.current_price("Texas", None) - expected).abs() < 1e-12);
    }

    #[test]
    fn five_year_projection_formula() {
        let p = project_price(10.0, 5, true);
        let expected = 10.0 * 1.02_f64.powi(5) * (1.0 - 5.0 * 0.003) * 1.05 * (1.0 - 0.025);
        assert!((p - expected).abs() < 1e-12);
        let q = project_price(10.0, 5, false);
        assert!((p / q - 1.05).abs() < 1e-12);
    }

    #[test]
    fn forecast_years_are_independent() {
        let store = deficit_store();
        let projector = PriceProjector::new(BalanceCalculator::new(&store));
        let both = projector.forecast("XA", &[2030, 2035], None);
        let single = projector.forecast("XA", &[2035], None);
        assert_eq!(both.for_year(2035), single.for_year(2035));
        assert_eq!(both.for_year(2035), Some(projector.price_for_year("XA", 2035, None)));
    }

    #[test]
    fn extreme_years_do_not_overflow() {
        let store = RegionProfileStore::builtin();
        let projector = PriceProjector::new(BalanceCalculator::new(&store));
        let f = projector.forecast("TX", &[i32::MIN, i32::MAX], None);
        assert_eq!(f.forecast_by_year.len(), 2);
        let _ = projector.price_for_year("TX", i32::MIN, None);
    }

    #[test]
    fn unknown_region_uses_default_base_price() {
        let store = RegionProfileStore::builtin();
        let projector = PriceProjector::new(BalanceCalculator::new(&store));
        // Zero consumption leaves self-sufficiency undefined: no deficit factor.
        assert_eq!(projector.current_price("ZZ", None), 12.0);
    }

    #[test]
    fn price_levels() {
        assert_eq!(PriceLevel::classify(25.0), PriceLevel::VeryHigh);
        assert_eq!(PriceLevel::classify(20.0), PriceLevel::High);
        assert_eq!(PriceLevel::classify(12.5), PriceLevel::Moderate);
        assert_eq!(PriceLevel::classify(12.0), PriceLevel::Low);
        assert_eq!(PriceLevel::classify(10.0), PriceLevel::VeryLow);
        assert_eq!(PriceLevel::VeryHigh.to_string(), "Very High");
    }
}
