//! Rule-based capacity expansion recommendations.
//!
//! Rules are independent and additive. The returned list follows rule
//! declaration order (nuclear, solar, wind, geothermal, gas bridge), not a
//! sort by priority or size.

use std::fmt;

use serde::Serialize;

use crate::balance::BalanceCalculator;
use crate::profile::{EnergySource, resolve_region};

/// Regions with excellent solar resource.
pub const HIGH_SOLAR_REGIONS: &[&str] = &["AZ", "NV", "CA", "NM", "TX", "FL"];
/// Regions with strong wind resource.
pub const HIGH_WIND_REGIONS: &[&str] = &["TX", "IA", "OK", "KS", "ND", "SD", "NE"];
/// Regions with untapped geothermal potential.
pub const GEOTHERMAL_REGIONS: &[&str] = &["CA", "NV", "UT", "ID", "OR", "HI"];

/// Deficit (MWh) above which nuclear is suggested for regions without it.
pub const NUCLEAR_DEFICIT_THRESHOLD_MWH: f64 = 5_000_000.0;
/// Renewable share (%) below which the nuclear deficit rule applies.
pub const NUCLEAR_RENEWABLE_CEILING_PCT: f64 = 30.0;
/// Existing geothermal capacity (MW) below which expansion is suggested.
pub const GEOTHERMAL_CAPACITY_CEILING_MW: f64 = 1000.0;
/// Deficit (MWh) above which a gas bridge is suggested.
pub const GAS_BRIDGE_DEFICIT_THRESHOLD_MWH: f64 = 1_000_000_000.0;

/// Recommendation priority. Declared highest first, so `High < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        })
    }
}

/// Qualitative build and running cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CostProfile {
    HighInitialLowOperational,
    MediumInitialMinimalOperational,
    LowInitialMinimalOperational,
    LowInitialMediumOperational,
}

impl fmt::Display for CostProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HighInitialLowOperational => "High initial, low operational",
            Self::MediumInitialMinimalOperational => "Medium initial, minimal operational",
            Self::LowInitialMinimalOperational => "Low initial, minimal operational",
            Self::LowInitialMediumOperational => "Low initial, medium operational",
        })
    }
}

/// One suggested capacity expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpansionRecommendation {
    pub source: EnergySource,
    /// Set for the natural gas bridge entry.
    pub transitional: bool,
    pub priority: Priority,
    pub reason: String,
    pub suggested_increase_mw: f64,
    pub cost_profile: CostProfile,
}

impl fmt::Display for ExpansionRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}{}: +{:.0} MW ({}; {})",
            self.priority,
            self.source,
            if self.transitional { " (bridge)" } else { "" },
            self.suggested_increase_mw,
            self.reason,
            self.cost_profile
        )
    }
}

/// Region membership sets driving the resource-based rules.
#[derive(Debug, Clone)]
pub struct SuitabilitySets {
    pub high_solar: Vec<String>,
    pub high_wind: Vec<String>,
    pub geothermal: Vec<String>,
}

impl Default for SuitabilitySets {
    fn default() -> Self {
        let owned = |codes: &[&str]| codes.iter().map(|c| (*c).to_string()).collect();
        Self {
            high_solar: owned(HIGH_SOLAR_REGIONS),
            high_wind: owned(HIGH_WIND_REGIONS),
            geothermal: owned(GEOTHERMAL_REGIONS),
        }
    }
}

/// Deterministic expansion planner over a [`BalanceCalculator`].
#[derive(Debug, Clone)]
pub struct RecommendationEngine<'a> {
    calculator: BalanceCalculator<'a>,
    sets: SuitabilitySets,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(calculator: BalanceCalculator<'a>) -> Self {
        Self::with_sets(calculator, SuitabilitySets::default())
    }

    pub fn with_sets(calculator: BalanceCalculator<'a>, sets: SuitabilitySets) -> Self {
        Self { calculator, sets }
    }

    /// Recommendations for a region against its current consumption.
    pub fn recommend(&self, region: &str) -> Vec<ExpansionRecommendation> {
        self.recommend_for_demand(region, None)
    }

    /// Recommendations for a region, optionally against a projected demand
    /// (MWh) instead of current consumption.
    ///
    /// The deficit is `demand − annual generation`; a negative deficit is a
    /// surplus and only the membership rules can fire.
    pub fn recommend_for_demand(
        &self,
        region: &str,
        future_demand_mwh: Option<f64>,
    ) -> Vec<ExpansionRecommendation> {
        let code = resolve_region(region);
        let balance = self.calculator.energy_balance(&code);
        let renewable_pct = self.calculator.renewable_percentage(&code);
        let capacity = self.calculator.store().capacity_mix(&code);

        let demand = future_demand_mwh.unwrap_or(balance.consumption_mwh);
        let deficit = demand - balance.annual_generation_mwh;

        let mut out = Vec::new();

        if capacity.nuclear > 0.0 && balance.is_deficit() {
            out.push(ExpansionRecommendation {
                source: EnergySource::Nuclear,
                transitional: false,
                priority: Priority::High,
                reason: "Existing nuclear infrastructure; reliable baseload power".into(),
                suggested_increase_mw: (deficit * 0.0002).max(1000.0),
                cost_profile: CostProfile::HighInitialLowOperational,
            });
        } else if deficit > NUCLEAR_DEFICIT_THRESHOLD_MWH
            && renewable_pct < NUCLEAR_RENEWABLE_CEILING_PCT
        {
            out.push(ExpansionRecommendation {
                source: EnergySource::Nuclear,
                transitional: false,
                priority: Priority::Medium,
                reason: "Large deficit; need reliable baseload capacity".into(),
                suggested_increase_mw: 2000.0,
                cost_profile: CostProfile::HighInitialLowOperational,
            });
        }

        if contains(&self.sets.high_solar, &code) {
            out.push(ExpansionRecommendation {
                source: EnergySource::Solar,
                transitional: false,
                priority: Priority::High,
                reason: "Excellent solar resource; decreasing costs".into(),
                suggested_increase_mw: (deficit * 0.0001).max(500.0),
                cost_profile: CostProfile::MediumInitialMinimalOperational,
            });
        }

        if contains(&self.sets.high_wind, &code) {
            out.push(ExpansionRecommendation {
                source: EnergySource::Wind,
                transitional: false,
                priority: Priority::High,
                reason: "Strong wind resources; proven technology".into(),
                suggested_increase_mw: (deficit * 0.00015).max(1000.0),
                cost_profile: CostProfile::LowInitialMinimalOperational,
            });
        }

        if contains(&self.sets.geothermal, &code)
            && capacity.geothermal < GEOTHERMAL_CAPACITY_CEILING_MW
        {
            out.push(ExpansionRecommendation {
                source: EnergySource::Geothermal,
                transitional: false,
                priority: Priority::Medium,
                reason: "Untapped geothermal potential; baseload power".into(),
                suggested_increase_mw: 500.0,
                cost_profile: CostProfile::HighInitialLowOperational,
            });
        }

        if deficit > GAS_BRIDGE_DEFICIT_THRESHOLD_MWH {
            out.push(ExpansionRecommendation {
                source: EnergySource::Gas,
                transitional: true,
                priority: Priority::Low,
                reason: "Quick deployment; transition fuel".into(),
                suggested_increase_mw: (deficit * 0.0001).max(500.0),
                cost_profile: CostProfile::LowInitialMediumOperational,
            });
        }

        out
    }
}

fn contains(set: &[String], code: &str) -> bool {
    set.iter().any(|c| c.eq_ignore_ascii_case(code))
}
