//! Per-region outlook combining balance, recommendations, price and demand.

use std::fmt;

use serde::Serialize;

use crate::balance::{EnergyBalance, GenerationMix};
use crate::demand::DemandEstimate;
use crate::price::{PriceForecast, PriceLevel};
use crate::profile::EnergySource;
use crate::recommend::ExpansionRecommendation;

/// Everything the engine derives for one region.
///
/// Built by [`crate::engine::OutlookEngine::outlook`]; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionOutlook {
    /// Resolved region code.
    pub region: String,
    pub balance: EnergyBalance,
    pub mix: GenerationMix,
    /// Renewable share of capacity, percent.
    pub renewable_pct: f64,
    pub recommendations: Vec<ExpansionRecommendation>,
    pub price: PriceForecast,
    /// Level of the current adjusted price.
    pub price_level: PriceLevel,
    /// Present only when a location was supplied.
    pub demand: Option<DemandEstimate>,
}

impl RegionOutlook {
    /// Whether the region is known to the profile table.
    pub fn has_capacity(&self) -> bool {
        self.balance.total_capacity_mw > 0.0
    }
}

impl fmt::Display for RegionOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.region)?;
        writeln!(f, "Total capacity:        {:.0} MW", self.balance.total_capacity_mw)?;
        writeln!(f, "Annual generation:     {:.0} MWh", self.balance.annual_generation_mwh)?;
        writeln!(f, "Annual consumption:    {:.0} MWh", self.balance.consumption_mwh)?;
        writeln!(f, "Surplus:               {:.0} MWh", self.balance.surplus_mwh)?;
        match self.balance.self_sufficiency_pct {
            Some(pct) => writeln!(f, "Self-sufficiency:      {pct:.2}%")?,
            None => writeln!(f, "Self-sufficiency:      n/a")?,
        }
        writeln!(f, "Renewable share:       {:.1}%", self.renewable_pct)?;

        let mix: Vec<String> = EnergySource::ALL
            .iter()
            .filter(|&&s| self.mix.get(s) > 0.0)
            .map(|&s| format!("{s} {:.1}%", self.mix.get(s)))
            .collect();
        if !mix.is_empty() {
            writeln!(f, "Generation mix:        {}", mix.join(", "))?;
        }

        writeln!(
            f,
            "Current price:         {:.2} ¢/kWh ({})",
            self.price.current_price_cents_per_kwh, self.price_level
        )?;
        for (year, price) in &self.price.forecast_by_year {
            writeln!(f, "  {year}:                {price:.2} ¢/kWh")?;
        }

        if let Some(demand) = &self.demand {
            writeln!(
                f,
                "Demand estimate:       {:.1} MW (baseline {:.1} MW, {})",
                demand.predicted, demand.baseline, demand.basis
            )?;
        }

        if self.recommendations.is_empty() {
            write!(f, "Recommendations:       none")
        } else {
            write!(f, "Recommendations:")?;
            for rec in &self.recommendations {
                write!(f, "\n  {rec}")?;
            }
            Ok(())
        }
    }
}
