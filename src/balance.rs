//! Supply/demand balance derived from region profiles.

use std::fmt;

use serde::Serialize;

use crate::profile::{EnergySource, RegionProfileStore};

/// Hours in a (non-leap) year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Share of nameplate capacity assumed to be delivered over a year.
pub const DEFAULT_CAPACITY_FACTOR: f64 = 0.5;

/// Annual energy balance of one region. Computed fresh on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBalance {
    /// Sum of all source capacities (MW).
    pub total_capacity_mw: f64,
    /// `total_capacity_mw × 8760 × capacity factor` (MWh).
    pub annual_generation_mwh: f64,
    /// Annual consumption (MWh).
    pub consumption_mwh: f64,
    /// `annual_generation_mwh − consumption_mwh` (MWh, negative for a deficit).
    pub surplus_mwh: f64,
    /// `generation / consumption × 100`; `None` when consumption is zero.
    pub self_sufficiency_pct: Option<f64>,
}

impl EnergyBalance {
    /// Builds the balance from capacity and consumption.
    pub fn new(total_capacity_mw: f64, consumption_mwh: f64, capacity_factor: f64) -> Self {
        let annual_generation_mwh = total_capacity_mw * HOURS_PER_YEAR * capacity_factor;
        let self_sufficiency_pct = if consumption_mwh > 0.0 {
            Some(annual_generation_mwh / consumption_mwh * 100.0)
        } else {
            None
        };
        Self {
            total_capacity_mw,
            annual_generation_mwh,
            consumption_mwh,
            surplus_mwh: annual_generation_mwh - consumption_mwh,
            self_sufficiency_pct,
        }
    }

    /// Generation strictly exceeds consumption.
    pub fn is_surplus(&self) -> bool {
        self.annual_generation_mwh > self.consumption_mwh
    }

    /// Self-sufficiency is defined and below 100%.
    pub fn is_deficit(&self) -> bool {
        self.self_sufficiency_pct.is_some_and(|pct| pct < 100.0)
    }
}

impl fmt::Display for EnergyBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity={:.0} MW  generation={:.0} MWh  consumption={:.0} MWh  surplus={:.0} MWh  ",
            self.total_capacity_mw,
            self.annual_generation_mwh,
            self.consumption_mwh,
            self.surplus_mwh
        )?;
        match self.self_sufficiency_pct {
            Some(pct) => write!(f, "self-sufficiency={pct:.2}%"),
            None => write!(f, "self-sufficiency=n/a"),
        }
    }
}

/// Capacity share per source, in percent.
///
/// For a region with zero total capacity every share is `0.0`, so the
/// shares do not sum to 100 in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GenerationMix {
    pub nuclear: f64,
    pub coal: f64,
    pub gas: f64,
    pub hydro: f64,
    pub wind: f64,
    pub solar: f64,
    pub geothermal: f64,
    pub biomass: f64,
}

impl GenerationMix {
    fn from_array(pct: [f64; 8]) -> Self {
        let [nuclear, coal, gas, hydro, wind, solar, geothermal, biomass] = pct;
        Self {
            nuclear,
            coal,
            gas,
            hydro,
            wind,
            solar,
            geothermal,
            biomass,
        }
    }

    /// Share of one source in percent.
    pub fn get(&self, source: EnergySource) -> f64 {
        match source {
            EnergySource::Nuclear => self.nuclear,
            EnergySource::Coal => self.coal,
            EnergySource::Gas => self.gas,
            EnergySource::Hydro => self.hydro,
            EnergySource::Wind => self.wind,
            EnergySource::Solar => self.solar,
            EnergySource::Geothermal => self.geothermal,
            EnergySource::Biomass => self.biomass,
        }
    }

    /// Sum of all shares: 100 for regions with capacity, 0 otherwise.
    pub fn sum(&self) -> f64 {
        EnergySource::ALL.iter().map(|&s| self.get(s)).sum()
    }
}

/// Derives capacity totals, mix, renewable share and balance for regions.
#[derive(Debug, Clone, Copy)]
pub struct BalanceCalculator<'a> {
    store: &'a RegionProfileStore,
    capacity_factor: f64,
}

impl<'a> BalanceCalculator<'a> {
    /// Calculator using the default 50% capacity factor.
    pub fn new(store: &'a RegionProfileStore) -> Self {
        Self::with_capacity_factor(store, DEFAULT_CAPACITY_FACTOR)
    }

    pub fn with_capacity_factor(store: &'a RegionProfileStore, capacity_factor: f64) -> Self {
        Self {
            store,
            capacity_factor,
        }
    }

    /// Profile store the calculator reads from.
    pub fn store(&self) -> &'a RegionProfileStore {
        self.store
    }

    /// Sum of the eight source capacities (MW).
    pub fn total_capacity(&self, region: &str) -> f64 {
        self.store.capacity_mix(region).total()
    }

    /// Each source's share of total capacity in percent.
    pub fn generation_mix(&self, region: &str) -> GenerationMix {
        let mix = self.store.capacity_mix(region);
        let total = mix.total();
        if total <= 0.0 {
            return GenerationMix::from_array([0.0; 8]);
        }
        GenerationMix::from_array(mix.to_array().map(|mw| mw / total * 100.0))
    }

    /// Renewable share of total capacity in percent; `0.0` for zero capacity.
    pub fn renewable_percentage(&self, region: &str) -> f64 {
        let mix = self.store.capacity_mix(region);
        let total = mix.total();
        if total <= 0.0 {
            return 0.0;
        }
        mix.renewable() / total * 100.0
    }

    /// Annual balance from current profile data.
    pub fn energy_balance(&self, region: &str) -> EnergyBalance {
        EnergyBalance::new(
            self.total_capacity(region),
            self.store.consumption(region),
            self.capacity_factor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CapacityMix, RegionEnergyProfile};

    fn single_region_store(capacity: [f64; 8], consumption: f64) -> RegionProfileStore {
        RegionProfileStore::from_profiles([(
            "XA",
            RegionEnergyProfile {
                capacity: CapacityMix::from_array(capacity),
                annual_consumption_mwh: consumption,
                base_price_cents_per_kwh: Some(10.0),
                population: None,
            },
        )])
        .unwrap()
    }

    #[test]
    fn texas_balance() {
        let store = RegionProfileStore::builtin();
        let calc = BalanceCalculator::new(&store);
        let b = calc.energy_balance("TX");
        assert_eq!(b.total_capacity_mw, 152_408.0);
        assert_eq!(b.annual_generation_mwh, 667_547_040.0);
        assert_eq!(b.surplus_mwh, 189_547_040.0);
        let pct = b.self_sufficiency_pct.unwrap();
        assert!((pct - 139.654_192).abs() < 1e-3);
        assert!(b.is_surplus());
        assert!(!b.is_deficit());
    }

    #[test]
    fn zero_consumption_has_undefined_self_sufficiency() {
        let store = single_region_store([100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.0);
        let b = BalanceCalculator::new(&store).energy_balance("XA");
        assert_eq!(b.self_sufficiency_pct, None);
        assert_eq!(b.surplus_mwh, b.annual_generation_mwh);
        assert!(!b.is_deficit());
    }

    #[test]
    fn mix_sums_to_hundred() {
        let store = RegionProfileStore::builtin();
        let calc = BalanceCalculator::new(&store);
        for region in store.regions() {
            let sum = calc.generation_mix(region).sum();
            assert!((sum - 100.0).abs() < 1e-6, "{region}: {sum}");
        }
    }

    #[test]
    fn zero_capacity_mix_is_all_zero() {
        let store = RegionProfileStore::builtin();
        let calc = BalanceCalculator::new(&store);
        let mix = calc.generation_mix("ZZ");
        assert_eq!(mix.sum(), 0.0);
        assert_eq!(calc.renewable_percentage("ZZ"), 0.0);
        assert_eq!(calc.energy_balance("ZZ").annual_generation_mwh, 0.0);
    }

    #[test]
    fn renewable_percentage_counts_five_sources() {
        let store = single_region_store([50.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 10.0], 1.0);
        let calc = BalanceCalculator::new(&store);
        assert!((calc.renewable_percentage("XA") - 50.0).abs() < 1e-12);
    }

    #[test]
    fn capacity_factor_scales_generation() {
        let store = single_region_store([100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1.0);
        let calc = BalanceCalculator::with_capacity_factor(&store, 0.9);
        assert_eq!(calc.energy_balance("XA").annual_generation_mwh, 100.0 * 8760.0 * 0.9);
    }

    #[test]
    fn balance_display_does_not_panic() {
        let b = EnergyBalance::new(10.0, 0.0, 0.5);
        assert!(format!("{b}").contains("n/a"));
    }
}
