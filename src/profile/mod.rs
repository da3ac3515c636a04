//! Per-region generation capacity, consumption and retail price tables.
//!
//! The store is an immutable keyed resource built once at startup, either
//! from the built-in US state tables or from a TOML profile file. Regions
//! missing from the store are not errors: they read as zero capacity, zero
//! consumption and the configured default base price.

mod tables;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Base retail price used for regions without a price entry (cents/kWh).
pub const DEFAULT_BASE_PRICE_CENTS: f64 = 12.0;

/// Generation source category. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergySource {
    Nuclear,
    Coal,
    Gas,
    Hydro,
    Wind,
    Solar,
    Geothermal,
    Biomass,
}

impl EnergySource {
    /// All categories in table column order.
    pub const ALL: [Self; 8] = [
        Self::Nuclear,
        Self::Coal,
        Self::Gas,
        Self::Hydro,
        Self::Wind,
        Self::Solar,
        Self::Geothermal,
        Self::Biomass,
    ];

    /// Hydro, wind, solar, geothermal and biomass.
    pub fn is_renewable(self) -> bool {
        matches!(
            self,
            Self::Hydro | Self::Wind | Self::Solar | Self::Geothermal | Self::Biomass
        )
    }

    /// Lowercase identifier used in files and CSV headers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nuclear => "nuclear",
            Self::Coal => "coal",
            Self::Gas => "gas",
            Self::Hydro => "hydro",
            Self::Wind => "wind",
            Self::Solar => "solar",
            Self::Geothermal => "geothermal",
            Self::Biomass => "biomass",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Nuclear => "Nuclear",
            Self::Coal => "Coal",
            Self::Gas => "Natural Gas",
            Self::Hydro => "Hydro",
            Self::Wind => "Wind",
            Self::Solar => "Solar",
            Self::Geothermal => "Geothermal",
            Self::Biomass => "Biomass",
        };
        f.write_str(label)
    }
}

/// Nameplate capacity per source category (MW, all values >= 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapacityMix {
    pub nuclear: f64,
    pub coal: f64,
    pub gas: f64,
    pub hydro: f64,
    pub wind: f64,
    pub solar: f64,
    pub geothermal: f64,
    pub biomass: f64,
}

impl CapacityMix {
    /// Builds a mix from values in [`EnergySource::ALL`] order.
    pub fn from_array(mw: [f64; 8]) -> Self {
        let [nuclear, coal, gas, hydro, wind, solar, geothermal, biomass] = mw;
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

    /// Values in [`EnergySource::ALL`] order.
    pub fn to_array(&self) -> [f64; 8] {
        [
            self.nuclear,
            self.coal,
            self.gas,
            self.hydro,
            self.wind,
            self.solar,
            self.geothermal,
            self.biomass,
        ]
    }

    /// Capacity of one category in MW.
    pub fn get(&self, source: EnergySource) -> f64 {
        self.to_array()[source.index()]
    }

    /// Sum of all eight categories in MW.
    pub fn total(&self) -> f64 {
        self.to_array().iter().sum()
    }

    /// Sum of the renewable categories in MW.
    pub fn renewable(&self) -> f64 {
        EnergySource::ALL
            .iter()
            .filter(|s| s.is_renewable())
            .map(|&s| self.get(s))
            .sum()
    }
}

/// Static energy profile of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionEnergyProfile {
    #[serde(default)]
    pub capacity: CapacityMix,
    #[serde(default)]
    pub annual_consumption_mwh: f64,
    /// `None` reads as the store's default base price.
    #[serde(default)]
    pub base_price_cents_per_kwh: Option<f64>,
    #[serde(default)]
    pub population: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    #[serde(default)]
    default_base_price: Option<f64>,
    #[serde(default)]
    regions: BTreeMap<String, RegionEnergyProfile>,
}

/// Immutable lookup over region profiles, keyed by uppercase region code.
#[derive(Debug, Clone)]
pub struct RegionProfileStore {
    profiles: HashMap<String, RegionEnergyProfile>,
    default_base_price: f64,
}

impl RegionProfileStore {
    /// Store holding the built-in tables for the 50 US states.
    pub fn builtin() -> Self {
        let mut profiles: HashMap<String, RegionEnergyProfile> = HashMap::new();

        for (code, mw) in tables::CAPACITY_MW {
            profile_entry(&mut profiles, code).capacity = CapacityMix::from_array(*mw);
        }
        for (code, mwh) in tables::CONSUMPTION_MWH {
            profile_entry(&mut profiles, code).annual_consumption_mwh = *mwh;
        }
        for (code, cents) in tables::BASE_PRICE_CENTS {
            profile_entry(&mut profiles, code).base_price_cents_per_kwh = Some(*cents);
        }
        for (code, people) in tables::POPULATION {
            profile_entry(&mut profiles, code).population = Some(*people);
        }

        Self {
            profiles,
            default_base_price: DEFAULT_BASE_PRICE_CENTS,
        }
    }

    /// Store holding exactly the given profiles.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first profile that breaks a table
    /// invariant (negative capacity or consumption, non-positive price).
    pub fn from_profiles<I, S>(profiles: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, RegionEnergyProfile)>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for (code, profile) in profiles {
            let code = code.as_ref().trim().to_ascii_uppercase();
            validate_profile(&code, &profile)?;
            map.insert(code, profile);
        }
        Ok(Self {
            profiles: map,
            default_base_price: DEFAULT_BASE_PRICE_CENTS,
        })
    }

    /// Parses a profile file of `[regions.<CODE>]` tables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read, is not valid TOML,
    /// or contains a profile that breaks a table invariant.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                "engine.profiles_path",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses profile tables from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or a profile breaks a
    /// table invariant.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ProfileFile =
            toml::from_str(s).map_err(|e| ConfigError::new("profiles", e.to_string()))?;
        let store = Self::from_profiles(file.regions)?;
        match file.default_base_price {
            Some(price) => store.with_default_base_price(price),
            None => Ok(store),
        }
    }

    /// Replaces the fallback base price.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `price` is not a positive finite number.
    pub fn with_default_base_price(mut self, price: f64) -> Result<Self, ConfigError> {
        if !(price.is_finite() && price > 0.0) {
            return Err(ConfigError::new("default_base_price", "must be > 0"));
        }
        self.default_base_price = price;
        Ok(self)
    }

    /// Profile for a region code or state name, if present.
    pub fn profile(&self, region: &str) -> Option<&RegionEnergyProfile> {
        self.profiles.get(&resolve_region(region))
    }

    /// Capacity of one source in MW; zero for unknown regions.
    pub fn capacity(&self, region: &str, source: EnergySource) -> f64 {
        self.capacity_mix(region).get(source)
    }

    /// Full capacity mix; all-zero for unknown regions.
    pub fn capacity_mix(&self, region: &str) -> CapacityMix {
        self.profile(region)
            .map(|p| p.capacity)
            .unwrap_or_default()
    }

    /// Annual consumption in MWh; zero for unknown regions.
    pub fn consumption(&self, region: &str) -> f64 {
        self.profile(region)
            .map_or(0.0, |p| p.annual_consumption_mwh)
    }

    /// Base retail price in cents/kWh, or the default for unknown regions.
    pub fn base_price(&self, region: &str) -> f64 {
        self.profile(region)
            .and_then(|p| p.base_price_cents_per_kwh)
            .unwrap_or(self.default_base_price)
    }

    /// Resident population, if known.
    pub fn population(&self, region: &str) -> Option<u64> {
        self.profile(region).and_then(|p| p.population)
    }

    /// Fallback base price in cents/kWh.
    pub fn default_base_price(&self) -> f64 {
        self.default_base_price
    }

    /// Region codes in alphabetical order.
    pub fn regions(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Number of regions in the store.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` if the store holds no regions.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for RegionProfileStore {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Maps a full state name ("Texas", case-insensitive) or a code ("tx") to
/// the uppercase region code. Unrecognised input is uppercased unchanged.
pub fn resolve_region(input: &str) -> String {
    let trimmed = input.trim();
    tables::STATE_NAMES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map_or_else(|| trimmed.to_ascii_uppercase(), |(_, code)| (*code).to_string())
}

fn profile_entry<'a>(
    profiles: &'a mut HashMap<String, RegionEnergyProfile>,
    code: &str,
) -> &'a mut RegionEnergyProfile {
    profiles
        .entry(code.to_string())
        .or_insert_with(|| RegionEnergyProfile {
            capacity: CapacityMix::default(),
            annual_consumption_mwh: 0.0,
            base_price_cents_per_kwh: None,
            population: None,
        })
}

fn validate_profile(code: &str, profile: &RegionEnergyProfile) -> Result<(), ConfigError> {
    for source in EnergySource::ALL {
        let mw = profile.capacity.get(source);
        if !(mw.is_finite() && mw >= 0.0) {
            return Err(ConfigError::new(
                format!("regions.{code}.capacity.{}", source.as_str()),
                "must be >= 0",
            ));
        }
    }
    let consumption = profile.annual_consumption_mwh;
    if !(consumption.is_finite() && consumption >= 0.0) {
        return Err(ConfigError::new(
            format!("regions.{code}.annual_consumption_mwh"),
            "must be >= 0",
        ));
    }
    if let Some(price) = profile.base_price_cents_per_kwh
        && !(price.is_finite() && price > 0.0)
    {
        return Err(ConfigError::new(
            format!("regions.{code}.base_price_cents_per_kwh"),
            "must be > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_fifty_states() {
        let store = RegionProfileStore::builtin();
        assert_eq!(store.len(), 50);
        assert!(store.regions().contains(&"TX"));
    }

    #[test]
    fn texas_capacity_lookup() {
        let store = RegionProfileStore::builtin();
        assert_eq!(store.capacity("TX", EnergySource::Wind), 35754.0);
        assert_eq!(store.capacity_mix("TX").total(), 152_408.0);
        assert_eq!(store.consumption("TX"), 478_000_000.0);
        assert_eq!(store.base_price("TX"), 10.7);
    }

    #[test]
    fn unknown_region_reads_as_zero() {
        let store = RegionProfileStore::builtin();
        assert_eq!(store.capacity_mix("ZZ"), CapacityMix::default());
        assert_eq!(store.consumption("ZZ"), 0.0);
        assert_eq!(store.base_price("ZZ"), DEFAULT_BASE_PRICE_CENTS);
        assert!(store.population("ZZ").is_none());
    }

    #[test]
    fn state_names_resolve_to_codes() {
        assert_eq!(resolve_region("Texas"), "TX");
        assert_eq!(resolve_region("new york"), "NY");
        assert_eq!(resolve_region(" ca "), "CA");
        assert_eq!(resolve_region("Atlantis"), "ATLANTIS");

        let store = RegionProfileStore::builtin();
        assert_eq!(store.consumption("Texas"), store.consumption("TX"));
    }

    #[test]
    fn renewable_sum_excludes_thermal() {
        let mix = CapacityMix::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(mix.total(), 36.0);
        assert_eq!(mix.renewable(), 30.0);
    }

    #[test]
    fn toml_profiles_parse() {
        let toml = r#"
default_base_price = 14.0

[regions.XA]
annual_consumption_mwh = 1000.0
base_price_cents_per_kwh = 9.5

[regions.XA.capacity]
nuclear = 10.0
solar = 5.0

[regions.xb]
annual_consumption_mwh = 50.0
"#;
        let store = RegionProfileStore::from_toml_str(toml);
        assert!(store.is_ok(), "profile TOML should parse: {:?}", store.err());
        let store = store.ok();
        let store = store.as_ref();
        assert_eq!(store.map(|s| s.capacity("XA", EnergySource::Solar)), Some(5.0));
        assert_eq!(store.map(|s| s.base_price("XA")), Some(9.5));
        assert_eq!(store.map(|s| s.base_price("XB")), Some(14.0));
        assert_eq!(store.map(|s| s.base_price("nowhere")), Some(14.0));
    }

    #[test]
    fn negative_capacity_rejected() {
        let toml = r#"
[regions.XA.capacity]
coal = -1.0
"#;
        let err = RegionProfileStore::from_toml_str(toml).err();
        assert_eq!(
            err.map(|e| e.field),
            Some("regions.XA.capacity.coal".to_string())
        );
    }

    #[test]
    fn unknown_profile_field_rejected() {
        let toml = r#"
[regions.XA]
tidal = 3.0
"#;
        assert!(RegionProfileStore::from_toml_str(toml).is_err());
    }
}
