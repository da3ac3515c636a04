//! grid-outlook entry point: CLI wiring and config-driven engine construction.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use grid_outlook::config::OutlookConfig;
use grid_outlook::engine::{OutlookEngine, OutlookRequest};
use grid_outlook::gateway::SystemClock;
use grid_outlook::io::export::export_csv;
use grid_outlook::price::FORECAST_YEARS;
use grid_outlook::sources::GeoPoint;
use grid_outlook::telemetry;

/// Regional energy balance, expansion and price outlook.
#[derive(Debug, Parser)]
#[command(name = "grid-outlook", version, about)]
struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (default, offline)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Region code or state name; repeat for several (default: all)
    #[arg(long = "region", value_name = "REGION")]
    regions: Vec<String>,

    /// Forecast year; repeat for several (default: base year + 5 and + 10)
    #[arg(
        long = "year",
        value_name = "YYYY",
        value_parser = clap::value_parser!(i32)
            .range(i64::from(*FORECAST_YEARS.start())..=i64::from(*FORECAST_YEARS.end()))
    )]
    years: Vec<i32>,

    /// Locality population for the urban premium and demand baseline
    #[arg(long)]
    population: Option<u64>,

    /// Locality latitude; with --lon enables the demand estimate
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Locality longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Expected annual demand (MWh) for sizing recommendations
    #[arg(long, value_name = "MWH")]
    future_demand: Option<f64>,

    /// Write one CSV row per region
    #[arg(long, value_name = "PATH")]
    report_out: Option<PathBuf>,

    /// Debug-level logging unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,

    /// Start the REST API server after printing the report
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn load_config(cli: &Cli) -> OutlookConfig {
    let loaded = match (&cli.config, &cli.preset) {
        (Some(path), _) => OutlookConfig::from_toml_file(path),
        (None, Some(name)) => OutlookConfig::from_preset(name),
        (None, None) => Ok(OutlookConfig::default_preset()),
    };
    let config = match loaded {
        Ok(c) => c.with_env_credentials(),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }
    config
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let config = load_config(&cli);
    let engine = match OutlookEngine::new(&config, Arc::new(SystemClock)) {
        Ok(e) => e,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let regions: Vec<String> = if cli.regions.is_empty() {
        engine.store().regions().into_iter().map(str::to_string).collect()
    } else {
        cli.regions.clone()
    };
    let years = if cli.years.is_empty() {
        engine.default_years()
    } else {
        cli.years.clone()
    };
    let location = cli.lat.zip(cli.lon).map(|(lat, lon)| GeoPoint::new(lat, lon));
    info!(regions = regions.len(), ?years, "computing outlook");

    let mut outlooks = Vec::with_capacity(regions.len());
    for region in regions {
        let request = OutlookRequest {
            region,
            years: years.clone(),
            population: cli.population,
            location,
            future_demand_mwh: cli.future_demand,
        };
        let outlook = engine.outlook(&request).await;
        println!("{outlook}\n");
        outlooks.push(outlook);
    }

    if let Some(ref path) = cli.report_out {
        match export_csv(&outlooks, &years, path) {
            Ok(()) => info!(path = %path.display(), "report written"),
            Err(e) => {
                error!(path = %path.display(), "failed to write report: {e}");
                process::exit(1);
            }
        }
    }

    #[cfg(feature = "api")]
    if cli.serve {
        let addr = std::net::SocketAddr::from(([127, 0, 0, 1], cli.port));
        if let Err(e) = grid_outlook::api::serve(Arc::new(engine), addr).await {
            error!("server error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_regions_and_years() {
        let cli = Cli::try_parse_from([
            "grid-outlook", "--region", "TX", "--region", "Idaho", "--year", "2030", "--year", "2040",
        ]);
        let cli = cli.ok();
        assert_eq!(cli.as_ref().map(|c| c.regions.len()), Some(2));
        assert_eq!(cli.as_ref().map(|c| c.years.clone()), Some(vec![2030, 2040]));
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        assert!(Cli::try_parse_from(["grid-outlook", "--year", "-2147483648"]).is_err());
        assert!(Cli::try_parse_from(["grid-outlook", "--year", "99999"]).is_err());
        assert!(Cli::try_parse_from(["grid-outlook", "--year", "2200"]).is_ok());
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["grid-outlook", "--lat", "30.2"]).is_err());
        let cli = Cli::try_parse_from(["grid-outlook", "--lat", "30.2", "--lon", "-97.7"]).ok();
        assert_eq!(cli.and_then(|c| c.lon), Some(-97.7));
    }

    #[test]
    fn config_and_preset_conflict() {
        assert!(Cli::try_parse_from(["grid-outlook", "--config", "a.toml", "--preset", "offline"]).is_err());
    }
}
