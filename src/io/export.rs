//! CSV export for region outlooks.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::report::RegionOutlook;

/// Columns preceding the per-year price columns.
const LEADING_COLUMNS: &[&str] = &[
    "region",
    "total_capacity_mw",
    "annual_generation_mwh",
    "consumption_mwh",
    "surplus_mwh",
    "self_sufficiency_pct",
    "renewable_pct",
    "current_price_cents",
];

/// Columns following the per-year price columns.
const TRAILING_COLUMNS: &[&str] = &["recommendations", "demand_mw"];

/// Header row for a report forecasting `years`.
pub fn header(years: &[i32]) -> Vec<String> {
    LEADING_COLUMNS
        .iter()
        .map(|c| (*c).to_string())
        .chain(years.iter().map(|y| format!("price_{y}")))
        .chain(TRAILING_COLUMNS.iter().map(|c| (*c).to_string()))
        .collect()
}

/// Exports outlooks to a CSV file at the given path.
///
/// # Arguments
///
/// * `outlooks` - One outlook per region, written in order
/// * `years` - Forecast years, one price column each
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(outlooks: &[RegionOutlook], years: &[i32], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(outlooks, years, io::BufWriter::new(file))
}

/// Writes outlooks as CSV to any writer.
///
/// Undefined self-sufficiency, years missing from an outlook's forecast and
/// absent demand estimates are written as empty cells.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(outlooks: &[RegionOutlook], years: &[i32], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(header(years))?;

    for o in outlooks {
        let b = &o.balance;
        let mut row = vec![
            o.region.clone(),
            format!("{:.1}", b.total_capacity_mw),
            format!("{:.1}", b.annual_generation_mwh),
            format!("{:.1}", b.consumption_mwh),
            format!("{:.1}", b.surplus_mwh),
            b.self_sufficiency_pct
                .map(|p| format!("{p:.4}"))
                .unwrap_or_default(),
            format!("{:.4}", o.renewable_pct),
            format!("{:.4}", o.price.current_price_cents_per_kwh),
        ];
        row.extend(years.iter().map(|&y| {
            o.price
                .for_year(y)
                .map(|p| format!("{p:.4}"))
                .unwrap_or_default()
        }));
        row.push(o.recommendations.len().to_string());
        row.push(
            o.demand
                .map(|d| format!("{:.4}", d.predicted))
                .unwrap_or_default(),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
