//! Discharge series from CSV.
//!
//! Expected format (with headers): `date,<column>...`, dates as `YYYY-MM-DD`.
//! A single `discharge` column holds reference discharges; otherwise every
//! column is named after a chokepoint. Empty cells are missing values.
//!
//! # Example CSV
//! ```text
//! date,discharge
//! 2000-01-01,1250.5
//! 2000-01-02,1190.0
//! ```

use anyhow::{bail, Context};
use chrono::NaiveDate;
use log::{info, warn};
use qincm_model::{DischargeInput, SampleLabel};
use std::collections::BTreeMap;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";
const REFERENCE_COLUMN: &str = "discharge";

/// Read a discharge series CSV file.
pub fn read_discharge_csv(path: &Path) -> anyhow::Result<DischargeInput> {
    info!("Loading discharges: {}", path.display());
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_discharge_csv(&data).with_context(|| format!("Invalid discharge file {}", path.display()))
}

/// Parse a discharge series from a CSV string.
pub fn parse_discharge_csv(csv_data: &str) -> anyhow::Result<DischargeInput> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers = rdr.headers()?.clone();
    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    if names.is_empty() {
        bail!("Discharge CSV needs a date column and at least one value column");
    }

    let mut dates = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    let mut missing = 0u32;
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let date_str = record.get(0).unwrap_or("");
        let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT)
            .with_context(|| format!("Bad date '{}' on data line {}", date_str, line + 1))?;
        dates.push(date);

        for (i, column) in columns.iter_mut().enumerate() {
            let value_str = record.get(i + 1).unwrap_or("");
            let value = if value_str.is_empty() {
                missing += 1;
                f64::NAN
            } else {
                value_str.parse::<f64>().with_context(|| {
                    format!("Bad value '{}' on data line {}", value_str, line + 1)
                })?
            };
            column.push(value);
        }
    }
    if missing > 0 {
        warn!("Discharge CSV has {} missing values", missing);
    }

    let labels: Vec<SampleLabel> = dates.into_iter().map(SampleLabel::Date).collect();
    if names.len() == 1 && names[0].eq_ignore_ascii_case(REFERENCE_COLUMN) {
        let values = columns.pop().unwrap_or_default();
        return Ok(DischargeInput::reference(values).with_labels(labels));
    }
    let keyed: BTreeMap<String, Vec<f64>> = names.into_iter().zip(columns).collect();
    Ok(DischargeInput::keyed(keyed).with_labels(labels))
}
