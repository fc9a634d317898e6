//! Scenario runs: total cost per route for a configured discharge scenario.

use crate::config::RunConfig;
use anyhow::Context;
use log::{debug, info};
use qincm_model::{Mode, RouteId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Output path next to the input: `run.json` becomes `run_output.json`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_output.json"))
}

/// Route totals as a JSON object keyed by the route's display form,
/// `{'A', 'B'}`. The route without chokepoints is keyed `{}`.
pub fn format_result(result: &BTreeMap<RouteId, f64>) -> anyhow::Result<String> {
    let object: serde_json::Map<String, serde_json::Value> = result
        .iter()
        .map(|(id, total)| (id.to_string(), serde_json::Value::from(*total)))
        .collect();
    Ok(serde_json::to_string_pretty(&object)?)
}

/// Run the configuration in `input` and write the route totals to `output`,
/// or next to the input when no output is given.
pub fn run_scenario(input: &Path, output: Option<&Path>) -> anyhow::Result<BTreeMap<RouteId, f64>> {
    info!("Loading configuration: {}", input.display());
    let config = RunConfig::from_path(input)?;
    debug!("{:?}", config);

    let mode = config.mode()?;
    let base_dir = input.parent().unwrap_or_else(|| Path::new("."));
    let model = config.load_model(base_dir)?;
    let discharges = config.discharge_input(base_dir)?;

    info!(
        "Running {} over {} discharge samples (delta: {})",
        mode,
        discharges.len(),
        config.delta
    );
    let result = match mode {
        Mode::Scenario => {
            model.cost_for_scenario(&discharges, config.occurrence.as_deref(), config.delta)?
        }
    };

    let pretty = format_result(&result)?;
    debug!("\n{}", pretty);

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    std::fs::write(&output_path, &pretty)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    info!("Wrote {} route totals to {}", result.len(), output_path.display());

    Ok(result)
}
