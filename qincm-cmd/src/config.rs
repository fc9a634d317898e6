//! JSON run configuration.
//!
//! # Example
//! ```text
//! {
//!   "route_depth_costs_file": "testmodel_4p/route_depth_costs.json",
//!   "knelpunt_discharge_depth_file": "testmodel_4p/knelpunt_discharge_waterdepth.json",
//!   "reference": "WA_Nijmegen",
//!   "mode": "scenario",
//!   "discharges": [500, 1000, 3000],
//!   "occurance": [100, 200, 65]
//! }
//! ```
//!
//! Table entries may be a path, relative to the configuration file, or the
//! table itself as a JSON object.

use crate::input::read_discharge_csv;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use log::info;
use qincm_model::{ChokepointTable, DischargeInput, Mode, Model, RouteCostTable, SampleLabel};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A table given either as a file path or inline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TableSource<T> {
    File(PathBuf),
    Inline(T),
}

impl<T: DeserializeOwned + Clone> TableSource<T> {
    /// Read the table, resolving relative paths against `base_dir`.
    pub fn load(&self, base_dir: &Path) -> anyhow::Result<T> {
        match self {
            TableSource::Inline(table) => Ok(table.clone()),
            TableSource::File(path) => {
                let path = base_dir.join(path);
                info!("Loading table: {}", path.display());
                let data = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&data)
                    .with_context(|| format!("Failed to parse {}", path.display()))
            }
        }
    }
}

/// Discharges as they may appear in a configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DischargeSpec {
    /// Reference discharges, one per sample
    Reference(Vec<f64>),
    /// One row per sample, one value per chokepoint in table order
    Table(Vec<Vec<f64>>),
    /// Dated reference discharges
    Series {
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    },
    /// Per-chokepoint columns
    Keyed(BTreeMap<String, Vec<f64>>),
}

impl TryFrom<DischargeSpec> for DischargeInput {
    type Error = anyhow::Error;

    fn try_from(spec: DischargeSpec) -> anyhow::Result<Self> {
        Ok(match spec {
            DischargeSpec::Reference(values) => DischargeInput::reference(values),
            DischargeSpec::Table(rows) => DischargeInput::table(rows),
            DischargeSpec::Series { dates, values } => {
                if dates.len() != values.len() {
                    bail!(
                        "Discharge series has {} dates for {} values",
                        dates.len(),
                        values.len()
                    );
                }
                DischargeInput::reference(values)
                    .with_labels(dates.into_iter().map(SampleLabel::Date).collect())
            }
            DischargeSpec::Keyed(columns) => DischargeInput::keyed(columns),
        })
    }
}

fn default_delta() -> bool {
    true
}

/// Everything needed for one model run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub route_depth_costs_file: TableSource<RouteCostTable>,
    pub knelpunt_discharge_depth_file: TableSource<ChokepointTable>,
    /// Reference chokepoint; the first chokepoint when absent
    #[serde(default)]
    pub reference: Option<String>,
    pub mode: String,
    #[serde(default)]
    pub discharges: Option<DischargeSpec>,
    /// CSV discharge series, used when `discharges` is absent
    #[serde(default)]
    pub discharges_file: Option<PathBuf>,
    /// Weight per discharge sample, e.g. days per year
    #[serde(default, alias = "occurance")]
    pub occurrence: Option<Vec<f64>>,
    /// Report costs relative to unrestricted depth
    #[serde(default = "default_delta")]
    pub delta: bool,
}

impl RunConfig {
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("Failed to parse run configuration")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        Self::from_json_str(&data)
            .with_context(|| format!("Invalid configuration {}", path.display()))
    }

    /// The requested mode; anything but `scenario` is an error.
    pub fn mode(&self) -> anyhow::Result<Mode> {
        Ok(self.mode.parse::<Mode>()?)
    }

    pub fn load_model(&self, base_dir: &Path) -> anyhow::Result<Model> {
        let route_table = self.route_depth_costs_file.load(base_dir)?;
        let chokepoint_table = self.knelpunt_discharge_depth_file.load(base_dir)?;
        let model = Model::from_tables(&route_table, &chokepoint_table, self.reference.as_deref())?;
        Ok(model)
    }

    pub fn discharge_input(&self, base_dir: &Path) -> anyhow::Result<DischargeInput> {
        match (&self.discharges, &self.discharges_file) {
            (Some(spec), _) => spec.clone().try_into(),
            (None, Some(path)) => read_discharge_csv(&base_dir.join(path)),
            (None, None) => bail!("Configuration needs either 'discharges' or 'discharges_file'"),
        }
    }
}
