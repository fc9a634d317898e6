//! Input tables as read from JSON.
//!
//! # Formats
//!
//! - **Route costs**: a `routes` entry mapping a route index to its list of
//!   chokepoints, plus one entry per draught sample mapping route index to
//!   cost per day.
//! - **Chokepoints**: chokepoint name to a mapping of discharge sample to
//!   depth. Chokepoints and their samples keep the order of the file.
//!
//! # Example
//! ```text
//! {
//!   "routes": {"0": [], "1": ["A", "B"]},
//!   "2.0": {"0": 1000, "1": 2000},
//!   "3.0": {"0": 1000, "1": 1500}
//! }
//!
//! {"A": {"500": 2.5, "1000": 3.0}, "B": {"200": 5.0, "800": 6.0}}
//! ```

use crate::error::ConfigurationError;
use crate::route::RouteId;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Draught-to-cost samples for every route.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RouteCostTable {
    /// Route index to the chokepoints the route passes
    pub routes: BTreeMap<String, RouteId>,
    /// Draught sample to (route index to cost per day)
    #[serde(flatten)]
    pub draught_costs: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Discharge-to-depth samples for every chokepoint, keyed by name, in file
/// order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct ChokepointTable(pub IndexMap<String, IndexMap<String, f64>>);

fn parse_key(table: &str, key: &str) -> Result<f64, ConfigurationError> {
    match key.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConfigurationError::InvalidSampleKey {
            table: table.to_string(),
            key: key.to_string(),
        }),
    }
}

/// Route indices are ordered numerically when they are numbers.
fn compare_index(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

impl RouteCostTable {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(s).map_err(|e| ConfigurationError::Parse {
            table: "route cost table".to_string(),
            message: e.to_string(),
        })
    }

    /// Route ids with their `(draught, cost)` samples, in route index order.
    ///
    /// A route without a cost at some draught simply has fewer samples.
    pub fn route_samples(&self) -> Result<Vec<(RouteId, Vec<(f64, f64)>)>, ConfigurationError> {
        let mut draughts = Vec::with_capacity(self.draught_costs.len());
        for (key, costs) in &self.draught_costs {
            draughts.push((parse_key("route cost table", key)?, costs));
        }

        let mut indices: Vec<&String> = self.routes.keys().collect();
        indices.sort_by(|a, b| compare_index(a, b));

        let mut routes = Vec::with_capacity(indices.len());
        for index in indices {
            let id = self.routes[index].clone();
            let samples = draughts
                .iter()
                .filter_map(|(draught, costs)| costs.get(index).map(|c| (*draught, *c)))
                .collect();
            routes.push((id, samples));
        }
        Ok(routes)
    }
}

impl ChokepointTable {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(s).map_err(|e| ConfigurationError::Parse {
            table: "chokepoint table".to_string(),
            message: e.to_string(),
        })
    }

    /// Chokepoint names in table order.
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// `(discharge, depth)` samples per chokepoint, both in table order.
    pub fn discharge_depths(&self) -> Result<Vec<(String, Vec<(f64, f64)>)>, ConfigurationError> {
        let mut result = Vec::with_capacity(self.0.len());
        for (name, samples) in &self.0 {
            let table = format!("chokepoint table ({name})");
            let mut parsed = Vec::with_capacity(samples.len());
            for (key, depth) in samples {
                parsed.push((parse_key(&table, key)?, *depth));
            }
            result.push((name.clone(), parsed));
        }
        Ok(result)
    }
}
