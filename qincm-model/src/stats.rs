//! Which chokepoints cost the most, over a sweep of reference discharges.
//!
//! For every chokepoint two views are summed over the routes passing it:
//! the cost of all trips through the chokepoint, and the cost of only those
//! trips for which it is the shallowest point of the route.

use crate::{
    error::{Result, ValidationError},
    model::Model,
    route::{binding_position, draught_from_depth},
    sample::{DischargeInput, SampleLabel, SampleTable},
};
use log::debug;

pub const DEFAULT_SWEEP_MIN: f64 = 500.0;
pub const DEFAULT_SWEEP_MAX: f64 = 2000.0;
pub const DEFAULT_SWEEP_STEPS: usize = 100;

/// `n` evenly spaced values from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// Per-chokepoint cost series over a discharge sweep, labelled by reference
/// discharge. Columns are the chokepoints that lie on at least one route.
#[derive(Debug, Clone, PartialEq)]
pub struct ChokepointStats {
    /// Route cost at the chokepoint's own draught, for every trip passing it
    pub all_trips: SampleTable<String>,
    /// Route cost where the chokepoint is the binding one, zero elsewhere
    pub binding_trips: SampleTable<String>,
    /// As `binding_trips`, relative to the route cost at the top of the sweep
    pub binding_increase: SampleTable<String>,
}

impl Model {
    /// Sweep the reference discharge from `discharge_min` to `discharge_max`
    /// in `n_steps` steps and split route costs by chokepoint.
    ///
    /// When two chokepoints on a route are equally shallow, the first in the
    /// route's (sorted) order is the binding one.
    pub fn stats_for_chokepoints(
        &self,
        discharge_min: f64,
        discharge_max: f64,
        n_steps: usize,
    ) -> Result<ChokepointStats> {
        if n_steps == 0 {
            return Err(ValidationError::InvalidSweep("at least one step is needed".into()).into());
        }
        if !discharge_min.is_finite() || !discharge_max.is_finite() {
            return Err(ValidationError::InvalidSweep(format!(
                "bounds must be finite, got {discharge_min} to {discharge_max}"
            ))
            .into());
        }

        let sweep = linspace(discharge_min, discharge_max, n_steps);
        let local = self.local_discharge(&DischargeInput::reference(sweep.clone()))?;
        let depths = self.depths(&local);

        let columns: Vec<String> = self
            .chokepoint_names()
            .into_iter()
            .filter(|name| self.routes().iter().any(|r| r.id().contains(name)))
            .collect();
        let mut all_trips = vec![vec![0.0; columns.len()]; n_steps];
        let mut binding_trips = vec![vec![0.0; columns.len()]; n_steps];
        let mut binding_increase = vec![vec![0.0; columns.len()]; n_steps];

        for route in self.routes() {
            let names = route.id().names();
            if names.is_empty() {
                continue;
            }
            let depth_columns: Vec<usize> = names
                .iter()
                .filter_map(|name| depths.column_index(name.as_str()))
                .collect();
            let stat_columns: Vec<usize> = names
                .iter()
                .filter_map(|name| columns.iter().position(|c| c == name))
                .collect();

            let draughts: Vec<Vec<f64>> = depths
                .rows()
                .iter()
                .map(|row| {
                    depth_columns
                        .iter()
                        .map(|&i| draught_from_depth(row[i]))
                        .collect()
                })
                .collect();
            let route_costs: Vec<f64> = draughts
                .iter()
                .map(|d| route.cost_at_draughts(d))
                .collect();
            let unconstrained = route_costs[n_steps - 1];

            for (step, sample) in draughts.iter().enumerate() {
                let binding = binding_position(sample);
                for (position, &column) in stat_columns.iter().enumerate() {
                    all_trips[step][column] += route.cost_at_draught(sample[position]);
                    if binding == Some(position) {
                        binding_trips[step][column] += route_costs[step];
                        binding_increase[step][column] += route_costs[step] - unconstrained;
                    }
                }
            }
        }

        debug!(
            "Chokepoint statistics over {} steps from {} to {}",
            n_steps, discharge_min, discharge_max
        );
        let labels: Vec<SampleLabel> = sweep.iter().map(|&q| SampleLabel::Discharge(q)).collect();
        Ok(ChokepointStats {
            all_trips: SampleTable::from_parts(labels.clone(), columns.clone(), all_trips),
            binding_trips: SampleTable::from_parts(labels.clone(), columns.clone(), binding_trips),
            binding_increase: SampleTable::from_parts(labels, columns, binding_increase),
        })
    }

    /// [`Model::stats_for_chokepoints`] over the default sweep.
    pub fn default_chokepoint_stats(&self) -> Result<ChokepointStats> {
        self.stats_for_chokepoints(DEFAULT_SWEEP_MIN, DEFAULT_SWEEP_MAX, DEFAULT_SWEEP_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QincmError;
    use crate::model::tests::fixture_model;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(500.0, 3000.0, 6), vec![500.0, 1000.0, 1500.0, 2000.0, 2500.0, 3000.0]);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        let values = linspace(500.0, 3000.0, 26);
        assert_eq!(values.len(), 26);
        assert_eq!(values[25], 3000.0);
    }

    #[test]
    fn test_columns_and_labels() {
        let stats = fixture_model().stats_for_chokepoints(500.0, 3000.0, 6).unwrap();
        assert_eq!(
            stats.all_trips.columns(),
            &["WA_Nijmegen", "WA_Tiel", "PK_Arnhem", "IJ_Deventer"]
        );
        assert_eq!(stats.all_trips.len(), 6);
        assert_eq!(stats.binding_trips.labels()[1], SampleLabel::Discharge(1000.0));
    }

    #[test]
    fn test_all_trips_sum_over_routes() {
        let stats = fixture_model().stats_for_chokepoints(500.0, 3000.0, 6).unwrap();
        // Nijmegen lies on the Waal route and on its own route
        assert_close(stats.all_trips.value(0, "WA_Nijmegen").unwrap(), 2160.0 + 1320.0);
        assert_close(stats.all_trips.value(1, "WA_Nijmegen").unwrap(), 1880.0 + 1080.0);
        // Tiel at 1000: draught 2.9 on the Waal route
        assert_close(stats.all_trips.value(1, "WA_Tiel").unwrap(), 1840.0);
    }

    #[test]
    fn test_binding_trips() {
        let stats = fixture_model().stats_for_chokepoints(500.0, 3000.0, 6).unwrap();
        assert_close(stats.binding_trips.value(1, "WA_Nijmegen").unwrap(), 1880.0 + 1080.0);
        assert_close(stats.binding_trips.value(1, "IJ_Deventer").unwrap(), 1220.0);
        for step in 0..6 {
            // Tiel and Arnhem are always deeper than their route partner
            assert_eq!(stats.binding_trips.value(step, "WA_Tiel").unwrap(), 0.0);
            assert_eq!(stats.binding_trips.value(step, "PK_Arnhem").unwrap(), 0.0);
        }
    }

    #[test]
    fn test_binding_increase_is_relative_to_sweep_top() {
        let stats = fixture_model().stats_for_chokepoints(500.0, 3000.0, 6).unwrap();
        assert_close(stats.binding_increase.value(1, "WA_Nijmegen").unwrap(), 180.0 + 180.0);
        assert_close(stats.binding_increase.value(0, "IJ_Deventer").unwrap(), 420.0);
        assert_close(stats.binding_increase.value(5, "WA_Nijmegen").unwrap(), 0.0);
    }

    #[test]
    fn test_ties_go_to_first_chokepoint() {
        let routes = r#"{"routes": {"0": ["B", "A"]}, "2.0": {"0": 10}, "3.0": {"0": 5}}"#;
        let chokepoints = r#"{"A": {"500": 2.0, "1000": 3.0}, "B": {"500": 2.0, "1000": 3.0}}"#;
        let model = Model::from_json_strs(routes, chokepoints, None).unwrap();
        let stats = model.stats_for_chokepoints(500.0, 1000.0, 3).unwrap();
        for step in 0..3 {
            assert!(stats.binding_trips.value(step, "A").unwrap() > 0.0);
            assert_eq!(stats.binding_trips.value(step, "B").unwrap(), 0.0);
        }
    }

    #[test]
    fn test_default_sweep() {
        let stats = fixture_model().default_chokepoint_stats().unwrap();
        assert_eq!(stats.all_trips.len(), DEFAULT_SWEEP_STEPS);
        assert_eq!(stats.all_trips.labels()[0], SampleLabel::Discharge(500.0));
    }

    #[test]
    fn test_invalid_sweep() {
        let model = fixture_model();
        let err = model.stats_for_chokepoints(500.0, 2000.0, 0).unwrap_err();
        assert!(matches!(err, QincmError::Validation(ValidationError::InvalidSweep(_))));
        let err = model.stats_for_chokepoints(f64::NAN, 2000.0, 10).unwrap_err();
        assert!(matches!(err, QincmError::Validation(ValidationError::InvalidSweep(_))));
    }
}
