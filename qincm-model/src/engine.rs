//! Route costs for discharge scenarios.

use crate::{
    error::{Result, ValidationError},
    model::Model,
    route::{draught_from_depth, RouteId},
    sample::{DischargeInput, SampleLabel, SampleTable},
};
use log::debug;
use std::collections::BTreeMap;

/// Reference discharge at which depth never limits navigation. Costs at this
/// discharge are the baseline for delta costs.
pub const NO_RESTRICTION_DISCHARGE: f64 = 99_999_999.0;

impl Model {
    /// Normalize caller input to one discharge per chokepoint per sample.
    ///
    /// The result has every model chokepoint as a column, in table order.
    /// Chokepoints missing from keyed input hold NaN.
    pub fn local_discharge(&self, input: &DischargeInput) -> Result<SampleTable<String>> {
        let names = self.chokepoint_names();
        let reference = self.reference_index();

        let (rows, default_labels): (Vec<Vec<f64>>, Vec<SampleLabel>) = match input {
            DischargeInput::Reference { values, .. } => {
                let rows = values
                    .iter()
                    .map(|&q| {
                        self.chokepoints()
                            .iter()
                            .map(|c| c.local_discharge_from_reference(q))
                            .collect()
                    })
                    .collect();
                let labels = values.iter().map(|&q| SampleLabel::Discharge(q)).collect();
                (rows, labels)
            }
            DischargeInput::Table { rows, .. } => {
                if let Some((row, values)) = rows
                    .iter()
                    .enumerate()
                    .find(|(_, values)| values.len() != names.len())
                {
                    return Err(ValidationError::RowLength {
                        row,
                        expected: names.len(),
                        found: values.len(),
                    }
                    .into());
                }
                let labels = rows
                    .iter()
                    .map(|row| SampleLabel::Discharge(row[reference]))
                    .collect();
                (rows.clone(), labels)
            }
            DischargeInput::Keyed { columns, .. } => {
                if let Some(unknown) = columns.keys().find(|k| !names.contains(k)) {
                    return Err(ValidationError::UnknownChokepoint(unknown.clone()).into());
                }
                let n_samples = input.len();
                if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != n_samples) {
                    return Err(ValidationError::ColumnLength {
                        chokepoint: name.clone(),
                        expected: n_samples,
                        found: values.len(),
                    }
                    .into());
                }
                let rows = (0..n_samples)
                    .map(|i| {
                        names
                            .iter()
                            .map(|name| columns.get(name).map_or(f64::NAN, |v| v[i]))
                            .collect()
                    })
                    .collect();
                let labels = match columns.get(&names[reference]) {
                    Some(values) => values.iter().map(|&q| SampleLabel::Discharge(q)).collect(),
                    None => (0..n_samples).map(SampleLabel::Position).collect(),
                };
                (rows, labels)
            }
        };

        let labels = match input.labels() {
            Some(labels) => labels.to_vec(),
            None => default_labels,
        };
        Ok(SampleTable::new(labels, names, rows)?)
    }

    /// Depth at every chokepoint for every sample of a local discharge table.
    pub fn depths(&self, local: &SampleTable<String>) -> SampleTable<String> {
        let rows = local
            .rows()
            .iter()
            .map(|row| {
                self.chokepoints()
                    .iter()
                    .zip(row)
                    .map(|(c, &q)| c.depth_at(q))
                    .collect()
            })
            .collect();
        SampleTable::from_parts(local.labels().to_vec(), local.columns().to_vec(), rows)
    }

    /// Cost per day for every route, for every discharge sample.
    pub fn cost_per_discharge(&self, input: &DischargeInput) -> Result<SampleTable<RouteId>> {
        let local = self.local_discharge(input)?;
        Ok(self.costs_at_local_discharge(&local))
    }

    fn costs_at_local_discharge(&self, local: &SampleTable<String>) -> SampleTable<RouteId> {
        let depths = self.depths(local);

        // columns of each route's chokepoints in the depth table
        let route_columns: Vec<Vec<usize>> = self
            .routes()
            .iter()
            .map(|route| {
                route
                    .id()
                    .names()
                    .iter()
                    .filter_map(|name| depths.column_index(name.as_str()))
                    .collect()
            })
            .collect();

        let rows = depths
            .rows()
            .iter()
            .map(|row| {
                self.routes()
                    .iter()
                    .zip(&route_columns)
                    .map(|(route, columns)| {
                        let draughts: Vec<f64> =
                            columns.iter().map(|&i| draught_from_depth(row[i])).collect();
                        route.cost_at_draughts(&draughts)
                    })
                    .collect()
            })
            .collect();
        let ids = self.routes().iter().map(|r| r.id().clone()).collect();
        SampleTable::from_parts(depths.labels().to_vec(), ids, rows)
    }

    /// Per-route cost at a discharge where depth never limits.
    pub fn unrestricted_costs(&self) -> Result<Vec<f64>> {
        let baseline =
            self.cost_per_discharge(&DischargeInput::reference(vec![NO_RESTRICTION_DISCHARGE]))?;
        Ok(baseline.rows()[0].clone())
    }

    /// Total cost per route over a discharge scenario.
    ///
    /// With `delta`, the cost at [`NO_RESTRICTION_DISCHARGE`] is subtracted
    /// from every sample first, leaving only the cost caused by limited
    /// depth. Each sample is weighted by its `occurrence` (e.g. days per
    /// year), or by 1 when no occurrence is given.
    pub fn cost_for_scenario(
        &self,
        discharges: &DischargeInput,
        occurrence: Option<&[f64]>,
        delta: bool,
    ) -> Result<BTreeMap<RouteId, f64>> {
        let costs = self.cost_per_discharge(discharges)?;

        if let Some(weights) = occurrence {
            if weights.len() != costs.len() {
                return Err(ValidationError::OccurrenceCount {
                    expected: costs.len(),
                    found: weights.len(),
                }
                .into());
            }
            if let Some((index, &value)) = weights
                .iter()
                .enumerate()
                .find(|(_, w)| !w.is_finite() || **w < 0.0)
            {
                return Err(ValidationError::InvalidOccurrence { index, value }.into());
            }
        }

        let baseline = if delta {
            self.unrestricted_costs()?
        } else {
            vec![0.0; costs.columns().len()]
        };

        let rows = costs
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let weight = occurrence.map_or(1.0, |w| w[i]);
                row.iter()
                    .zip(&baseline)
                    .map(|(cost, base)| (cost - base) * weight)
                    .collect()
            })
            .collect();
        let weighted =
            SampleTable::from_parts(costs.labels().to_vec(), costs.columns().to_vec(), rows);

        debug!(
            "Scenario over {} samples (delta: {}, weighted: {})",
            weighted.len(),
            delta,
            occurrence.is_some()
        );
        Ok(weighted
            .columns()
            .iter()
            .cloned()
            .zip(weighted.column_sums())
            .collect())
    }
}
