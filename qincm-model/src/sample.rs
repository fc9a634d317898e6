//! Discharge input and the labelled sample tables derived from it.

use crate::error::ValidationError;
use chrono::NaiveDate;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one discharge sample through every derived table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleLabel {
    /// Position in the caller's input
    Position(usize),
    /// A discharge value, usually the reference discharge of the sample
    Discharge(f64),
    /// Calendar date of a time series sample
    Date(NaiveDate),
}

impl fmt::Display for SampleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleLabel::Position(i) => write!(f, "{i}"),
            SampleLabel::Discharge(q) => write!(f, "{q}"),
            SampleLabel::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Discharge scenario as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum DischargeInput {
    /// One discharge per sample at the reference chokepoint.
    Reference {
        values: Vec<f64>,
        labels: Option<Vec<SampleLabel>>,
    },
    /// One row per sample, one value per chokepoint in table order.
    Table {
        rows: Vec<Vec<f64>>,
        labels: Option<Vec<SampleLabel>>,
    },
    /// One column per named chokepoint. Chokepoints left out count as missing.
    Keyed {
        columns: BTreeMap<String, Vec<f64>>,
        labels: Option<Vec<SampleLabel>>,
    },
}

impl DischargeInput {
    pub fn reference(values: impl Into<Vec<f64>>) -> Self {
        DischargeInput::Reference {
            values: values.into(),
            labels: None,
        }
    }

    /// A dated reference discharge series, labelled by date.
    pub fn series(points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = points.into_iter().unzip();
        DischargeInput::Reference {
            values,
            labels: Some(dates.into_iter().map(SampleLabel::Date).collect()),
        }
    }

    pub fn table(rows: Vec<Vec<f64>>) -> Self {
        DischargeInput::Table { rows, labels: None }
    }

    pub fn keyed(columns: BTreeMap<String, Vec<f64>>) -> Self {
        DischargeInput::Keyed {
            columns,
            labels: None,
        }
    }

    /// Replace the sample labels.
    pub fn with_labels(mut self, new_labels: Vec<SampleLabel>) -> Self {
        match &mut self {
            DischargeInput::Reference { labels, .. }
            | DischargeInput::Table { labels, .. }
            | DischargeInput::Keyed { labels, .. } => *labels = Some(new_labels),
        }
        self
    }

    pub fn labels(&self) -> Option<&[SampleLabel]> {
        match self {
            DischargeInput::Reference { labels, .. }
            | DischargeInput::Table { labels, .. }
            | DischargeInput::Keyed { labels, .. } => labels.as_deref(),
        }
    }

    /// Number of samples; for keyed input the length of the longest column.
    pub fn len(&self) -> usize {
        match self {
            DischargeInput::Reference { values, .. } => values.len(),
            DischargeInput::Table { rows, .. } => rows.len(),
            DischargeInput::Keyed { columns, .. } => {
                columns.values().map(Vec::len).max().unwrap_or(0)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A samples x columns matrix of values with a label per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable<K> {
    labels: Vec<SampleLabel>,
    columns: Vec<K>,
    rows: Vec<Vec<f64>>,
}

impl<K> SampleTable<K> {
    /// Build a table, checking that labels and rows line up with each other
    /// and with the columns.
    pub fn new(
        labels: Vec<SampleLabel>,
        columns: Vec<K>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, ValidationError> {
        if labels.len() != rows.len() {
            return Err(ValidationError::LabelCount {
                expected: rows.len(),
                found: labels.len(),
            });
        }
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(ValidationError::RowLength {
                row,
                expected: columns.len(),
                found: values.len(),
            });
        }
        Ok(SampleTable {
            labels,
            columns,
            rows,
        })
    }

    /// Build a table whose shape is known to be consistent.
    pub(crate) fn from_parts(labels: Vec<SampleLabel>, columns: Vec<K>, rows: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(labels.len(), rows.len());
        SampleTable {
            labels,
            columns,
            rows,
        }
    }

    pub fn labels(&self) -> &[SampleLabel] {
        &self.labels
    }

    pub fn columns(&self) -> &[K] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.columns.iter().position(|c| c.borrow() == key)
    }

    /// All values of one column, in sample order.
    pub fn column<Q>(&self, key: &Q) -> Option<Vec<f64>>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let index = self.column_index(key)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    pub fn value<Q>(&self, row: usize, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let index = self.column_index(key)?;
        self.rows.get(row).map(|values| values[index])
    }

    /// Per-column sums over all samples. NaN values are skipped.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.columns.len()];
        for row in &self.rows {
            for (sum, value) in sums.iter_mut().zip(row) {
                if !value.is_nan() {
                    *sum += value;
                }
            }
        }
        sums
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SampleTable<String> {
        SampleTable::new(
            vec![SampleLabel::Discharge(500.0), SampleLabel::Discharge(1000.0)],
            vec!["A".to_string(), "B".to_string()],
            vec![vec![1.0, 2.0], vec![3.0, f64::NAN]],
        )
        .unwrap()
    }

    #[test]
    fn test_column_lookup() {
        let t = table();
        assert_eq!(t.len(), 2);
        assert_eq!(t.column("A"), Some(vec![1.0, 3.0]));
        assert_eq!(t.value(0, "B"), Some(2.0));
        assert_eq!(t.column("C"), None);
        assert_eq!(t.row(1).map(|r| r[0]), Some(3.0));
    }

    #[test]
    fn test_column_sums_skip_missing() {
        assert_eq!(table().column_sums(), vec![4.0, 2.0]);
    }

    #[test]
    fn test_rejects_misaligned_rows() {
        let err = SampleTable::new(
            vec![SampleLabel::Position(0)],
            vec!["A".to_string(), "B".to_string()],
            vec![vec![1.0]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::RowLength {
                row: 0,
                expected: 2,
                found: 1
            }
        );

        let err = SampleTable::<String>::new(vec![], vec![], vec![vec![]]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LabelCount {
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn test_series_input_is_labelled_by_date() {
        let day = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let input = DischargeInput::series(vec![(day, 1200.0), (day.succ_opt().unwrap(), 1300.0)]);
        assert_eq!(input.len(), 2);
        let labels = input.labels().unwrap();
        assert_eq!(labels[0], SampleLabel::Date(day));
        assert_eq!(labels[1].to_string(), "2000-01-02");
    }
}
