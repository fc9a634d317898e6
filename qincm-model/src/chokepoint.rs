use crate::error::{ConfigurationError, Result};
use qincm_data::interpolation::{Interpolator, OutOfRange};

/// A river cross-section whose depth can limit the draught of passing vessels.
#[derive(Debug, Clone, PartialEq)]
pub struct Chokepoint {
    name: String,
    depth: Interpolator,
    distribution: Interpolator,
}

impl Chokepoint {
    /// Build a chokepoint from its `(discharge, depth)` samples and its
    /// `(reference discharge, local discharge)` samples. Both curves
    /// extrapolate beyond their samples.
    pub fn new<D, R>(name: impl Into<String>, discharge_depth: D, reference_local: R) -> Result<Self>
    where
        D: IntoIterator<Item = (f64, f64)>,
        R: IntoIterator<Item = (f64, f64)>,
    {
        let name = name.into();
        let depth = Interpolator::new(discharge_depth, OutOfRange::Extrapolate).map_err(
            |source| ConfigurationError::Curve {
                curve: format!("{name} discharge-depth"),
                source,
            },
        )?;
        let distribution = Interpolator::new(reference_local, OutOfRange::Extrapolate).map_err(
            |source| ConfigurationError::Curve {
                curve: format!("{name} reference-discharge"),
                source,
            },
        )?;
        Ok(Chokepoint {
            name,
            depth,
            distribution,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Water depth at a local discharge.
    pub fn depth_at(&self, discharge: f64) -> f64 {
        self.depth.evaluate(discharge)
    }

    pub fn depths_at(&self, discharges: &[f64]) -> Vec<f64> {
        self.depth.evaluate_all(discharges)
    }

    /// Local discharge at this chokepoint for a discharge at the reference
    /// chokepoint.
    pub fn local_discharge_from_reference(&self, reference_discharge: f64) -> f64 {
        self.distribution.evaluate(reference_discharge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QincmError;

    fn tiel() -> Chokepoint {
        Chokepoint::new(
            "WA_Tiel",
            vec![(450.0, 2.7), (900.0, 3.1), (1800.0, 4.3), (2700.0, 5.2)],
            vec![(500.0, 450.0), (1000.0, 900.0), (2000.0, 1800.0), (3000.0, 2700.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_depth_at_samples_and_between() {
        let c = tiel();
        assert_eq!(c.name(), "WA_Tiel");
        assert_eq!(c.depth_at(900.0), 3.1);
        assert!((c.depth_at(1350.0) - 3.7).abs() < 1e-9);
        let depths = c.depths_at(&[450.0, 2700.0]);
        assert_eq!(depths, vec![2.7, 5.2]);
    }

    #[test]
    fn test_depth_extrapolates_below_lowest_sample() {
        let c = tiel();
        // first segment slope is 0.4 / 450
        let expected = 2.7 - 225.0 * 0.4 / 450.0;
        assert!((c.depth_at(225.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_local_discharge_from_reference() {
        let c = tiel();
        assert_eq!(c.local_discharge_from_reference(1000.0), 900.0);
        assert!((c.local_discharge_from_reference(1500.0) - 1350.0).abs() < 1e-9);
        assert!((c.local_discharge_from_reference(4000.0) - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_is_a_configuration_error() {
        let err = Chokepoint::new("A", vec![(500.0, 2.0)], vec![(500.0, 500.0)]).unwrap_err();
        match err {
            QincmError::Configuration(ConfigurationError::Curve { curve, .. }) => {
                assert_eq!(curve, "A discharge-depth");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
