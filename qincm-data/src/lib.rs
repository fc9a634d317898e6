//! Interpolation curves for the navigation cost model.
//!
//! This crate holds the one-dimensional lookup functions that every other
//! part of the model is built from: discharge to depth, reference discharge
//! to local discharge, and draught to cost.

/// Piecewise-linear interpolation over ordered sample points.
pub mod interpolation {
    use thiserror::Error;

    /// What a curve returns for inputs outside its sampled range.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum OutOfRange {
        /// Hold the y-value of the nearest boundary sample.
        Clamp,
        /// Continue the slope of the outermost segment.
        Extrapolate,
    }

    /// Errors raised while building a curve from samples.
    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum InterpolationError {
        /// Fewer than two samples were supplied
        #[error("At least 2 samples are needed to interpolate, found {0}")]
        InsufficientSamples(usize),

        /// A sample x value is NaN or infinite
        #[error("Sample x value is not finite: {0}")]
        NonFiniteSample(f64),

        /// Two samples share the same x value
        #[error("Duplicate sample at x = {0}")]
        DuplicateSample(f64),
    }

    /// A single (x, y) sample of a curve.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct DataPoint {
        pub x: f64,
        pub y: f64,
    }

    impl From<(f64, f64)> for DataPoint {
        fn from((x, y): (f64, f64)) -> Self {
            DataPoint { x, y }
        }
    }

    /// Linear interpolation of `x` on the line through `start` and `end`.
    fn interpolate_pair(start: &DataPoint, end: &DataPoint, x: f64) -> f64 {
        let slope = (end.y - start.y) / (end.x - start.x);
        start.y + slope * (x - start.x)
    }

    /// A 1-D piecewise-linear function with a fixed out-of-range policy.
    ///
    /// Samples are sorted by x on construction, so callers may pass them in
    /// any order. The curve is immutable once built.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Interpolator {
        points: Vec<DataPoint>,
        policy: OutOfRange,
    }

    impl Interpolator {
        /// Build a curve from `(x, y)` samples.
        ///
        /// Fails when fewer than two samples are given, when an x value is
        /// not finite, or when two samples share an x value.
        pub fn new<I, P>(samples: I, policy: OutOfRange) -> Result<Self, InterpolationError>
        where
            I: IntoIterator<Item = P>,
            P: Into<DataPoint>,
        {
            let mut points: Vec<DataPoint> = samples.into_iter().map(Into::into).collect();
            if points.len() < 2 {
                return Err(InterpolationError::InsufficientSamples(points.len()));
            }
            if let Some(point) = points.iter().find(|p| !p.x.is_finite()) {
                return Err(InterpolationError::NonFiniteSample(point.x));
            }
            points.sort_by(|a, b| a.x.total_cmp(&b.x));
            if let Some(window) = points.windows(2).find(|w| w[0].x == w[1].x) {
                return Err(InterpolationError::DuplicateSample(window[0].x));
            }
            Ok(Interpolator { points, policy })
        }

        /// The sorted samples backing this curve.
        pub fn points(&self) -> &[DataPoint] {
            &self.points
        }

        /// Smallest and largest sampled x.
        pub fn domain(&self) -> (f64, f64) {
            (self.points[0].x, self.points[self.points.len() - 1].x)
        }

        /// Evaluate the curve at `x`.
        ///
        /// At a sampled x the sample's y is returned exactly. NaN in gives
        /// NaN out.
        pub fn evaluate(&self, x: f64) -> f64 {
            if x.is_nan() {
                return f64::NAN;
            }
            let n = self.points.len();
            let first = &self.points[0];
            let last = &self.points[n - 1];

            if x < first.x {
                return match self.policy {
                    OutOfRange::Clamp => first.y,
                    OutOfRange::Extrapolate => interpolate_pair(first, &self.points[1], x),
                };
            }
            if x > last.x {
                return match self.policy {
                    OutOfRange::Clamp => last.y,
                    OutOfRange::Extrapolate => interpolate_pair(&self.points[n - 2], last, x),
                };
            }

            // first index whose x lies strictly above the input
            let upper = self.points.partition_point(|p| p.x <= x);
            if upper == n {
                return last.y;
            }
            let start = &self.points[upper - 1];
            if start.x == x {
                return start.y;
            }
            interpolate_pair(start, &self.points[upper], x)
        }

        /// Evaluate the curve for every value in `xs`, preserving order.
        pub fn evaluate_all(&self, xs: &[f64]) -> Vec<f64> {
            xs.iter().map(|&x| self.evaluate(x)).collect()
        }
    }

}
