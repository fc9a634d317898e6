use crate::error::{ConfigurationError, Result};
use qincm_data::interpolation::{Interpolator, OutOfRange};
use serde::Deserialize;
use std::fmt;

/// Safety margin between water depth and usable draught.
pub const UNDER_KEEL_CLEARANCE: f64 = 0.20;

/// Limiting depth used when a route has no chokepoint with a known depth.
///
/// Large enough that every cost curve is read at its deepest sample.
pub const MISSING_DEPTH_SENTINEL: f64 = 999_999.0;

/// Usable draught for a given water depth.
pub fn draught_from_depth(depth: f64) -> f64 {
    depth - UNDER_KEEL_CLEARANCE
}

/// A route is identified by the set of chokepoints it passes.
///
/// Names are kept sorted and deduplicated, so two routes over the same
/// chokepoints compare equal whatever order they were listed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct RouteId(Vec<String>);

impl RouteId {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        RouteId(names)
    }

    /// The chokepoint names, sorted.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for RouteId {
    fn from(names: Vec<String>) -> Self {
        RouteId::new(names)
    }
}

impl<S: Into<String>> FromIterator<S> for RouteId {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        RouteId::new(iter)
    }
}

/// Formats as `{'A', 'B'}`; the empty route is `{}`.
impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{name}'")?;
        }
        write!(f, "}}")
    }
}

/// Smallest draught that is not missing (NaN), or the draught of the
/// missing-depth sentinel when there is none.
pub fn limiting_draught(draughts: &[f64]) -> f64 {
    draughts
        .iter()
        .copied()
        .filter(|d| !d.is_nan())
        .reduce(f64::min)
        .unwrap_or_else(|| draught_from_depth(MISSING_DEPTH_SENTINEL))
}

/// Index of the chokepoint that binds: the first strict minimum, skipping
/// missing values.
pub fn binding_position(draughts: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &d) in draughts.iter().enumerate() {
        if d.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if d >= current => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Shipping cost of a route as a function of the draught it allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    id: RouteId,
    cost: Interpolator,
}

impl Route {
    /// Build a route from `(draught, cost per day)` samples. Costs beyond the
    /// sampled draughts hold at the nearest sample.
    pub fn new<I>(id: RouteId, draught_costs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let cost = Interpolator::new(draught_costs, OutOfRange::Clamp).map_err(|source| {
            ConfigurationError::Curve {
                curve: format!("route {id} draught-cost"),
                source,
            }
        })?;
        Ok(Route { id, cost })
    }

    pub fn id(&self) -> &RouteId {
        &self.id
    }

    pub fn cost_at_draught(&self, draught: f64) -> f64 {
        self.cost.evaluate(draught)
    }

    /// Cost for one sample, given the draught at each of the route's
    /// chokepoints. The shallowest chokepoint governs.
    pub fn cost_at_draughts(&self, draughts: &[f64]) -> f64 {
        self.cost_at_draught(limiting_draught(draughts))
    }

    /// Cost with no depth restriction at all.
    pub fn unconstrained_cost(&self) -> f64 {
        self.cost_at_draught(draught_from_depth(MISSING_DEPTH_SENTINEL))
    }
}
