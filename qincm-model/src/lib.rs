//! Quick inland navigation cost model.
//!
//! Estimates what restricted water depth costs inland shipping. Chokepoints
//! turn river discharge into depth, routes turn the depth at their shallowest
//! chokepoint into a cost per day, and the cost engine sums those costs over
//! a discharge scenario.

pub mod chokepoint;
pub mod engine;
pub mod error;
pub mod mode;
pub mod model;
pub mod route;
pub mod sample;
pub mod stats;
pub mod tables;

pub use chokepoint::Chokepoint;
pub use engine::NO_RESTRICTION_DISCHARGE;
pub use error::{ConfigurationError, QincmError, Result, ValidationError};
pub use mode::Mode;
pub use model::Model;
pub use route::{Route, RouteId, MISSING_DEPTH_SENTINEL, UNDER_KEEL_CLEARANCE};
pub use sample::{DischargeInput, SampleLabel, SampleTable};
pub use stats::ChokepointStats;
pub use tables::{ChokepointTable, RouteCostTable};
