use crate::{
    chokepoint::Chokepoint,
    error::{ConfigurationError, Result},
    route::{Route, RouteId},
    tables::{ChokepointTable, RouteCostTable},
};
use log::{debug, info};
use std::collections::HashSet;

/// All chokepoints and routes of a waterway network.
///
/// Built once from the input tables and read-only afterwards, so one model
/// can answer any number of queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    chokepoints: Vec<Chokepoint>,
    routes: Vec<Route>,
    reference: usize,
}

impl Model {
    /// Assemble a model from already built chokepoints and routes.
    ///
    /// Every chokepoint on a route must exist, names and routes must be
    /// unique, and `reference` must name one of the chokepoints.
    pub fn new(chokepoints: Vec<Chokepoint>, routes: Vec<Route>, reference: &str) -> Result<Self> {
        if chokepoints.is_empty() {
            return Err(ConfigurationError::NoChokepoints.into());
        }
        let mut names = HashSet::new();
        for chokepoint in &chokepoints {
            if !names.insert(chokepoint.name()) {
                return Err(
                    ConfigurationError::DuplicateChokepoint(chokepoint.name().to_string()).into(),
                );
            }
        }
        let reference = chokepoints
            .iter()
            .position(|c| c.name() == reference)
            .ok_or_else(|| ConfigurationError::UnknownReference(reference.to_string()))?;

        let mut seen = HashSet::new();
        for route in &routes {
            if let Some(unknown) = route.id().names().iter().find(|n| !names.contains(n.as_str())) {
                return Err(ConfigurationError::UnknownChokepoint {
                    route: route.id().to_string(),
                    chokepoint: unknown.clone(),
                }
                .into());
            }
            if !seen.insert(route.id()) {
                return Err(ConfigurationError::DuplicateRoute(route.id().to_string()).into());
            }
        }

        Ok(Model {
            chokepoints,
            routes,
            reference,
        })
    }

    /// Build a model from the route cost and chokepoint tables.
    ///
    /// Chokepoints keep the table's order and the reference defaults to the
    /// first of them. Each chokepoint's local discharge is tied to the
    /// reference discharge by pairing the two sample lists position by
    /// position, so every chokepoint needs as many samples as the reference.
    pub fn from_tables(
        route_table: &RouteCostTable,
        chokepoint_table: &ChokepointTable,
        reference: Option<&str>,
    ) -> Result<Self> {
        let samples = chokepoint_table.discharge_depths()?;
        let reference = match reference {
            Some(name) => name.to_string(),
            None => samples
                .first()
                .map(|(name, _)| name.clone())
                .ok_or(ConfigurationError::NoChokepoints)?,
        };
        let reference_discharges: Vec<f64> = samples
            .iter()
            .find(|(name, _)| *name == reference)
            .map(|(_, s)| s.iter().map(|(q, _)| *q).collect())
            .ok_or_else(|| ConfigurationError::UnknownReference(reference.clone()))?;

        let mut chokepoints = Vec::with_capacity(samples.len());
        for (name, discharge_depth) in samples {
            if discharge_depth.len() != reference_discharges.len() {
                return Err(ConfigurationError::ReferenceSampleMismatch {
                    chokepoint: name,
                    expected: reference_discharges.len(),
                    found: discharge_depth.len(),
                }
                .into());
            }
            let reference_local: Vec<(f64, f64)> = reference_discharges
                .iter()
                .zip(&discharge_depth)
                .map(|(q_ref, (q, _))| (*q_ref, *q))
                .collect();
            debug!(
                "Chokepoint {}: {} discharge samples",
                name,
                discharge_depth.len()
            );
            chokepoints.push(Chokepoint::new(name, discharge_depth, reference_local)?);
        }

        let mut routes = Vec::new();
        for (id, draught_costs) in route_table.route_samples()? {
            routes.push(Route::new(id, draught_costs)?);
        }

        let model = Model::new(chokepoints, routes, &reference)?;
        info!(
            "Loaded model with {} chokepoints and {} routes (reference: {})",
            model.chokepoints.len(),
            model.routes.len(),
            reference
        );
        Ok(model)
    }

    /// Parse both tables from JSON strings and build the model.
    pub fn from_json_strs(
        route_costs_json: &str,
        chokepoints_json: &str,
        reference: Option<&str>,
    ) -> Result<Self> {
        let route_table = RouteCostTable::from_json_str(route_costs_json)?;
        let chokepoint_table = ChokepointTable::from_json_str(chokepoints_json)?;
        Model::from_tables(&route_table, &chokepoint_table, reference)
    }

    pub fn chokepoints(&self) -> &[Chokepoint] {
        &self.chokepoints
    }

    pub fn chokepoint(&self, name: &str) -> Option<&Chokepoint> {
        self.chokepoints.iter().find(|c| c.name() == name)
    }

    /// Chokepoint names in table order; per-chokepoint discharge rows use
    /// this order.
    pub fn chokepoint_names(&self) -> Vec<String> {
        self.chokepoints.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| r.id() == id)
    }

    pub fn reference(&self) -> &Chokepoint {
        &self.chokepoints[self.reference]
    }

    pub(crate) fn reference_index(&self) -> usize {
        self.reference
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::QincmError;

    static ROUTES: &str = include_str!("../../fixtures/testmodel_4p/route_depth_costs.json");
    static CHOKEPOINTS: &str =
        include_str!("../../fixtures/testmodel_4p/knelpunt_discharge_waterdepth.json");

    /// The four chokepoint fixture model, referenced at Nijmegen.
    pub(crate) fn fixture_model() -> Model {
        Model::from_json_strs(ROUTES, CHOKEPOINTS, Some("WA_Nijmegen")).unwrap()
    }

    #[test]
    fn test_load_fixture_model() {
        let model = fixture_model();
        assert_eq!(
            model.chokepoint_names(),
            vec!["WA_Nijmegen", "WA_Tiel", "PK_Arnhem", "IJ_Deventer"]
        );
        assert_eq!(model.routes().len(), 4);
        assert_eq!(model.reference().name(), "WA_Nijmegen");
        assert!(model.route(&RouteId::new(["WA_Tiel", "WA_Nijmegen"])).is_some());
        assert!(model.route(&RouteId::new(["WA_Tiel"])).is_none());
    }

    #[test]
    fn test_reference_defaults_to_first_chokepoint() {
        let model = Model::from_json_strs(ROUTES, CHOKEPOINTS, None).unwrap();
        assert_eq!(model.reference().name(), "WA_Nijmegen");

        let routes = r#"{"routes": {"0": ["A"]}, "2.0": {"0": 10}, "3.0": {"0": 5}}"#;
        let chokepoints = r#"{"B": {"50": 2.0, "100": 3.0}, "A": {"500": 2.0, "1000": 3.0}}"#;
        let model = Model::from_json_strs(routes, chokepoints, None).unwrap();
        assert_eq!(model.reference().name(), "B");
    }

    #[test]
    fn test_reference_curve_pairs_samples_by_position() {
        let routes = r#"{"routes": {"0": ["A"]}, "2.0": {"0": 10}, "3.0": {"0": 5}}"#;
        let chokepoints =
            r#"{"A": {"1000": 3.0, "500": 2.0}, "B": {"50": 2.0, "100": 3.0}}"#;
        let model = Model::from_json_strs(routes, chokepoints, None).unwrap();
        let b = model.chokepoint("B").unwrap();
        assert_eq!(b.local_discharge_from_reference(1000.0), 50.0);
        assert_eq!(b.local_discharge_from_reference(500.0), 100.0);
        assert_eq!(b.depth_at(50.0), 2.0);
    }

    #[test]
    fn test_reference_curve_on_fixture() {
        let model = fixture_model();
        let arnhem = model.chokepoint("PK_Arnhem").unwrap();
        assert_eq!(arnhem.local_discharge_from_reference(500.0), 100.0);
        assert_eq!(arnhem.local_discharge_from_reference(2000.0), 400.0);
        let nijmegen = model.reference();
        assert_eq!(nijmegen.local_discharge_from_reference(1234.0), 1234.0);
    }

    #[test]
    fn test_unknown_reference() {
        let err = Model::from_json_strs(ROUTES, CHOKEPOINTS, Some("Lobith")).unwrap_err();
        assert_eq!(
            err,
            QincmError::Configuration(ConfigurationError::UnknownReference("Lobith".to_string()))
        );
    }

    #[test]
    fn test_route_with_unknown_chokepoint() {
        let routes = r#"{"routes": {"0": ["A", "Z"]}, "2.0": {"0": 10}, "3.0": {"0": 5}}"#;
        let chokepoints = r#"{"A": {"500": 2.0, "1000": 3.0}}"#;
        let err = Model::from_json_strs(routes, chokepoints, None).unwrap_err();
        assert_eq!(
            err,
            QincmError::Configuration(ConfigurationError::UnknownChokepoint {
                route: "{'A', 'Z'}".to_string(),
                chokepoint: "Z".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_route() {
        let routes = r#"{"routes": {"0": ["A", "B"], "1": ["B", "A"]},
            "2.0": {"0": 10, "1": 10}, "3.0": {"0": 5, "1": 5}}"#;
        let chokepoints = r#"{"A": {"500": 2.0, "1000": 3.0}, "B": {"50": 2.0, "100": 3.0}}"#;
        let err = Model::from_json_strs(routes, chokepoints, None).unwrap_err();
        assert!(matches!(
            err,
            QincmError::Configuration(ConfigurationError::DuplicateRoute(_))
        ));
    }

    #[test]
    fn test_sample_count_must_match_reference() {
        let routes = r#"{"routes": {"0": ["A"]}, "2.0": {"0": 10}, "3.0": {"0": 5}}"#;
        let chokepoints =
            r#"{"A": {"500": 2.0, "1000": 3.0}, "B": {"50": 2.0, "100": 3.0, "200": 4.0}}"#;
        let err = Model::from_json_strs(routes, chokepoints, Some("A")).unwrap_err();
        assert_eq!(
            err,
            QincmError::Configuration(ConfigurationError::ReferenceSampleMismatch {
                chokepoint: "B".to_string(),
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn test_too_few_samples() {
        let routes = r#"{"routes": {"0": ["A"]}, "2.0": {"0": 10}}"#;
        let chokepoints = r#"{"A": {"500": 2.0, "1000": 3.0}}"#;
        let err = Model::from_json_strs(routes, chokepoints, None).unwrap_err();
        assert!(matches!(
            err,
            QincmError::Configuration(ConfigurationError::Curve { .. })
        ));

        let err = Model::from_json_strs(r#"{"routes": {}}"#, "{}", None).unwrap_err();
        assert_eq!(err, QincmError::Configuration(ConfigurationError::NoChokepoints));
    }

    #[test]
    fn test_model_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Model>();
    }
}
