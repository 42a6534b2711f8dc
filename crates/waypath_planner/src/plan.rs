use serde::{Deserialize, Serialize};
use waypath_core::{route::Route, waypoint::Waypoint};

#[derive(Debug, Clone, Serialize)]
pub struct PlanRequestBody {
    pub start_city: String,

    /// Stops the greedy tour must include. Empty means every city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_visit: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_city: Option<String>,

    pub return_to_start: bool,
}

/// Planner answer. Only `route` feeds path resolution; the other fields are
/// passed through for display.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResponse {
    pub route: Route,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub total_distance_km: Option<f64>,

    /// Display-only stops, never resolved into the path
    #[serde(default)]
    pub suggested_cities: Vec<Waypoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStrategy {
    /// Nearest-neighbour tour through the must-visit cities
    Greedy,
    /// Point-to-point search between a start and an end city
    Intelligent,
}

impl PlanStrategy {
    pub fn path(&self) -> &'static str {
        match self {
            PlanStrategy::Greedy => "/plan/greedy",
            PlanStrategy::Intelligent => "/plan/intelligent",
        }
    }
}
