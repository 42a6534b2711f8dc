use serde::{Deserialize, Serialize};

use crate::{geopoint::GeoPoint, waypoint::Waypoint};

/// Waypoints in itinerary order. The order is meaningful, so the type
/// exposes no way to reorder or deduplicate its stops.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(Vec<Waypoint>);

impl Route {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self(waypoints)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A route needs at least two stops before there is a path to resolve.
    pub fn has_path(&self) -> bool {
        self.0.len() >= 2
    }

    /// Consecutive `(from, to)` pairs, in route order.
    pub fn legs(&self) -> impl Iterator<Item = (&Waypoint, &Waypoint)> {
        self.0.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    pub fn points(&self) -> Vec<GeoPoint> {
        self.0.iter().map(Waypoint::point).collect()
    }
}

impl From<Vec<Waypoint>> for Route {
    fn from(waypoints: Vec<Waypoint>) -> Self {
        Self(waypoints)
    }
}
