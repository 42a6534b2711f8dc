use serde::Serialize;

use crate::{geopoint::GeoPoint, route::Route, waypoint::Waypoint};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerRole {
    Start,
    Intermediate,
    End,
    /// Display-only stop proposed by the planner, never part of the path
    Suggested,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub position: GeoPoint,
    pub role: MarkerRole,
    pub name: String,
    pub label: String,
}

/// Markers for every route stop, in route order, followed by the suggested
/// cities.
pub fn route_markers(route: &Route, suggested: &[Waypoint]) -> Vec<Marker> {
    let last = route.len().saturating_sub(1);

    let stops = route
        .waypoints()
        .iter()
        .enumerate()
        .map(|(index, waypoint)| {
            let (role, label) = match index {
                0 => (MarkerRole::Start, String::from("Start")),
                index if index == last => (MarkerRole::End, String::from("End")),
                index => (MarkerRole::Intermediate, format!("Stop #{index}")),
            };

            Marker {
                position: waypoint.point(),
                role,
                name: waypoint.name().to_owned(),
                label,
            }
        });

    let suggestions = suggested.iter().map(|waypoint| Marker {
        position: waypoint.point(),
        role: MarkerRole::Suggested,
        name: waypoint.name().to_owned(),
        label: format!("Suggested: {}", waypoint.name()),
    });

    stops.chain(suggestions).collect()
}
