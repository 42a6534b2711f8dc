use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use serde_json::json;
use waypath_core::{
    detailed_path::{DetailedPath, PathKind},
    markers::Marker,
    viewport::CameraView,
};

/// Map layers as a GeoJSON feature collection: the path polyline first, then
/// one point per marker, with the camera view as a foreign member.
pub fn render_map(
    path: &DetailedPath,
    markers: &[Marker],
    camera: Option<&CameraView>,
) -> GeoJson {
    let mut features = Vec::with_capacity(markers.len() + 1);

    if !path.is_empty() {
        let positions: Vec<Vec<f64>> = path
            .points()
            .iter()
            .map(|point| vec![point.lng, point.lat])
            .collect();

        features.push(feature(
            Value::LineString(positions),
            json!({
                "layer": "path",
                "kind": path_kind(path.kind()),
                "segments": path.segments(),
                "straight_segments": path.straight_segments(),
                "length_m": path.length_meters().round(),
            }),
        ));
    }

    for marker in markers {
        features.push(feature(
            Value::Point(vec![marker.position.lng, marker.position.lat]),
            json!({
                "layer": "marker",
                "role": marker.role,
                "name": marker.name,
                "label": marker.label,
            }),
        ));
    }

    let foreign_members = camera.map(|view| {
        let mut members = JsonObject::new();
        members.insert(
            String::from("camera"),
            json!({
                "center": [view.center.lng, view.center.lat],
                "zoom": view.zoom,
            }),
        );
        members
    });

    let bbox = camera.map(|view| {
        let south_west = view.bounds.south_west();
        let north_east = view.bounds.north_east();
        vec![south_west.lng, south_west.lat, north_east.lng, north_east.lat]
    });

    GeoJson::FeatureCollection(FeatureCollection {
        bbox,
        features,
        foreign_members,
    })
}

fn feature(value: Value, properties: JsonValue) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: match properties {
            JsonValue::Object(properties) => Some(properties),
            _ => None,
        },
        foreign_members: None,
    }
}

fn path_kind(kind: PathKind) -> &'static str {
    match kind {
        PathKind::Empty => "empty",
        PathKind::RoadFollowing => "road_following",
        PathKind::WaypointFallback => "waypoint_fallback",
    }
}
