use crate::{geopoint::GeoPoint, route::Route};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PathKind {
    /// Route too short to have a path
    #[default]
    Empty,
    /// Concatenation of one road segment per leg
    RoadFollowing,
    /// Waypoints used directly after the resolution aborted
    WaypointFallback,
}

/// The render-ready polyline of a whole route, in route order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DetailedPath {
    points: Vec<GeoPoint>,
    segments: usize,
    straight_segments: usize,
    kind: PathKind,
}

impl DetailedPath {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends the points of the next leg.
    pub(crate) fn push_segment(&mut self, points: &[GeoPoint], straight_line: bool) {
        self.points.extend_from_slice(points);
        self.segments += 1;
        if straight_line {
            self.straight_segments += 1;
        }
        self.kind = PathKind::RoadFollowing;
    }

    /// Each waypoint's own coordinate, mapped 1:1.
    pub fn from_waypoints(route: &Route) -> Self {
        Self {
            points: route.points(),
            segments: route.len().saturating_sub(1),
            straight_segments: route.len().saturating_sub(1),
            kind: PathKind::WaypointFallback,
        }
    }

    pub(crate) fn with_points(mut self, points: Vec<GeoPoint>) -> Self {
        self.points = points;
        self
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of legs that went into this path.
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Number of legs drawn as a straight line instead of following roads.
    pub fn straight_segments(&self) -> usize {
        self.straight_segments
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    /// Haversine length of the polyline, in meters.
    pub fn length_meters(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].haversine_distance(&pair[1]))
            .sum()
    }
}
