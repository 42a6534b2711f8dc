use crate::{geopoint::GeoPoint, waypoint::Waypoint};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentSource {
    /// Geometry returned by the road routing provider
    Provider,
    /// Straight line between the two waypoints
    StraightLine,
}

/// The path between two consecutive waypoints. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    points: Vec<GeoPoint>,
    source: SegmentSource,
}

impl RoadSegment {
    /// Builds a segment from provider positions in `[lng, lat]` order,
    /// transposing each one to `(lat, lng)`. Positions that are not exactly
    /// two numbers are skipped. Returns `None` when nothing usable is left.
    pub fn from_lng_lat_positions<P>(positions: &[P]) -> Option<Self>
    where
        P: AsRef<[f64]>,
    {
        let points: Vec<GeoPoint> = positions
            .iter()
            .filter_map(|position| GeoPoint::from_lng_lat(position.as_ref()))
            .collect();

        if points.is_empty() {
            return None;
        }

        Some(Self {
            points,
            source: SegmentSource::Provider,
        })
    }

    pub fn straight_line(start: &Waypoint, end: &Waypoint) -> Self {
        Self {
            points: vec![start.point(), end.point()],
            source: SegmentSource::StraightLine,
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn source(&self) -> SegmentSource {
        self.source
    }

    pub fn is_straight_line(&self) -> bool {
        self.source == SegmentSource::StraightLine
    }
}
