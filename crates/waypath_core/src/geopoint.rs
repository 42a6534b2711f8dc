use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6_371_000.0;

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A coordinate in the system's (latitude, longitude) order.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a point from a position in GeoJSON / OSRM order, `[lng, lat]`.
    pub fn from_lng_lat(position: &[f64]) -> Option<Self> {
        match *position {
            [lng, lat] => Some(Self { lat, lng }),
            _ => None,
        }
    }

    /// Finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= MAX_LATITUDE
            && self.lng.abs() <= MAX_LONGITUDE
    }

    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();
        let lat2 = other.lat.to_radians();
        let lng2 = other.lng.to_radians();

        let dlat = lat2 - lat1;
        let dlng = lng2 - lng1;

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }
}

impl From<&GeoPoint> for geo_types::Point {
    fn from(point: &GeoPoint) -> Self {
        geo_types::Point::new(point.lng, point.lat)
    }
}

impl From<GeoPoint> for geo_types::Coord {
    fn from(point: GeoPoint) -> Self {
        geo_types::Coord {
            x: point.lng,
            y: point.lat,
        }
    }
}

impl From<geo_types::Coord> for GeoPoint {
    fn from(coord: geo_types::Coord) -> Self {
        GeoPoint {
            lat: coord.y,
            lng: coord.x,
        }
    }
}
