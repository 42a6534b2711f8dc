use serde::{Deserialize, Serialize};

use crate::{
    error::GeoError,
    geopoint::{GeoPoint, MAX_LATITUDE, MAX_LONGITUDE},
};

/// A named stop of an itinerary, as returned by the route planner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWaypoint")]
pub struct Waypoint {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawWaypoint {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawWaypoint> for Waypoint {
    type Error = GeoError;

    fn try_from(raw: RawWaypoint) -> Result<Self, Self::Error> {
        Waypoint::new(raw.name, raw.latitude, raw.longitude)
    }
}

impl Waypoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let name = name.into();

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoError::NonFinite(name));
        }

        if latitude.abs() > MAX_LATITUDE {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }

        if longitude.abs() > MAX_LONGITUDE {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            name,
            latitude,
            longitude,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl From<&Waypoint> for geo_types::Point {
    fn from(waypoint: &Waypoint) -> Self {
        geo_types::Point::new(waypoint.longitude, waypoint.latitude)
    }
}
