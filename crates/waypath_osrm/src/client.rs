use std::{future::Future, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use waypath_core::{
    geopoint::GeoPoint,
    road_route_provider::{ProviderRoute, RoadRouteProvider},
};

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    geometry: Geometry,
    distance: Option<f64>,
    duration: Option<f64>,
}

#[derive(Deserialize)]
struct Geometry {
    /// Kept loose so one bad position does not discard the whole route
    coordinates: Vec<serde_json::Value>,
}

#[derive(Clone, Debug)]
pub struct OsrmRouteClientParams {
    pub osrm_url: String,
    /// OSRM profile, e.g. "driving"
    pub profile: String,
    pub timeout: Duration,
}

pub const OSRM_PUBLIC_URL: &str = "http://router.project-osrm.org";
pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/";

impl Default for OsrmRouteClientParams {
    fn default() -> Self {
        Self {
            osrm_url: String::from(OSRM_PUBLIC_URL),
            profile: String::from("driving"),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the OSRM `route` service, returning full GeoJSON geometries.
pub struct OsrmRouteClient {
    params: OsrmRouteClientParams,
    client: reqwest::Client,
}

impl OsrmRouteClient {
    pub fn new(params: OsrmRouteClientParams) -> Result<Self, OsrmError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self { params, client })
    }

    pub fn params(&self) -> &OsrmRouteClientParams {
        &self.params
    }

    /// Candidate routes from `start` to `end`. Positions are returned as OSRM
    /// sends them, `[lng, lat]`. An OSRM `NoRoute` answer is zero candidates.
    pub async fn fetch_route<P>(&self, start: P, end: P) -> Result<Vec<ProviderRoute>, OsrmError>
    where
        P: Into<geo_types::Point>,
    {
        let start: geo_types::Point = start.into();
        let end: geo_types::Point = end.into();

        let mut url = self.params.osrm_url.trim_end_matches('/').to_string();
        url.push_str(OSRM_ROUTE_API_PATH);
        url.push_str(&self.params.profile);
        url.push('/');
        url.push_str(&format!(
            "{},{};{},{}",
            start.x(),
            start.y(),
            end.x(),
            end.y()
        ));

        let response = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        let parsed = match serde_json::from_slice::<RouteResponse>(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(OsrmError::Api {
                    status: status.as_u16(),
                    message: String::from_utf8_lossy(&body).into_owned(),
                });
            }
            Err(error) => return Err(OsrmError::Deserialize(error)),
        };

        match parsed.code.as_str() {
            "Ok" if status.is_success() => {
                Ok(parsed.routes.into_iter().map(to_provider_route).collect())
            }
            "NoRoute" => {
                debug!(
                    message = parsed.message.as_deref().unwrap_or_default(),
                    "OSRM found no route"
                );
                Ok(Vec::new())
            }
            code => Err(OsrmError::Api {
                status: status.as_u16(),
                message: parsed.message.unwrap_or_else(|| code.to_string()),
            }),
        }
    }
}

fn to_provider_route(route: Route) -> ProviderRoute {
    let total = route.geometry.coordinates.len();

    let positions: Vec<Vec<f64>> = route
        .geometry
        .coordinates
        .iter()
        .filter_map(|value| {
            value
                .as_array()?
                .iter()
                .map(serde_json::Value::as_f64)
                .collect::<Option<Vec<f64>>>()
        })
        .collect();

    if positions.len() < total {
        debug!(
            dropped = total - positions.len(),
            "Dropped malformed OSRM positions"
        );
    }

    ProviderRoute {
        positions,
        distance: route.distance,
        duration: route.duration,
    }
}

impl RoadRouteProvider for OsrmRouteClient {
    type Error = OsrmError;

    fn fetch_routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Future<Output = Result<Vec<ProviderRoute>, Self::Error>> + Send {
        self.fetch_route(geo_types::Point::from(&start), geo_types::Point::from(&end))
    }
}
