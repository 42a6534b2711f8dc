use std::future::Future;

use crate::geopoint::GeoPoint;

/// One candidate route returned by a road routing provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderRoute {
    /// Geometry positions exactly as the provider sent them, `[lng, lat]`.
    pub positions: Vec<Vec<f64>>,

    /// Road distance in meters, when the provider reports one
    pub distance: Option<f64>,

    /// Travel time in seconds, when the provider reports one
    pub duration: Option<f64>,
}

/// An external service able to route between two coordinates along roads.
///
/// Implementations report transport and protocol failures through `Error`;
/// zero candidates is a successful answer meaning "no road route".
pub trait RoadRouteProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Future<Output = Result<Vec<ProviderRoute>, Self::Error>> + Send;
}
