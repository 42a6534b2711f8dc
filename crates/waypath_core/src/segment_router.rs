use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    road_route_provider::RoadRouteProvider, road_segment::RoadSegment, waypoint::Waypoint,
};

pub const DEFAULT_SEGMENT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct SegmentRouterParams {
    /// Upper bound for a single provider request. One attempt, no retries.
    pub timeout: Duration,
}

impl Default for SegmentRouterParams {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SEGMENT_TIMEOUT,
        }
    }
}

/// Resolves the road path between two consecutive waypoints, falling back to
/// a straight line whenever the provider cannot give one.
pub struct SegmentRouter<P> {
    provider: P,
    params: SegmentRouterParams,
}

impl<P> SegmentRouter<P>
where
    P: RoadRouteProvider,
{
    pub fn new(provider: P, params: SegmentRouterParams) -> Self {
        Self { provider, params }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Never fails: provider errors, timeouts and empty answers all degrade
    /// to `[start, end]`.
    pub async fn resolve(&self, start: &Waypoint, end: &Waypoint) -> RoadSegment {
        let request = self.provider.fetch_routes(start.point(), end.point());

        match tokio::time::timeout(self.params.timeout, request).await {
            Ok(Ok(routes)) => {
                let segment = routes
                    .first()
                    .and_then(|route| RoadSegment::from_lng_lat_positions(&route.positions));

                match segment {
                    Some(segment) => {
                        debug!(
                            from = start.name(),
                            to = end.name(),
                            points = segment.points().len(),
                            "Resolved road segment"
                        );
                        segment
                    }
                    None => {
                        warn!(
                            from = start.name(),
                            to = end.name(),
                            candidates = routes.len(),
                            "No road route found for segment, using straight line"
                        );
                        RoadSegment::straight_line(start, end)
                    }
                }
            }
            Ok(Err(error)) => {
                warn!(
                    from = start.name(),
                    to = end.name(),
                    %error,
                    "Road routing request failed, using straight line"
                );
                RoadSegment::straight_line(start, end)
            }
            Err(_) => {
                warn!(
                    from = start.name(),
                    to = end.name(),
                    timeout_ms = self.params.timeout.as_millis() as u64,
                    "Road routing request timed out, using straight line"
                );
                RoadSegment::straight_line(start, end)
            }
        }
    }
}
