use std::{
    panic::AssertUnwindSafe,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{
    detailed_path::DetailedPath, resolution_token::ResolutionToken,
    road_route_provider::RoadRouteProvider, road_segment::RoadSegment, route::Route,
    sanitizer::sanitize, segment_router::SegmentRouter,
};

pub const DEFAULT_PACING: Duration = Duration::from_millis(150);

#[derive(Clone, Debug)]
pub struct PathAssemblerParams {
    /// Delay between two consecutive provider requests
    pub pacing: Duration,
}

impl Default for PathAssemblerParams {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
        }
    }
}

/// The path currently shown for the latest resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathSnapshot {
    pub generation: u64,
    pub path: DetailedPath,
    /// Legs the route has in total
    pub expected_segments: usize,
    pub resolving: bool,
}

#[derive(Debug, PartialEq)]
pub enum Resolution {
    Completed(DetailedPath),
    /// A newer resolution started, or this one was cancelled. Nothing was
    /// published.
    Superseded,
}

impl Resolution {
    pub fn into_path(self) -> Option<DetailedPath> {
        match self {
            Resolution::Completed(path) => Some(path),
            Resolution::Superseded => None,
        }
    }
}

/// Turns a route into a detailed path, one leg at a time.
///
/// Only the latest resolution may write the published snapshot: every write
/// compares the resolution's generation against the snapshot's under the
/// channel lock, so a slow stale resolution can never overwrite a newer one.
pub struct PathAssembler<P> {
    router: SegmentRouter<P>,
    params: PathAssemblerParams,
    generation: AtomicU64,
    current: Mutex<Option<ResolutionToken>>,
    snapshot: watch::Sender<PathSnapshot>,
}

impl<P> PathAssembler<P>
where
    P: RoadRouteProvider,
{
    pub fn new(router: SegmentRouter<P>, params: PathAssemblerParams) -> Self {
        let (snapshot, _) = watch::channel(PathSnapshot::default());

        Self {
            router,
            params,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
            snapshot,
        }
    }

    pub fn router(&self) -> &SegmentRouter<P> {
        &self.router
    }

    pub fn subscribe(&self) -> watch::Receiver<PathSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> PathSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Cancels the resolution in flight, if any, and hands out the token for
    /// the next one. The published path is reset for the new generation.
    pub fn begin(&self, route: &Route) -> ResolutionToken {
        let mut current = self.current.lock();

        if let Some(previous) = current.take() {
            debug!(
                generation = previous.generation(),
                "Cancelling previous path resolution"
            );
            previous.cancel();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = ResolutionToken::new(generation);
        *current = Some(token.clone());

        self.snapshot.send_replace(PathSnapshot {
            generation,
            path: DetailedPath::empty(),
            expected_segments: route.len().saturating_sub(1),
            resolving: route.has_path(),
        });

        token
    }

    /// Cancels the resolution in flight without starting a new one. The
    /// published snapshot keeps its partial path but stops resolving.
    pub fn cancel(&self) {
        if let Some(previous) = self.current.lock().take() {
            previous.cancel();
            self.release(&previous);
        }
    }

    pub async fn resolve_path(&self, route: &Route, token: &ResolutionToken) -> Resolution {
        if !route.has_path() {
            return self.finish(token, DetailedPath::empty());
        }

        let assembled = AssertUnwindSafe(self.assemble(route, token))
            .catch_unwind()
            .await;

        let path = match assembled {
            Ok(Some(path)) => path,
            Ok(None) => {
                debug!(generation = token.generation(), "Path resolution superseded");
                self.release(token);
                return Resolution::Superseded;
            }
            Err(_) => {
                warn!(
                    generation = token.generation(),
                    waypoints = route.len(),
                    "Path resolution aborted, drawing the waypoints directly"
                );
                let fallback = DetailedPath::from_waypoints(route);
                let points = sanitize(fallback.points());
                fallback.with_points(points)
            }
        };

        info!(
            generation = token.generation(),
            segments = path.segments(),
            straight_segments = path.straight_segments(),
            points = path.len(),
            "Path resolved"
        );

        self.finish(token, path)
    }

    /// `None` when the token was cancelled before the path was complete.
    async fn assemble(&self, route: &Route, token: &ResolutionToken) -> Option<DetailedPath> {
        let mut path = DetailedPath::empty();

        for (index, (from, to)) in route.legs().enumerate() {
            if index > 0 {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return None,
                    _ = tokio::time::sleep(self.params.pacing) => {}
                }
            }

            let mut segment = tokio::select! {
                biased;
                _ = token.cancelled() => return None,
                segment = self
                    .router
                    .resolve(from, to)
                    .instrument(info_span!("segment", index)) => segment,
            };

            if token.is_cancelled() {
                return None;
            }

            let mut points = sanitize(segment.points());
            if points.is_empty() {
                warn!(
                    segment = index,
                    from = from.name(),
                    to = to.name(),
                    "Road segment had no valid coordinates, using straight line"
                );
                segment = RoadSegment::straight_line(from, to);
                points = segment.points().to_vec();
            }
            path.push_segment(&points, segment.is_straight_line());

            self.snapshot.send_if_modified(|snapshot| {
                if !Self::owns(snapshot, token) {
                    return false;
                }
                snapshot
                    .path
                    .push_segment(&points, segment.is_straight_line());
                true
            });
        }

        Some(path)
    }

    fn commit(&self, token: &ResolutionToken, path: DetailedPath) -> Resolution {
        let committed = self.snapshot.send_if_modified(|snapshot| {
            if !Self::owns(snapshot, token) {
                return false;
            }
            snapshot.path = path.clone();
            snapshot.resolving = false;
            true
        });

        if committed {
            Resolution::Completed(path)
        } else {
            Resolution::Superseded
        }
    }

    fn finish(&self, token: &ResolutionToken, path: DetailedPath) -> Resolution {
        let resolution = self.commit(token, path);
        if resolution == Resolution::Superseded {
            self.release(token);
        }
        resolution
    }

    /// Stops a cancelled resolution from reporting progress, unless a newer
    /// generation already took over the snapshot.
    fn release(&self, token: &ResolutionToken) {
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.generation != token.generation() || !snapshot.resolving {
                return false;
            }
            snapshot.resolving = false;
            true
        });
    }

    fn owns(snapshot: &PathSnapshot, token: &ResolutionToken) -> bool {
        snapshot.generation == token.generation() && !token.is_cancelled()
    }
}

impl<P> PathAssembler<P>
where
    P: RoadRouteProvider + Send + Sync + 'static,
{
    /// Starts resolving `route` on a background task, cancelling whatever
    /// resolution was running before.
    pub fn spawn(self: &Arc<Self>, route: Route) -> ResolutionHandle {
        let token = self.begin(&route);
        let assembler = Arc::clone(self);

        let join = tokio::spawn({
            let token = token.clone();
            async move { assembler.resolve_path(&route, &token).await }
        });

        ResolutionHandle { token, join }
    }
}

pub struct ResolutionHandle {
    token: ResolutionToken,
    join: JoinHandle<Resolution>,
}

impl ResolutionHandle {
    pub fn token(&self) -> &ResolutionToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub async fn join(self) -> Resolution {
        match self.join.await {
            Ok(resolution) => resolution,
            Err(error) => {
                warn!(%error, "Path resolution task failed");
                Resolution::Superseded
            }
        }
    }
}
