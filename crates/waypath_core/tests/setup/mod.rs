use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::time::Instant;
use waypath_core::{
    geopoint::GeoPoint,
    path_assembler::{PathAssembler, PathAssemblerParams},
    road_route_provider::{ProviderRoute, RoadRouteProvider},
    route::Route,
    segment_router::{SegmentRouter, SegmentRouterParams},
    waypoint::Waypoint,
};

pub const PACING: Duration = Duration::from_millis(150);
pub const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
#[error("provider unavailable")]
pub struct ProviderDown;

#[derive(Clone)]
pub enum Outcome {
    Road(Vec<Vec<f64>>),
    NoRoute,
    Fail,
    Panic,
}

#[derive(Clone)]
pub struct Reply {
    pub after: Duration,
    pub outcome: Outcome,
}

impl Reply {
    pub fn now(outcome: Outcome) -> Self {
        Self {
            after: Duration::ZERO,
            outcome,
        }
    }

    pub fn after(after: Duration, outcome: Outcome) -> Self {
        Self { after, outcome }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Started { from: GeoPoint, at: Instant },
    Finished { from: GeoPoint, at: Instant },
}

type Script = dyn Fn(GeoPoint, GeoPoint) -> Reply + Send + Sync;

/// Provider whose answers are decided by a closure over the requested legs.
pub struct ScriptedProvider {
    script: Box<Script>,
    calls: AtomicUsize,
    events: Arc<Mutex<Vec<Event>>>,
}

impl ScriptedProvider {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(GeoPoint, GeoPoint) -> Reply + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers every leg with its own endpoints plus the midpoint.
    pub fn midpoints() -> Self {
        Self::new(|start, end| Reply::now(Outcome::Road(midpoint_geometry(start, end))))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

impl RoadRouteProvider for ScriptedProvider {
    type Error = ProviderDown;

    fn fetch_routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Future<Output = Result<Vec<ProviderRoute>, Self::Error>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.script)(start, end);
        let events = Arc::clone(&self.events);

        async move {
            events.lock().push(Event::Started {
                from: start,
                at: Instant::now(),
            });

            tokio::time::sleep(reply.after).await;

            events.lock().push(Event::Finished {
                from: start,
                at: Instant::now(),
            });

            match reply.outcome {
                Outcome::Road(positions) => Ok(vec![ProviderRoute {
                    positions,
                    ..Default::default()
                }]),
                Outcome::NoRoute => Ok(vec![]),
                Outcome::Fail => Err(ProviderDown),
                Outcome::Panic => panic!("provider returned garbage"),
            }
        }
    }
}

pub fn midpoint_geometry(start: GeoPoint, end: GeoPoint) -> Vec<Vec<f64>> {
    vec![
        vec![start.lng, start.lat],
        vec![(start.lng + end.lng) / 2.0, (start.lat + end.lat) / 2.0],
        vec![end.lng, end.lat],
    ]
}

pub fn create_route(stops: &[(&str, f64, f64)]) -> Route {
    Route::new(
        stops
            .iter()
            .map(|&(name, lat, lng)| Waypoint::new(name, lat, lng).unwrap())
            .collect(),
    )
}

pub fn create_assembler(provider: ScriptedProvider) -> Arc<PathAssembler<ScriptedProvider>> {
    Arc::new(PathAssembler::new(
        SegmentRouter::new(provider, SegmentRouterParams { timeout: TIMEOUT }),
        PathAssemblerParams { pacing: PACING },
    ))
}

pub fn points(raw: &[(f64, f64)]) -> Vec<GeoPoint> {
    raw.iter()
        .map(|&(lat, lng)| GeoPoint::new(lat, lng))
        .collect()
}
