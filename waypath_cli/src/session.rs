use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Args;
use geojson::GeoJson;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tracing::{info, warn};
use waypath_core::{
    detailed_path::DetailedPath,
    geopoint::GeoPoint,
    markers::route_markers,
    path_assembler::{PathAssembler, PathAssemblerParams, PathSnapshot, Resolution},
    route::Route,
    segment_router::{SegmentRouter, SegmentRouterParams},
    viewport::{ViewportSize, ViewportTracker, fit_target},
    waypoint::Waypoint,
};
use waypath_osrm::client::{OsrmRouteClient, OsrmRouteClientParams};

use crate::{camera::HeadlessCamera, config::Config, parsers, render::render_map};

#[derive(Args)]
pub struct OutputArgs {
    /// GeoJSON file to write, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Map viewport used to frame the route
    #[arg(long, value_parser = parsers::parse_viewport, default_value = "1280x720")]
    viewport: ViewportSize,
}

/// Everything the map needs to show one route after another.
pub struct MapSession {
    assembler: Arc<PathAssembler<OsrmRouteClient>>,
    tracker: ViewportTracker,
    camera: HeadlessCamera,
}

impl MapSession {
    pub fn new(config: &Config, viewport: ViewportSize) -> anyhow::Result<Self> {
        let client = OsrmRouteClient::new(OsrmRouteClientParams {
            osrm_url: config.osrm_url.clone(),
            profile: config.osrm_profile.clone(),
            timeout: config.segment_timeout,
        })
        .context("Failed to create OSRM client")?;

        let router = SegmentRouter::new(
            client,
            SegmentRouterParams {
                timeout: config.segment_timeout,
            },
        );

        Ok(Self {
            assembler: Arc::new(PathAssembler::new(
                router,
                PathAssemblerParams {
                    pacing: config.pacing,
                },
            )),
            tracker: ViewportTracker::default(),
            camera: HeadlessCamera::new(viewport),
        })
    }

    /// Frames the route (or every city when the route is empty), resolves its
    /// road path and renders the map layers.
    pub async fn show(
        &mut self,
        route: Route,
        suggested: &[Waypoint],
        all_cities: &[Waypoint],
    ) -> anyhow::Result<GeoJson> {
        let target: Arc<[GeoPoint]> = fit_target(&route, all_cities).into();
        self.tracker.refit(&mut self.camera, &target);

        let markers = route_markers(&route, suggested);
        let stops = route.len();
        let path = self.resolve(route).await?;

        info!(
            "Path: {} stops, {} segments ({} straight), {:.1} km",
            stops,
            path.segments(),
            path.straight_segments(),
            path.length_meters() / 1000.0
        );

        Ok(render_map(&path, &markers, self.camera.view()))
    }

    async fn resolve(&self, route: Route) -> anyhow::Result<DetailedPath> {
        let mut receiver = self.assembler.subscribe();
        let handle = self.assembler.spawn(route);
        let generation = handle.token().generation();

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(120));

        let progress =
            follow_progress(&mut receiver, generation, tokio::signal::ctrl_c(), &spinner).await;

        if progress == Progress::Interrupted {
            warn!("Interrupted, cancelling path resolution");
            handle.cancel();
        }

        spinner.finish_and_clear();

        match handle.join().await {
            Resolution::Completed(path) => Ok(path),
            Resolution::Superseded => anyhow::bail!("Path resolution was cancelled"),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Progress {
    Finished,
    Interrupted,
}

/// Mirrors the snapshots of `generation` on the spinner until the resolution
/// stops or `interrupt` completes.
async fn follow_progress<F>(
    receiver: &mut watch::Receiver<PathSnapshot>,
    generation: u64,
    interrupt: F,
    spinner: &ProgressBar,
) -> Progress
where
    F: Future,
{
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            changed = receiver.changed() => {
                if changed.is_err() {
                    return Progress::Finished;
                }

                let snapshot = receiver.borrow_and_update().clone();
                if snapshot.generation != generation {
                    continue;
                }

                spinner.set_message(format!(
                    "Calculating real roads... {}/{}",
                    snapshot.path.segments(),
                    snapshot.expected_segments
                ));

                if !snapshot.resolving {
                    return Progress::Finished;
                }
            }
            _ = &mut interrupt => return Progress::Interrupted,
        }
    }
}

pub fn write_output(map: &GeoJson, args: &OutputArgs) -> anyhow::Result<()> {
    let content = map.to_string();

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Map written to {}", path.display());
        }
        None => println!("{content}"),
    }

    Ok(())
}

impl OutputArgs {
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }
}
