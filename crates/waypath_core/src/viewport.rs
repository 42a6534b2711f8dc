use std::{f64::consts::PI, sync::Arc, time::Duration};

use tracing::debug;

use crate::{
    bounding_region::BoundingRegion, geopoint::GeoPoint, route::Route, waypoint::Waypoint,
};

const TILE_SIZE: f64 = 256.0;
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FitOptions {
    /// Horizontal and vertical padding in pixels
    pub padding: (f64, f64),
    pub duration: Duration,
    /// Closer than this is not useful for an inter-city route
    pub max_zoom: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: (50.0, 50.0),
            duration: Duration::from_millis(1500),
            max_zoom: 12.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraView {
    pub center: GeoPoint,
    pub zoom: f64,
    pub bounds: BoundingRegion,
}

/// The map surface the fitter drives.
pub trait MapCamera {
    fn viewport(&self) -> ViewportSize;

    fn fly_to(&mut self, view: &CameraView, duration: Duration);
}

#[derive(Default)]
pub struct ViewportFitter {
    options: FitOptions,
}

impl ViewportFitter {
    pub fn new(options: FitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Frames `points` on the camera. Does nothing for an empty point set.
    pub fn fit<C>(&self, camera: &mut C, points: &[GeoPoint]) -> Option<CameraView>
    where
        C: MapCamera,
    {
        let view = self.view_for(points, camera.viewport())?;

        debug!(
            lat = view.center.lat,
            lng = view.center.lng,
            zoom = view.zoom,
            "Fitting camera"
        );

        camera.fly_to(&view, self.options.duration);

        Some(view)
    }

    /// Center and whole zoom level showing every point inside the padded
    /// viewport, in Web Mercator.
    pub fn view_for(&self, points: &[GeoPoint], viewport: ViewportSize) -> Option<CameraView> {
        let bounds = BoundingRegion::from_points(points)?;

        if bounds.is_degenerate() {
            return Some(CameraView {
                center: bounds.south_west(),
                zoom: self.options.max_zoom,
                bounds,
            });
        }

        let (west, south) = project(bounds.south_west());
        let (east, north) = project(bounds.north_east());

        let available_width = (viewport.width - 2.0 * self.options.padding.0).max(1.0);
        let available_height = (viewport.height - 2.0 * self.options.padding.1).max(1.0);

        let zoom = fit_zoom(available_width, east - west)
            .min(fit_zoom(available_height, south - north))
            .min(self.options.max_zoom)
            .floor()
            .max(0.0);

        let center = GeoPoint::new(
            unproject_latitude((north + south) / 2.0),
            (bounds.south_west().lng + bounds.north_east().lng) / 2.0,
        );

        Some(CameraView {
            center,
            zoom,
            bounds,
        })
    }
}

/// The active route when there is one, every known city otherwise.
pub fn fit_target(route: &Route, all_cities: &[Waypoint]) -> Vec<GeoPoint> {
    if route.is_empty() {
        all_cities.iter().map(Waypoint::point).collect()
    } else {
        route.points()
    }
}

/// Refits the camera once per point set it is handed.
///
/// Point sets are compared by identity, not by value: a freshly planned route
/// reframes the camera even when it visits the same places as the last one.
#[derive(Default)]
pub struct ViewportTracker {
    fitter: ViewportFitter,
    fitted: Option<Arc<[GeoPoint]>>,
}

impl ViewportTracker {
    pub fn new(fitter: ViewportFitter) -> Self {
        Self {
            fitter,
            fitted: None,
        }
    }

    pub fn refit<C>(&mut self, camera: &mut C, points: &Arc<[GeoPoint]>) -> Option<CameraView>
    where
        C: MapCamera,
    {
        if self
            .fitted
            .as_ref()
            .is_some_and(|fitted| Arc::ptr_eq(fitted, points))
        {
            return None;
        }

        self.fitted = Some(Arc::clone(points));
        self.fitter.fit(camera, points)
    }
}

/// Normalized Web Mercator coordinates, both in `[0, 1]`, y growing south.
fn project(point: GeoPoint) -> (f64, f64) {
    let x = (point.lng + 180.0) / 360.0;

    let sin = point
        .lat
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians()
        .sin();
    let y = 0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI);

    (x, y)
}

fn unproject_latitude(y: f64) -> f64 {
    let n = PI - 2.0 * PI * y;
    n.sinh().atan().to_degrees()
}

fn fit_zoom(available_pixels: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return f64::INFINITY;
    }

    (available_pixels / (TILE_SIZE * extent)).log2()
}
