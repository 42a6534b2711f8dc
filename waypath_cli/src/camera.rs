use std::time::Duration;

use tracing::info;
use waypath_core::viewport::{CameraView, MapCamera, ViewportSize};

/// Camera without a screen: remembers where it was asked to fly so the view
/// can be exported with the map data.
pub struct HeadlessCamera {
    viewport: ViewportSize,
    view: Option<CameraView>,
}

impl HeadlessCamera {
    pub fn new(viewport: ViewportSize) -> Self {
        Self {
            viewport,
            view: None,
        }
    }

    pub fn view(&self) -> Option<&CameraView> {
        self.view.as_ref()
    }
}

impl MapCamera for HeadlessCamera {
    fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    fn fly_to(&mut self, view: &CameraView, duration: Duration) {
        info!(
            "Camera: center ({:.4}, {:.4}) zoom {} over {:?}",
            view.center.lat, view.center.lng, view.zoom, duration
        );
        self.view = Some(view.clone());
    }
}
