use crate::{route::Route, waypoint::Waypoint};

pub fn create_route(stops: &[(&str, f64, f64)]) -> Route {
    Route::new(
        stops
            .iter()
            .map(|&(name, lat, lng)| Waypoint::new(name, lat, lng).unwrap())
            .collect(),
    )
}
