pub mod bounding_region;
pub mod detailed_path;
pub mod error;
pub mod geopoint;
pub mod markers;
pub mod path_assembler;
pub mod resolution_token;
pub mod road_route_provider;
pub mod road_segment;
pub mod route;
pub mod sanitizer;
pub mod segment_router;
pub mod viewport;
pub mod waypoint;

#[cfg(test)]
pub(crate) mod test_utils;
