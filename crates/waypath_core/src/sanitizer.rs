use crate::geopoint::GeoPoint;

/// Keeps only finite points inside the latitude/longitude ranges, in their
/// original order. The filter is pointwise, so sanitizing a concatenation is
/// the concatenation of the sanitized parts.
pub fn sanitize(points: &[GeoPoint]) -> Vec<GeoPoint> {
    points
        .iter()
        .filter(|point| point.is_valid())
        .copied()
        .collect()
}
