use crate::geopoint::GeoPoint;

/// Smallest lat/lng box covering a set of points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingRegion {
    min: geo_types::Coord<f64>,
    max: geo_types::Coord<f64>,
}

impl BoundingRegion {
    /// Invalid points are ignored. `None` when no valid point is left.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut valid = points.into_iter().filter(|point| point.is_valid());
        let first: geo_types::Coord<f64> = (*valid.next()?).into();

        let mut region = BoundingRegion {
            min: first,
            max: first,
        };

        for point in valid {
            region.extend(*point);
        }

        Some(region)
    }

    pub fn extend<C>(&mut self, coord: C)
    where
        C: Into<geo_types::Coord<f64>>,
    {
        let coord = coord.into();
        self.min.x = self.min.x.min(coord.x);
        self.min.y = self.min.y.min(coord.y);
        self.max.x = self.max.x.max(coord.x);
        self.max.y = self.max.y.max(coord.y);
    }

    pub fn south_west(&self) -> GeoPoint {
        self.min.into()
    }

    pub fn north_east(&self) -> GeoPoint {
        self.max.into()
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn to_rect(&self) -> geo_types::Rect<f64> {
        geo_types::Rect::new(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let points = [
            GeoPoint::new(48.43, -123.37),
            GeoPoint::new(49.28, -123.12),
            GeoPoint::new(49.17, -123.94),
        ];

        let region = BoundingRegion::from_points(&points).unwrap();

        assert_eq!(region.south_west(), GeoPoint::new(48.43, -123.94));
        assert_eq!(region.north_east(), GeoPoint::new(49.28, -123.12));
        assert!(!region.is_degenerate());
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let region = BoundingRegion::from_points(&[GeoPoint::new(48.43, -123.37)]).unwrap();

        assert!(region.is_degenerate());
        assert_eq!(region.south_west(), region.north_east());
    }

    #[test]
    fn test_ignores_invalid_points() {
        let none: [GeoPoint; 0] = [];
        assert!(BoundingRegion::from_points(&none).is_none());
        assert!(BoundingRegion::from_points(&[GeoPoint::new(f64::NAN, 0.0)]).is_none());

        let region =
            BoundingRegion::from_points(&[GeoPoint::new(95.0, 0.0), GeoPoint::new(1.0, 2.0)])
                .unwrap();
        assert!(region.is_degenerate());
    }

    #[test]
    fn test_extend() {
        let mut region = BoundingRegion::from_points(&[GeoPoint::new(0.0, 0.0)]).unwrap();

        region.extend(GeoPoint::new(1.0, 1.0));
        assert_eq!(region.north_east(), GeoPoint::new(1.0, 1.0));

        region.extend(GeoPoint::new(5.0, -4.0));
        assert_eq!(region.south_west(), GeoPoint::new(0.0, -4.0));
        assert_eq!(region.north_east(), GeoPoint::new(5.0, 1.0));
    }
}
