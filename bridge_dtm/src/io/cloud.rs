//! In-memory point cloud answering circular range queries.

use crate::error::Result;
use crate::geometry::{Bounds, Point, Point3};
use crate::pipeline::PointCloudSource;

/// Point cloud held in memory with real-world coordinates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCloud {
    points: Vec<Point3>,
    bounds: Option<Bounds>,
}

impl InMemoryCloud {
    pub fn new(points: Vec<Point3>) -> Self {
        let bounds = Bounds::from_points(points.iter().map(Point3::xy));
        Self { points, bounds }
    }

    /// Loads an `x,y,z` CSV file.
    pub fn from_csv(path: &str) -> Result<Self> {
        Ok(Self::new(super::read_points_csv(path)?))
    }

    /// Loads a LAS or LAZ file. The extent is taken from the header.
    #[cfg(feature = "las")]
    pub fn from_las(path: &str) -> Result<Self> {
        let points = super::las::read_points_las(path)?;
        let bounds = if points.is_empty() {
            None
        } else {
            Some(super::las::read_bounds_las(path)?)
        };
        Ok(Self { points, bounds })
    }

    /// Loads a point file, choosing the reader from the extension. Files
    /// ending in `.las`/`.laz` need the `las` feature; anything else is read
    /// as CSV.
    pub fn from_path(path: &str) -> Result<Self> {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".las") || lower.ends_with(".laz") {
            #[cfg(feature = "las")]
            return Self::from_las(path);
            #[cfg(not(feature = "las"))]
            return Err(crate::error::Error::InvalidData(format!(
                "{path}: LAS support not enabled"
            )));
        }
        Self::from_csv(path)
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl PointCloudSource for InMemoryCloud {
    fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn points_in_circle(&self, center: Point, radius: f64) -> Result<Vec<Point3>> {
        let r2 = radius * radius;
        Ok(self
            .points
            .iter()
            .filter(|p| {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                dx * dx + dy * dy <= r2
            })
            .copied()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_query_is_inclusive() {
        let cloud = InMemoryCloud::new(vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(3.0, 4.0, 2.0),
            Point3::new(3.0, 4.1, 3.0),
        ]);
        let hits = cloud.points_in_circle(Point::new(0.0, 0.0), 5.0).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(
            cloud.bounds(),
            Some(Bounds::new(Point::new(0.0, 0.0), Point::new(3.0, 4.1)))
        );
    }

    #[cfg(feature = "las")]
    #[test]
    fn las_cloud_extent_from_header() {
        let file = tempfile::Builder::new().suffix(".las").tempfile().unwrap();
        let path = file.path().to_str().unwrap();
        super::super::las::write_points_las(
            path,
            &[
                Point3::new(500_010.0, 5_100_020.0, 1.0),
                Point3::new(500_030.0, 5_100_050.0, 2.0),
            ],
        )
        .unwrap();
        let cloud = InMemoryCloud::from_path(path).unwrap();
        assert_eq!(cloud.len(), 2);
        let bounds = cloud.bounds().unwrap();
        assert!((bounds.min_x - 500_010.0).abs() < 1e-3);
        assert!((bounds.max_y - 5_100_050.0).abs() < 1e-3);
    }

    #[test]
    fn empty_cloud_has_no_bounds() {
        let cloud = InMemoryCloud::default();
        assert!(cloud.is_empty());
        assert_eq!(cloud.bounds(), None);
    }
}
