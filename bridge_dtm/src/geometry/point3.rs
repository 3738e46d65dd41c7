//! 3D point type for point-cloud samples.

use super::Point;

/// Representation of a 3D point in the working coordinate space.
///
/// Coordinates are real-world values; any scaled-integer storage of the
/// source format has already been resolved by the reader.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar projection of the point.
    pub fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
