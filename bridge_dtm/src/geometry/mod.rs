//! Planar geometry primitives for bridge and terrain processing.

mod line;
mod point;
mod point3;

pub use line::Segment;
pub use point::Point;
pub use point3::Point3;

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Unsigned angle in radians between two planar vectors, in `[0, PI]`.
///
/// Returns `0.0` if either vector has no length.
pub fn angle_between(a: Point, b: Point) -> f64 {
    let denom = a.length() * b.length();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Axis-aligned bounding rectangle. `min_x <= max_x` and `min_y <= max_y`
/// always hold for values built through the constructors.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Creates bounds from two opposite corners in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Smallest bounds enclosing every point, or `None` for an empty input.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(first, first);
        for p in iter {
            bounds.include_point(p);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Closed overlap test: bounds sharing only an edge or corner intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Grows the bounds to enclose `other` as well.
    pub fn include(&mut self, other: &Bounds) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn include_point(&mut self, p: Point) {
        self.include(&Bounds::new(p, p));
    }
}

/// Representation of a series of connected line segments.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline {
    pub vertices: Vec<Point>,
}

impl Polyline {
    /// Creates a new polyline from a list of vertices.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Returns the total length of all segments in the polyline.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .sum()
    }

    /// Consecutive vertex pairs as segments. A single-vertex polyline yields
    /// one zero-length segment so that it still takes part in processing.
    pub fn segments(&self) -> Vec<Segment> {
        match self.vertices.len() {
            0 => Vec::new(),
            1 => vec![Segment::new(self.vertices[0], self.vertices[0])],
            _ => self
                .vertices
                .windows(2)
                .map(|pair| Segment::new(pair[0], pair[1]))
                .collect(),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.vertices.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_length_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        let seg = Segment::new(a, b);
        assert_eq!(seg.length(), 5.0);
        assert_eq!(seg.midpoint(), Point::new(1.5, 2.0));
    }

    #[test]
    fn polyline_length() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(6.0, 8.0),
        ];
        let pl = Polyline::new(pts);
        assert!((pl.length() - 10.0).abs() < 1e-6);
        assert_eq!(pl.segments().len(), 2);
    }

    #[test]
    fn single_vertex_polyline_is_degenerate_segment() {
        let pl = Polyline::new(vec![Point::new(1.0, 1.0)]);
        let segs = pl.segments();
        assert_eq!(segs.len(), 1);
        assert!(segs[0].is_degenerate());
    }

    #[test]
    fn bounds_touching_edges_intersect() {
        let a = Bounds::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Bounds::new(Point::new(1.0, 0.0), Point::new(2.0, 1.0));
        let c = Bounds::new(Point::new(1.5, 1.5), Point::new(2.0, 2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn bounds_include_grows() {
        let mut a = Bounds::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        a.include(&Bounds::new(Point::new(-1.0, 2.0), Point::new(0.5, 3.0)));
        assert_eq!(a, Bounds::new(Point::new(-1.0, 0.0), Point::new(1.0, 3.0)));
        assert!((a.diagonal() - (4.0f64 + 9.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn angle_between_axes() {
        let a = angle_between(Point::new(1.0, 0.0), Point::new(0.0, 2.0));
        assert!((a - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(angle_between(Point::new(1.0, 0.0), Point::default()), 0.0);
    }
}
