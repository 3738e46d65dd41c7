//! Straight pieces of bridge and reference polylines.

use super::{distance, Point};

/// Representation of a 2D line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    /// Creates a new line segment.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the length of the line segment.
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Returns the midpoint of the line segment.
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Unit vector from start to end. Zero for a degenerate segment.
    pub fn direction(&self) -> Point {
        self.end.sub(self.start).normalized()
    }

    /// Unit vector perpendicular to the segment, i.e. the direction rotated
    /// clockwise by a quarter turn (`d x z`). Zero for a degenerate segment.
    pub fn normal(&self) -> Point {
        let d = self.direction();
        Point::new(d.y, -d.x)
    }

    /// Returns `true` if the segment has no usable length.
    pub fn is_degenerate(&self) -> bool {
        self.length() <= f64::EPSILON
    }

    /// Returns a point shared by both segments, endpoints included.
    ///
    /// Crossing segments yield their unique intersection. Collinear
    /// overlapping segments yield the first endpoint found on the other
    /// segment.
    pub fn intersection(&self, other: &Segment) -> Option<Point> {
        let r = self.end.sub(self.start);
        let s = other.end.sub(other.start);
        let qp = other.start.sub(self.start);
        let denom = r.perp_dot(s);
        let tol = 1e-12;

        if denom.abs() <= tol {
            if qp.perp_dot(r).abs() > tol {
                return None;
            }
            return [other.start, other.end]
                .into_iter()
                .find(|p| self.contains_collinear(*p))
                .or_else(|| {
                    [self.start, self.end]
                        .into_iter()
                        .find(|p| other.contains_collinear(*p))
                });
        }

        let t = qp.perp_dot(s) / denom;
        let u = qp.perp_dot(r) / denom;
        if (-tol..=1.0 + tol).contains(&t) && (-tol..=1.0 + tol).contains(&u) {
            Some(self.start.add(r.scale(t)))
        } else {
            None
        }
    }

    fn contains_collinear(&self, p: Point) -> bool {
        let r = self.end.sub(self.start);
        let len2 = r.dot(r);
        if len2 <= f64::EPSILON {
            return distance(self.start, p) <= 1e-12;
        }
        let t = p.sub(self.start).dot(r) / len2;
        (0.0..=1.0).contains(&t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_clockwise_perpendicular() {
        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(seg.direction(), Point::new(1.0, 0.0));
        assert_eq!(seg.normal(), Point::new(0.0, -1.0));
    }

    #[test]
    fn crossing_segments_intersect() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let b = Segment::new(Point::new(5.0, -5.0), Point::new(5.0, 5.0));
        let p = a.intersection(&b).unwrap();
        assert!((p.x - 5.0).abs() < 1e-12 && p.y.abs() < 1e-12);
    }

    #[test]
    fn touching_endpoint_counts() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let b = Segment::new(Point::new(10.0, 0.0), Point::new(10.0, 5.0));
        assert!(a.intersection(&b).is_some());
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let b = Segment::new(Point::new(0.0, 1.0), Point::new(10.0, 1.0));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn collinear_overlap_found() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let b = Segment::new(Point::new(5.0, 0.0), Point::new(15.0, 0.0));
        assert_eq!(a.intersection(&b), Some(Point::new(5.0, 0.0)));
    }
}
