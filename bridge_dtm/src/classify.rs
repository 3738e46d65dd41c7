//! Separating bridge-deck points from terrain points.

use rayon::prelude::*;

use crate::geometry::{Point, Point3, Segment};

/// Rectangle of half-width `w` centred on a segment, with corners
/// `A+wn, A-wn, B-wn, B+wn`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    origin: Point,
    direction: Point,
    normal: Point,
    length: f64,
    half_width: f64,
}

impl OrientedRect {
    pub fn from_segment(segment: &Segment, half_width: f64) -> Self {
        Self {
            origin: segment.start,
            direction: segment.direction(),
            normal: segment.normal(),
            length: segment.length(),
            half_width,
        }
    }

    /// Corners in the order `A+wn, A-wn, B-wn, B+wn`.
    pub fn corners(&self) -> [Point; 4] {
        let a = self.origin;
        let b = a.add(self.direction.scale(self.length));
        let off = self.normal.scale(self.half_width);
        [a.add(off), a.sub(off), b.sub(off), b.add(off)]
    }

    /// Closed containment test; points on the boundary are inside.
    pub fn contains(&self, p: Point) -> bool {
        let tol = 1e-9;
        let rel = p.sub(self.origin);
        if self.length <= f64::EPSILON {
            return rel.length() <= tol;
        }
        let along = rel.dot(self.direction);
        let across = rel.dot(self.normal);
        along >= -tol && along <= self.length + tol && across.abs() <= self.half_width + tol
    }
}

/// Containment test against every segment of one bridge group.
#[derive(Debug, Clone)]
pub struct BridgeClassifier {
    rects: Vec<OrientedRect>,
}

/// Result of splitting a point set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub terrain: Vec<Point3>,
    pub bridge: Vec<Point3>,
}

impl BridgeClassifier {
    pub fn new(segments: &[Segment], half_width: f64) -> Self {
        Self {
            rects: segments
                .iter()
                .map(|s| OrientedRect::from_segment(s, half_width))
                .collect(),
        }
    }

    /// Returns `true` if `p` lies in the swath of any segment.
    pub fn is_bridge(&self, p: Point) -> bool {
        self.rects.iter().any(|r| r.contains(p))
    }

    /// Per-point bridge flags, computed in parallel.
    pub fn flags(&self, points: &[Point3]) -> Vec<bool> {
        points.par_iter().map(|p| self.is_bridge(p.xy())).collect()
    }

    /// Splits `points` into terrain and bridge sets. Every input point lands
    /// in exactly one of them and input order is kept within each.
    pub fn split(&self, points: &[Point3]) -> Classified {
        let flags = self.flags(points);
        let mut out = Classified::default();
        for (p, is_bridge) in points.iter().zip(flags) {
            if is_bridge {
                out.bridge.push(*p);
            } else {
                out.terrain.push(*p);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal() -> Segment {
        Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
    }

    #[test]
    fn boundary_is_inside() {
        let rect = OrientedRect::from_segment(&horizontal(), 12.0);
        assert!(rect.contains(Point::new(5.0, 12.0)));
        assert!(rect.contains(Point::new(5.0, -12.0)));
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(10.0, 12.0)));
        assert!(!rect.contains(Point::new(5.0, 12.0 + 1e-6)));
        assert!(!rect.contains(Point::new(10.0 + 1e-6, 0.0)));
        assert!(!rect.contains(Point::new(-1e-6, 3.0)));
    }

    #[test]
    fn corners_follow_normal() {
        let rect = OrientedRect::from_segment(&horizontal(), 2.0);
        assert_eq!(
            rect.corners(),
            [
                Point::new(0.0, -2.0),
                Point::new(0.0, 2.0),
                Point::new(10.0, 2.0),
                Point::new(10.0, -2.0),
            ]
        );
    }

    #[test]
    fn rotated_segment() {
        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let rect = OrientedRect::from_segment(&seg, 1.0);
        let n = seg.normal();
        let mid = seg.midpoint();
        assert!(rect.contains(mid.add(n.scale(1.0))));
        assert!(!rect.contains(mid.add(n.scale(1.0 + 1e-6))));
        assert!(!rect.contains(Point::new(10.0, 0.0)));
    }

    #[test]
    fn split_is_partition() {
        let classifier = BridgeClassifier::new(
            &[
                horizontal(),
                Segment::new(Point::new(10.0, 0.0), Point::new(10.0, 20.0)),
            ],
            1.0,
        );
        let points = vec![
            Point3::new(5.0, 0.5, 1.0),
            Point3::new(5.0, 5.0, 2.0),
            Point3::new(10.5, 15.0, 3.0),
            Point3::new(-3.0, 0.0, 4.0),
        ];
        let out = classifier.split(&points);
        assert_eq!(out.bridge, vec![points[0], points[2]]);
        assert_eq!(out.terrain, vec![points[1], points[3]]);
    }

    #[test]
    fn degenerate_segment_matches_only_its_point() {
        let p = Point::new(3.0, 3.0);
        let classifier = BridgeClassifier::new(&[Segment::new(p, p)], 12.0);
        assert!(classifier.is_bridge(p));
        assert!(!classifier.is_bridge(Point::new(3.0, 4.0)));
    }
}
