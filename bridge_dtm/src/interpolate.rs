//! Inverse-distance-weighted elevation estimates.

use crate::config::{DeckConfig, Selection};
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::spatial_index::{Neighbor, SpatialIndex};

/// Estimates terrain elevation from the nearest samples of a
/// [`SpatialIndex`]. Queries never modify the index.
#[derive(Debug, Clone, Copy)]
pub struct ElevationInterpolator<'a> {
    index: &'a SpatialIndex,
    neighbors: usize,
    candidates: usize,
    selection: Selection,
}

impl<'a> ElevationInterpolator<'a> {
    pub fn new(
        index: &'a SpatialIndex,
        neighbors: usize,
        candidates: usize,
        selection: Selection,
    ) -> Self {
        Self {
            index,
            neighbors,
            candidates: candidates.max(neighbors),
            selection,
        }
    }

    pub fn from_config(index: &'a SpatialIndex, config: &DeckConfig) -> Self {
        Self::new(index, config.neighbors, config.candidates, config.selection)
    }

    fn select(&self, query: Point) -> Vec<Neighbor> {
        match self.selection {
            Selection::Nearest => self.index.nearest(query, self.neighbors),
            Selection::ElevationSorted => {
                let mut found = self.index.nearest(query, self.candidates);
                found.sort_by(|a, b| a.point.z.total_cmp(&b.point.z));
                found.truncate(self.neighbors);
                found
            }
        }
    }

    /// Weighted mean elevation at `query` with weights `1 / distance`.
    ///
    /// Samples exactly at the query position are skipped. Fails with
    /// [`Error::InsufficientTerrain`] when no sample carries weight.
    pub fn elevation_at(&self, query: Point) -> Result<f64> {
        let mut values = 0.0;
        let mut weights_sum = 0.0;
        for n in self.select(query) {
            if n.distance == 0.0 {
                continue;
            }
            let weight = 1.0 / n.distance;
            values += weight * n.point.z;
            weights_sum += weight;
        }
        if weights_sum > 0.0 {
            Ok(values / weights_sum)
        } else {
            Err(Error::InsufficientTerrain {
                x: query.x,
                y: query.y,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;

    fn nearest(index: &SpatialIndex) -> ElevationInterpolator<'_> {
        ElevationInterpolator::from_config(index, &DeckConfig::default())
    }

    #[test]
    fn equidistant_triangle_gives_mean() {
        let r = 5.0;
        let pts: Vec<Point3> = [10.0, 20.0, 30.0]
            .iter()
            .enumerate()
            .map(|(i, &z)| {
                let a = i as f64 * 2.0 * std::f64::consts::PI / 3.0;
                Point3::new(r * a.cos(), r * a.sin(), z)
            })
            .collect();
        let index = SpatialIndex::from_points(&pts);
        let z = nearest(&index).elevation_at(Point::new(0.0, 0.0)).unwrap();
        assert!((z - 20.0).abs() < 1e-9);
    }

    #[test]
    fn closer_sample_dominates() {
        let index = SpatialIndex::from_points(&[
            Point3::new(1.0, 0.0, 100.0),
            Point3::new(9.0, 0.0, 0.0),
        ]);
        let z = nearest(&index).elevation_at(Point::new(0.0, 0.0)).unwrap();
        assert!((z - 90.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_sample_is_skipped() {
        let index = SpatialIndex::from_points(&[
            Point3::new(0.0, 0.0, 1000.0),
            Point3::new(2.0, 0.0, 4.0),
            Point3::new(-2.0, 0.0, 6.0),
        ]);
        let z = nearest(&index).elevation_at(Point::new(0.0, 0.0)).unwrap();
        assert!((z - 5.0).abs() < 1e-9);
    }

    #[test]
    fn empty_or_coincident_fails() {
        let empty = SpatialIndex::new();
        assert!(matches!(
            nearest(&empty).elevation_at(Point::new(1.0, 2.0)),
            Err(Error::InsufficientTerrain { .. })
        ));

        let only = SpatialIndex::from_points(&[Point3::new(1.0, 2.0, 3.0)]);
        assert!(nearest(&only).elevation_at(Point::new(1.0, 2.0)).is_err());
    }

    #[test]
    fn repeated_queries_agree() {
        let pts: Vec<Point3> = (0..50)
            .map(|i| Point3::new((i % 7) as f64, (i / 7) as f64, (i * 3 % 11) as f64))
            .collect();
        let index = SpatialIndex::from_points(&pts);
        let interp = nearest(&index);
        let q = Point::new(2.4, 3.7);
        let first = interp.elevation_at(q).unwrap();
        for _ in 0..5 {
            assert_eq!(interp.elevation_at(q).unwrap(), first);
        }
        assert_eq!(index.len(), 50);
    }

    #[test]
    fn elevation_sorted_prefers_low_samples() {
        // Two near high points and three far low ones; keeping the lowest
        // three of five ignores the near high points entirely.
        let index = SpatialIndex::from_points(&[
            Point3::new(1.0, 0.0, 50.0),
            Point3::new(-1.0, 0.0, 50.0),
            Point3::new(10.0, 0.0, 1.0),
            Point3::new(-10.0, 0.0, 1.0),
            Point3::new(0.0, 10.0, 1.0),
        ]);
        let sorted = ElevationInterpolator::new(&index, 3, 5, Selection::ElevationSorted);
        let z = sorted.elevation_at(Point::new(0.0, 0.0)).unwrap();
        assert!((z - 1.0).abs() < 1e-9);

        let near = ElevationInterpolator::new(&index, 3, 5, Selection::Nearest);
        assert!(near.elevation_at(Point::new(0.0, 0.0)).unwrap() > 1.0);
    }
}
