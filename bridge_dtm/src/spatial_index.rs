//! Spatial index over terrain points.
//!
//! Points are keyed by their planar position in an R-tree so that the
//! elevation interpolator can ask for the nearest terrain samples around
//! any query location, however far away they are.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::{Point, Point3};

/// A terrain point stored in the R-tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainEntry {
    pub point: Point3,
}

impl RTreeObject for TerrainEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x, self.point.y])
    }
}

impl PointDistance for TerrainEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point.x - point[0];
        let dy = self.point.y - point[1];
        dx * dx + dy * dy
    }
}

/// A neighbour returned from a query, with its planar distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub point: Point3,
    pub distance: f64,
}

/// Incremental nearest-neighbour index over terrain points.
///
/// One instance belongs to one bridge group; nothing is shared between
/// groups.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: RTree<TerrainEntry>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex").field("len", &self.len()).finish()
    }
}

impl SpatialIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build an index from a batch of points in one pass.
    pub fn from_points(points: &[Point3]) -> Self {
        let entries = points.iter().map(|&point| TerrainEntry { point }).collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of points in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Insert a point.
    pub fn insert(&mut self, point: Point3) {
        self.tree.insert(TerrainEntry { point });
    }

    /// Up to `k` indexed points ordered by increasing planar distance to
    /// `query`. There is no search radius.
    pub fn nearest(&self, query: Point, k: usize) -> Vec<Neighbor> {
        let q = [query.x, query.y];
        self.tree
            .nearest_neighbor_iter(&q)
            .take(k)
            .map(|entry| Neighbor {
                point: entry.point,
                distance: entry.distance_2(&q).sqrt(),
            })
            .collect()
    }
}
