//! Bridge groups and merging of overlapping skirts.

use log::info;

use crate::geometry::{Bounds, Polyline, Segment};
use crate::gis::LineFeature;

/// One or more bridge polylines processed together, with the axis-aligned
/// skirt enclosing them.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeGroup {
    pub skirt: Bounds,
    pub polylines: Vec<Polyline>,
}

impl BridgeGroup {
    pub fn new(skirt: Bounds, polylines: Vec<Polyline>) -> Self {
        Self { skirt, polylines }
    }

    /// Builds a group from a single bridge feature, using the feature's
    /// geometry bounds as skirt. Features without vertices yield `None`.
    pub fn from_feature(feature: &LineFeature) -> Option<Self> {
        let skirt = feature.bounds()?;
        Some(Self::new(skirt, feature.geometry.clone()))
    }

    /// All segments of all polylines in order.
    pub fn segments(&self) -> Vec<Segment> {
        self.polylines.iter().flat_map(Polyline::segments).collect()
    }

    /// Absorbs `other`: the skirt grows to cover both and the polylines of
    /// `other` are appended.
    pub fn absorb(&mut self, other: BridgeGroup) {
        self.skirt.include(&other.skirt);
        self.polylines.extend(other.polylines);
    }
}

/// Disjoint-set forest over group indices.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Joins the sets of `a` and `b`, keeping the smaller index as root.
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}

/// Merges groups until no two remaining skirts intersect.
///
/// Each result is the union of a connected component of the "skirts
/// intersect" relation, closed under growth: when a merged skirt starts to
/// touch a further group, that group joins too. Survivors keep the input
/// order of their first member and polylines are concatenated in input order.
pub fn merge_groups(groups: Vec<BridgeGroup>) -> Vec<BridgeGroup> {
    let input = groups.len();
    let mut current = groups;
    loop {
        let n = current.len();
        let mut sets = UnionFind::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if current[i].skirt.intersects(&current[j].skirt) {
                    sets.union(i, j);
                }
            }
        }

        let mut slots: Vec<Option<BridgeGroup>> = vec![None; n];
        for (i, group) in current.into_iter().enumerate() {
            let root = sets.find(i);
            match &mut slots[root] {
                Some(merged) => merged.absorb(group),
                slot => *slot = Some(group),
            }
        }
        let merged: Vec<BridgeGroup> = slots.into_iter().flatten().collect();

        // Grown skirts can reach groups that none of their members touched.
        if merged.len() == n {
            info!("merged {} bridge features into {} groups", input, merged.len());
            return merged;
        }
        current = merged;
    }
}
