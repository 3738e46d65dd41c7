//! Per-group orchestration of fetching, classification, indexing and
//! deck synthesis.

use log::{info, warn};
use rayon::prelude::*;

use crate::classify::{BridgeClassifier, Classified};
use crate::config::DeckConfig;
use crate::deck::DeckSynthesizer;
use crate::error::Result;
use crate::geometry::{Bounds, Point, Point3, Polyline};
use crate::gis::{AttributeFilter, LineFeature};
use crate::interpolate::ElevationInterpolator;
use crate::skirt::{merge_groups, BridgeGroup};
use crate::spatial_index::SpatialIndex;

/// Provider of point-cloud points in the working coordinate space.
pub trait PointCloudSource: Sync {
    /// Extent of the whole cloud, if known.
    fn bounds(&self) -> Option<Bounds>;

    /// All points whose planar distance to `center` is at most `radius`.
    fn points_in_circle(&self, center: Point, radius: f64) -> Result<Vec<Point3>>;
}

/// Provider of line features such as bridges, rivers or roads.
pub trait FeatureSource {
    /// Features matching `filter`, restricted to those whose bounds
    /// intersect `within` when given.
    fn read_features(
        &self,
        filter: &AttributeFilter,
        within: Option<&Bounds>,
    ) -> Result<Vec<LineFeature>>;
}

/// Destination for the rebuilt point set of each group.
pub trait PointSink {
    fn write_group(&mut self, group: usize, points: &[Point3]) -> Result<()>;
}

/// Points and counts produced for one bridge group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOutput {
    /// Terrain points followed by synthetic points.
    pub points: Vec<Point3>,
    pub fetched: usize,
    pub bridge: usize,
    pub terrain: usize,
    pub synthetic: usize,
}

/// Result of processing one group; failures do not affect other groups.
#[derive(Debug)]
pub struct GroupOutcome {
    pub group: usize,
    pub skirt: Bounds,
    pub result: Result<GroupOutput>,
}

/// Keeps line features with at least one vertex, turning them into polylines.
pub fn reference_lines(features: &[LineFeature]) -> Vec<Polyline> {
    features
        .iter()
        .flat_map(|f| f.geometry.iter().cloned())
        .filter(|pl| !pl.vertices.is_empty())
        .collect()
}

/// One group per bridge feature, dropping features outside `extent`, then
/// merged so that no two skirts intersect.
pub fn bridge_groups(features: &[LineFeature], extent: Option<&Bounds>) -> Vec<BridgeGroup> {
    let groups: Vec<BridgeGroup> = features
        .iter()
        .filter_map(BridgeGroup::from_feature)
        .filter(|g| extent.map_or(true, |e| e.intersects(&g.skirt)))
        .collect();
    merge_groups(groups)
}

/// Runs the reconstruction for bridge groups with a shared configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: DeckConfig,
}

impl Pipeline {
    /// Creates a pipeline after validating `config`.
    pub fn new(config: DeckConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Radius of the circle fetched around a group's skirt centre.
    pub fn fetch_radius(&self, group: &BridgeGroup) -> f64 {
        group.skirt.diagonal() * self.config.fetch_radius_factor
    }

    /// Fetches the points around `group` and splits them into terrain and
    /// bridge sets.
    pub fn classify_group(
        &self,
        group: &BridgeGroup,
        cloud: &dyn PointCloudSource,
    ) -> Result<Classified> {
        let fetched = cloud.points_in_circle(group.skirt.center(), self.fetch_radius(group))?;
        let classifier = BridgeClassifier::new(&group.segments(), self.config.half_width);
        Ok(classifier.split(&fetched))
    }

    /// Rebuilds the terrain of one group: bridge points are dropped and
    /// synthetic points interpolated from a group-local terrain index are
    /// appended.
    pub fn process_group(
        &self,
        group: &BridgeGroup,
        references: &[Polyline],
        cloud: &dyn PointCloudSource,
    ) -> Result<GroupOutput> {
        let Classified { terrain, bridge } = self.classify_group(group, cloud)?;
        let index = SpatialIndex::from_points(&terrain);
        let interpolator = ElevationInterpolator::from_config(&index, &self.config);
        let synthesizer = DeckSynthesizer::new(&self.config, references, interpolator);
        let synthetic = synthesizer.synthesize(&group.segments())?;

        let output = GroupOutput {
            fetched: terrain.len() + bridge.len(),
            bridge: bridge.len(),
            terrain: terrain.len(),
            synthetic: synthetic.len(),
            points: terrain.into_iter().chain(synthetic).collect(),
        };
        Ok(output)
    }

    /// Processes every group in parallel, each with its own terrain index.
    /// Outcomes are returned in group order.
    pub fn run(
        &self,
        groups: &[BridgeGroup],
        references: &[Polyline],
        cloud: &dyn PointCloudSource,
    ) -> Vec<GroupOutcome> {
        groups
            .par_iter()
            .enumerate()
            .map(|(i, group)| {
                let result = self.process_group(group, references, cloud);
                match &result {
                    Ok(out) => info!(
                        "group {}: fetched {}, bridge {}, terrain {}, synthetic {}",
                        i, out.fetched, out.bridge, out.terrain, out.synthetic
                    ),
                    Err(e) => warn!("group {} skipped: {}", i, e),
                }
                GroupOutcome {
                    group: i,
                    skirt: group.skirt,
                    result,
                }
            })
            .collect()
    }
}

/// Writes every successful outcome to `sink` in group order and returns the
/// number of groups written.
pub fn write_outcomes(outcomes: &[GroupOutcome], sink: &mut dyn PointSink) -> Result<usize> {
    let mut written = 0;
    for outcome in outcomes {
        if let Ok(out) = &outcome.result {
            sink.write_group(outcome.group, &out.points)?;
            written += 1;
        }
    }
    Ok(written)
}
