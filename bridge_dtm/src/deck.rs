//! Synthetic terrain under bridge decks.
//!
//! Each bridge segment is walked in stations. At every station a row of
//! points is laid out along the direction of the feature the bridge crosses,
//! far enough to cover the skewed footprint of the deck, and every point gets
//! an elevation interpolated from the surrounding terrain.

use log::{debug, warn};

use crate::config::DeckConfig;
use crate::error::Result;
use crate::geometry::{angle_between, distance, Point, Point3, Polyline, Segment};
use crate::interpolate::ElevationInterpolator;

const EPS: f64 = 1e-9;

/// Direction of the reference segment crossing `segment` closest to the
/// segment midpoint, or `None` when no reference segment touches it.
pub fn crossing_direction(segment: &Segment, references: &[Segment]) -> Option<Point> {
    let mid = segment.midpoint();
    references
        .iter()
        .filter(|r| !r.is_degenerate())
        .filter_map(|r| segment.intersection(r).map(|p| (distance(p, mid), r)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, r)| r.direction())
}

/// Half span `sqrt(W^2 + (W tan theta)^2)` covered at a skew angle `theta`,
/// clamped to `max_span`.
pub fn skew_span(half_width: f64, theta: f64, max_span: f64) -> f64 {
    let span = (half_width.powi(2) + (half_width * theta.tan()).powi(2)).sqrt();
    if span.is_finite() && span <= max_span {
        span
    } else {
        max_span
    }
}

/// Stations at `j * step` for `j * step < length`, at least one.
pub fn station_count(length: f64, step: f64) -> usize {
    ((length / step - EPS).ceil() as usize).max(1)
}

/// Offsets `span, span - step, ...` sampled on each side of a station.
/// Only whole steps are counted: a remainder shorter than `step` next to
/// the station is not sampled, so `span = 16.97` gives 16 offsets, not 17.
pub fn offset_count(span: f64, step: f64) -> usize {
    (span / step + EPS).floor() as usize
}

/// Sampling layout computed for one bridge segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPlan {
    pub origin: Point,
    pub direction: Point,
    /// Unit vector along which offsets are laid out.
    pub crossing: Point,
    /// Angle between `crossing` and the segment normal.
    pub skew: f64,
    pub span: f64,
    pub stations: usize,
    pub offsets: usize,
}

impl SegmentPlan {
    pub fn points_per_station(&self) -> usize {
        2 * self.offsets + 1
    }
}

/// Generates replacement points for the bridge segments of one group.
pub struct DeckSynthesizer<'a> {
    config: &'a DeckConfig,
    references: Vec<Segment>,
    interpolator: ElevationInterpolator<'a>,
}

impl<'a> DeckSynthesizer<'a> {
    pub fn new(
        config: &'a DeckConfig,
        references: &[Polyline],
        interpolator: ElevationInterpolator<'a>,
    ) -> Self {
        Self {
            config,
            references: references.iter().flat_map(Polyline::segments).collect(),
            interpolator,
        }
    }

    pub fn plan(&self, segment: &Segment) -> SegmentPlan {
        let normal = segment.normal();
        if segment.is_degenerate() {
            return SegmentPlan {
                origin: segment.start,
                direction: Point::default(),
                crossing: normal,
                skew: 0.0,
                span: 0.0,
                stations: 1,
                offsets: 0,
            };
        }
        let crossing = crossing_direction(segment, &self.references).unwrap_or(normal);
        let skew = angle_between(crossing, normal);
        let span = skew_span(self.config.half_width, skew, self.config.max_span());
        if span >= self.config.max_span() {
            warn!(
                "skew {:.1} deg: span clamped to {:.3}",
                skew.to_degrees(),
                span
            );
        }
        SegmentPlan {
            origin: segment.start,
            direction: segment.direction(),
            crossing,
            skew,
            span,
            stations: station_count(segment.length(), self.config.station_step),
            offsets: offset_count(span, self.config.offset_step),
        }
    }

    /// Synthetic points for one segment, station by station: the offset
    /// pairs from the outside in, then the station itself.
    pub fn synthesize_segment(&self, segment: &Segment) -> Result<Vec<Point3>> {
        let plan = self.plan(segment);
        debug!(
            "segment length {:.3}: skew {:.2} deg, span {:.3}, {} stations",
            segment.length(),
            plan.skew.to_degrees(),
            plan.span,
            plan.stations
        );
        let mut out = Vec::with_capacity(plan.stations * plan.points_per_station());
        for j in 0..plan.stations {
            let station = plan
                .origin
                .add(plan.direction.scale(j as f64 * self.config.station_step));
            for i in 0..plan.offsets {
                let k = plan.span - i as f64 * self.config.offset_step;
                let offset = plan.crossing.scale(k);
                out.push(self.sample(station.add(offset))?);
                out.push(self.sample(station.sub(offset))?);
            }
            out.push(self.sample(station)?);
        }
        Ok(out)
    }

    /// Synthetic points for every segment, concatenated in order.
    pub fn synthesize(&self, segments: &[Segment]) -> Result<Vec<Point3>> {
        let mut out = Vec::new();
        for segment in segments {
            out.extend(self.synthesize_segment(segment)?);
        }
        Ok(out)
    }

    fn sample(&self, p: Point) -> Result<Point3> {
        let z = self.interpolator.elevation_at(p)?;
        Ok(Point3::new(p.x, p.y, z))
    }
}
