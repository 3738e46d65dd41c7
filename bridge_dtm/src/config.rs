//! Tunable constants for classification, synthesis and interpolation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which terrain candidates take part in the weighted elevation estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// The `neighbors` candidates closest in planar distance.
    #[default]
    Nearest,
    /// The `neighbors` lowest candidates among the fetched `candidates`.
    /// Reproduces the historical output of the reference workflow.
    ElevationSorted,
}

/// Parameters shared by every bridge group of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Nominal half-width of the bridge deck swath.
    pub half_width: f64,
    /// Distance between stations along a bridge segment.
    pub station_step: f64,
    /// Distance between samples across the bridge.
    pub offset_step: f64,
    /// Number of terrain points weighted per estimate.
    pub neighbors: usize,
    /// Number of nearest terrain points fetched before selection.
    pub candidates: usize,
    /// Fetch radius as a fraction of the group skirt diagonal.
    pub fetch_radius_factor: f64,
    /// Skew-corrected span is clamped to this multiple of `half_width`.
    pub max_span_factor: f64,
    pub selection: Selection,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            half_width: 12.0,
            station_step: 1.0,
            offset_step: 1.0,
            neighbors: 10,
            candidates: 40,
            fetch_radius_factor: 0.65,
            max_span_factor: 4.0,
            selection: Selection::Nearest,
        }
    }
}

impl DeckConfig {
    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("half_width", self.half_width),
            ("station_step", self.station_step),
            ("offset_step", self.offset_step),
            ("fetch_radius_factor", self.fetch_radius_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.max_span_factor.is_finite() && self.max_span_factor >= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "max_span_factor must be at least 1, got {}",
                self.max_span_factor
            )));
        }
        if self.neighbors == 0 {
            return Err(Error::InvalidConfig("neighbors must be at least 1".into()));
        }
        if self.candidates < self.neighbors {
            return Err(Error::InvalidConfig(format!(
                "candidates ({}) must not be fewer than neighbors ({})",
                self.candidates, self.neighbors
            )));
        }
        Ok(())
    }

    /// Upper limit of the skew-corrected half span.
    pub fn max_span(&self) -> f64 {
        self.half_width * self.max_span_factor
    }
}

pub fn read_config_json(path: &str) -> Result<DeckConfig> {
    let contents = crate::io::read_to_string(path)?;
    let cfg: DeckConfig = serde_json::from_str(&contents).map_err(Error::invalid_data)?;
    Ok(cfg)
}

pub fn write_config_json(path: &str, config: &DeckConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).map_err(Error::invalid_data)?;
    crate::io::write_string(path, &json)
}
