//! Core library for rebuilding bare-earth terrain under bridges in LIDAR
//! point clouds.
//!
//! All geometry and points are expected in one planar working coordinate
//! space; readers resolve any scaled storage before points reach the core.

pub mod classify;
pub mod config;
pub mod deck;
pub mod error;
pub mod geometry;
pub mod gis;
pub mod interpolate;
pub mod io;
pub mod pipeline;
pub mod skirt;
pub mod spatial_index;

pub use classify::BridgeClassifier;
pub use config::{DeckConfig, Selection};
pub use deck::DeckSynthesizer;
pub use error::{Error, Result};
pub use interpolate::ElevationInterpolator;
pub use pipeline::{GroupOutcome, Pipeline};
pub use skirt::{merge_groups, BridgeGroup};
pub use spatial_index::SpatialIndex;
