//! GeoJSON line features.

use geojson::{Feature as GjFeature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Point, Polyline};
use crate::gis::{AttributeFilter, LineFeature};
use crate::pipeline::FeatureSource;

fn json_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn line_to_polyline(line: &[Vec<f64>]) -> Result<Polyline> {
    let mut vertices = Vec::with_capacity(line.len());
    for pos in line {
        if pos.len() < 2 {
            return Err(Error::InvalidData(format!(
                "position with {} coordinates",
                pos.len()
            )));
        }
        vertices.push(Point::new(pos[0], pos[1]));
    }
    Ok(Polyline::new(vertices))
}

fn geometry_parts(geometry: &Geometry) -> Result<Vec<Polyline>> {
    match &geometry.value {
        Value::LineString(line) => Ok(vec![line_to_polyline(line)?]),
        Value::MultiLineString(lines) => lines.iter().map(|l| line_to_polyline(l)).collect(),
        Value::GeometryCollection(items) => {
            let mut parts = Vec::new();
            for g in items {
                parts.extend(geometry_parts(g)?);
            }
            Ok(parts)
        }
        _ => Ok(Vec::new()),
    }
}

fn convert_feature(feature: &GjFeature, class: Option<&str>) -> Result<Option<LineFeature>> {
    let Some(geometry) = &feature.geometry else {
        return Ok(None);
    };
    let parts = geometry_parts(geometry)?;
    if parts.is_empty() {
        return Ok(None);
    }
    let mut out = LineFeature::new(parts);
    out.class = class.map(str::to_string);
    if let Some(props) = &feature.properties {
        out.attributes = props
            .iter()
            .map(|(k, v)| (k.clone(), json_to_string(v)))
            .collect();
    }
    Ok(Some(out))
}

/// Reads every `LineString`/`MultiLineString` feature of a GeoJSON file.
/// Other geometry types are skipped.
pub fn read_line_features_geojson(path: &str) -> Result<Vec<LineFeature>> {
    let contents = super::read_to_string(path)?;
    let geojson: GeoJson = contents.parse().map_err(Error::invalid_data)?;
    let class = std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str());
    let features = match &geojson {
        GeoJson::FeatureCollection(fc) => fc.features.iter().collect(),
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => {
            let parts = geometry_parts(g)?;
            return Ok(if parts.is_empty() {
                Vec::new()
            } else {
                vec![LineFeature::new(parts)]
            });
        }
    };
    let mut out = Vec::new();
    for f in features {
        if let Some(lf) = convert_feature(f, class)? {
            out.push(lf);
        }
    }
    Ok(out)
}

/// Writes line features as a GeoJSON feature collection of
/// `MultiLineString` geometries with string properties.
pub fn write_line_features_geojson(path: &str, features: &[LineFeature]) -> Result<()> {
    let features = features
        .iter()
        .map(|f| {
            let lines = f
                .geometry
                .iter()
                .map(|pl| pl.vertices.iter().map(|p| vec![p.x, p.y]).collect())
                .collect();
            let mut props = JsonObject::new();
            for (k, v) in &f.attributes {
                props.insert(k.clone(), serde_json::Value::String(v.clone()));
            }
            GjFeature {
                bbox: None,
                geometry: Some(Geometry::new(Value::MultiLineString(lines))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();
    let fc = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    super::write_string(path, &GeoJson::from(fc).to_string())
}

/// A GeoJSON file used as a feature source.
#[derive(Debug, Clone)]
pub struct GeoJsonFile {
    pub path: String,
}

impl GeoJsonFile {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl FeatureSource for GeoJsonFile {
    fn read_features(
        &self,
        filter: &AttributeFilter,
        within: Option<&Bounds>,
    ) -> Result<Vec<LineFeature>> {
        Ok(read_line_features_geojson(&self.path)?
            .into_iter()
            .filter(|f| filter.matches(&f.attributes))
            .filter(|f| match (within, f.bounds()) {
                (Some(w), Some(b)) => w.intersects(&b),
                (Some(_), None) => false,
                (None, _) => true,
            })
            .collect())
    }
}
