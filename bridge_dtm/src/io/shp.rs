//! ESRI shapefile line features with dBase attributes.

use std::collections::BTreeMap;

use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point as ShpPoint, Polyline as ShpPolyline, Reader, Shape, Writer};

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Point, Polyline};
use crate::gis::{AttributeFilter, LineFeature};
use crate::pipeline::FeatureSource;

fn field_value_to_string(v: &FieldValue) -> String {
    match v {
        FieldValue::Character(Some(s)) => s.trim().to_string(),
        FieldValue::Numeric(Some(n)) => n.to_string(),
        FieldValue::Logical(Some(b)) => b.to_string(),
        FieldValue::Date(Some(d)) => format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()),
        FieldValue::Float(Some(f)) => f.to_string(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Currency(c) => c.to_string(),
        FieldValue::Double(d) => d.to_string(),
        FieldValue::Memo(s) => s.clone(),
        _ => String::new(),
    }
}

fn parts_to_polylines<P>(parts: &[Vec<P>], xy: impl Fn(&P) -> Point) -> Vec<Polyline> {
    parts
        .iter()
        .map(|part| Polyline::new(part.iter().map(&xy).collect()))
        .collect()
}

/// Reads every polyline shape of a shapefile with its attributes. Each
/// record becomes one feature whose parts are its polylines; Z and M values
/// are dropped.
pub fn read_line_features_shp(path: &str) -> Result<Vec<LineFeature>> {
    let mut reader = Reader::from_path(path).map_err(Error::invalid_data)?;
    let class = std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string);
    let mut out = Vec::new();
    for res in reader.iter_shapes_and_records() {
        let (shape, record) = res.map_err(Error::invalid_data)?;
        let parts = match shape {
            Shape::Polyline(pl) => parts_to_polylines(pl.parts(), |p| Point::new(p.x, p.y)),
            Shape::PolylineM(pl) => parts_to_polylines(pl.parts(), |p| Point::new(p.x, p.y)),
            Shape::PolylineZ(pl) => parts_to_polylines(pl.parts(), |p| Point::new(p.x, p.y)),
            _ => continue,
        };
        let attributes: BTreeMap<String, String> = record
            .into_iter()
            .map(|(k, v)| (k, field_value_to_string(&v)))
            .collect();
        out.push(LineFeature {
            class: class.clone(),
            attributes,
            geometry: parts,
        });
    }
    Ok(out)
}

/// Writes line features to a shapefile. The attribute table is laid out
/// from the first feature; values that parse as numbers become numeric
/// fields, the rest character fields.
pub fn write_line_features_shp(path: &str, features: &[LineFeature]) -> Result<()> {
    let Some(first) = features.first() else {
        return Ok(());
    };
    let mut builder = TableWriterBuilder::new();
    for (name, value) in &first.attributes {
        let field = FieldName::try_from(name.as_str())
            .map_err(|_| Error::InvalidData(format!("invalid field name {name}")))?;
        builder = if value.parse::<f64>().is_ok() {
            builder.add_numeric_field(field, 18, 5)
        } else {
            builder.add_character_field(field, 64)
        };
    }
    let mut writer = Writer::from_path(path, builder).map_err(Error::invalid_data)?;
    for f in features {
        let parts: Vec<Vec<ShpPoint>> = f
            .geometry
            .iter()
            .filter(|pl| pl.vertices.len() >= 2)
            .map(|pl| pl.vertices.iter().map(|p| ShpPoint { x: p.x, y: p.y }).collect())
            .collect();
        if parts.is_empty() {
            continue;
        }
        let mut record = Record::default();
        for (k, v) in &first.attributes {
            let value = f.attributes.get(k).unwrap_or(v);
            let field = if v.parse::<f64>().is_ok() {
                FieldValue::Numeric(value.parse().ok())
            } else {
                FieldValue::Character(Some(value.clone()))
            };
            record.insert(k.clone(), field);
        }
        writer
            .write_shape_and_record(&ShpPolyline::with_parts(parts), &record)
            .map_err(Error::invalid_data)?;
    }
    Ok(())
}

/// A shapefile used as a feature source.
#[derive(Debug, Clone)]
pub struct ShapefileSource {
    pub path: String,
}

impl ShapefileSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl FeatureSource for ShapefileSource {
    fn read_features(
        &self,
        filter: &AttributeFilter,
        within: Option<&Bounds>,
    ) -> Result<Vec<LineFeature>> {
        Ok(read_line_features_shp(&self.path)?
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

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge(x: f64, kind: &str) -> LineFeature {
        LineFeature::new(vec![Polyline::new(vec![
            Point::new(x, 0.0),
            Point::new(x + 10.0, 0.0),
        ])])
        .with_attribute("SIF_VRSTE", kind)
        .with_attribute("NAME", "most")
    }

    #[test]
    fn roundtrip_with_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridges.shp");
        let path = path.to_str().unwrap();
        write_line_features_shp(path, &[bridge(0.0, "1102"), bridge(50.0, "1101")]).unwrap();

        let all = read_line_features_shp(path).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].attributes["NAME"], "most");
        assert_eq!(all[0].class.as_deref(), Some("bridges"));
        assert_eq!(all[1].geometry[0].vertices[0], Point::new(50.0, 0.0));

        let source = ShapefileSource::new(path);
        let filter = AttributeFilter::parse(r#""SIF_VRSTE" = 1102"#).unwrap();
        let kept = source.read_features(&filter, None).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].geometry[0].vertices[0], Point::new(0.0, 0.0));
    }
}
