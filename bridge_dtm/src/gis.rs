//! Reference features and attribute filtering.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Polyline};

/// Geometry paired with optional feature class and GIS attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature<T> {
    /// Optional feature class name, e.g. layer or source file.
    pub class: Option<String>,
    /// Attribute key/value pairs with values rendered as text.
    pub attributes: BTreeMap<String, String>,
    /// Underlying geometry.
    pub geometry: T,
}

impl<T> Feature<T> {
    /// Creates a new feature with empty attributes.
    pub fn new(geometry: T) -> Self {
        Self {
            class: None,
            attributes: BTreeMap::new(),
            geometry,
        }
    }

    /// Adds an attribute, builder style.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }
}

/// A line feature made of one or more parts.
pub type LineFeature = Feature<Vec<Polyline>>;

impl LineFeature {
    /// Bounds of all parts, `None` when the feature has no vertices.
    pub fn bounds(&self) -> Option<Bounds> {
        self.geometry
            .iter()
            .filter_map(Polyline::bounds)
            .reduce(|mut acc, b| {
                acc.include(&b);
                acc
            })
    }
}

/// Conjunction of `FIELD = value` clauses.
///
/// Field names may be double-quoted and values single-quoted, e.g.
/// `"SIF_VRSTE" = 1102 AND "ATR2" = 1`. Numeric values compare numerically,
/// everything else compares as trimmed text. An empty expression matches
/// every feature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeFilter {
    clauses: Vec<(String, String)>,
}

impl AttributeFilter {
    /// Filter that accepts everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn parse(expr: &str) -> Result<Self> {
        let mut clauses = Vec::new();
        if expr.trim().is_empty() {
            return Ok(Self { clauses });
        }
        for clause in split_and(expr) {
            let (field, value) = clause.split_once('=').ok_or_else(|| {
                Error::InvalidData(format!("filter clause `{}` has no `=`", clause.trim()))
            })?;
            let field = unquote(field.trim(), '"');
            let value = unquote(value.trim(), '\'');
            if field.is_empty() {
                return Err(Error::InvalidData(format!(
                    "filter clause `{}` has no field name",
                    clause.trim()
                )));
            }
            clauses.push((field.to_string(), value.to_string()));
        }
        Ok(Self { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns `true` if every clause holds for `attributes`. A missing
    /// attribute fails its clause.
    pub fn matches(&self, attributes: &BTreeMap<String, String>) -> bool {
        self.clauses.iter().all(|(field, expected)| {
            attributes
                .get(field)
                .is_some_and(|actual| values_equal(actual, expected))
        })
    }
}

fn split_and(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = expr;
    loop {
        let upper = rest.to_ascii_uppercase();
        match upper.find(" AND ") {
            Some(pos) => {
                parts.push(&rest[..pos]);
                rest = &rest[pos + 5..];
            }
            None => {
                parts.push(rest);
                return parts;
            }
        }
    }
}

fn unquote(s: &str, quote: char) -> &str {
    s.strip_prefix(quote)
        .and_then(|inner| inner.strip_suffix(quote))
        .unwrap_or(s)
}

fn values_equal(actual: &str, expected: &str) -> bool {
    let actual = actual.trim();
    match (actual.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn quoted_conjunction() {
        let filter = AttributeFilter::parse(r#""SIF_VRSTE" = 1102 AND "ATR2" = 1"#).unwrap();
        assert!(filter.matches(&attrs(&[("SIF_VRSTE", "1102.0"), ("ATR2", "1")])));
        assert!(!filter.matches(&attrs(&[("SIF_VRSTE", "1102"), ("ATR2", "2")])));
        assert!(!filter.matches(&attrs(&[("SIF_VRSTE", "1102")])));
    }

    #[test]
    fn text_values_and_lowercase_and() {
        let filter = AttributeFilter::parse("kind = 'river' and name=Sava").unwrap();
        assert!(filter.matches(&attrs(&[("kind", "river"), ("name", " Sava ")])));
        assert!(!filter.matches(&attrs(&[("kind", "road"), ("name", "Sava")])));
    }

    #[test]
    fn empty_matches_everything() {
        let filter = AttributeFilter::parse("  ").unwrap();
        assert!(filter.is_empty());
        assert!(filter.matches(&BTreeMap::new()));
    }

    #[test]
    fn malformed_clause_rejected() {
        assert!(AttributeFilter::parse("SIF_VRSTE 1102").is_err());
        assert!(AttributeFilter::parse("= 3").is_err());
    }

    #[test]
    fn feature_bounds_cover_all_parts() {
        let f = LineFeature::new(vec![
            Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]),
            Polyline::new(vec![Point::new(5.0, -2.0), Point::new(6.0, 0.0)]),
        ]);
        assert_eq!(
            f.bounds(),
            Some(Bounds::new(Point::new(0.0, -2.0), Point::new(6.0, 1.0)))
        );
        assert_eq!(LineFeature::new(Vec::new()).bounds(), None);
    }
}
