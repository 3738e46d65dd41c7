//! Wavefront OBJ vertex lists.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::{Error, Result};
use crate::geometry::Point3;

/// Writes one `v x y z` line per point.
pub fn write_points_obj(path: &str, points: &[Point3]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for p in points {
        writeln!(file, "v {} {} {}", p.x, p.y, p.z)?;
    }
    file.flush()?;
    Ok(())
}

/// Reads the vertex lines of an OBJ file, ignoring all other records.
pub fn read_points_obj(path: &str) -> Result<Vec<Point3>> {
    let mut pts = Vec::new();
    for (idx, line) in super::read_lines(path)?.iter().enumerate() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("v") {
            continue;
        }
        let coords: Vec<f64> = parts
            .take(3)
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::InvalidData(format!("line {}: {}", idx + 1, e)))?;
        if coords.len() != 3 {
            return Err(Error::InvalidData(format!(
                "line {}: vertex needs three coordinates",
                idx + 1
            )));
        }
        pts.push(Point3::new(coords[0], coords[1], coords[2]));
    }
    Ok(pts)
}
