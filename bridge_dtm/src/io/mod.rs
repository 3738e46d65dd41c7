//! File input and output for point clouds, reference features and results.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};

use crate::error::{Error, Result};
use crate::geometry::Point3;

pub mod cloud;
pub mod geojson;
#[cfg(feature = "las")]
pub mod las;
pub mod obj;
#[cfg(feature = "shapefile")]
pub mod shp;
pub mod sink;

/// Reads a file to string.
pub fn read_to_string(path: &str) -> Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Writes a string to a file, replacing its contents.
pub fn write_string(path: &str, contents: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

/// Reads all lines of a text file.
pub fn read_lines(path: &str) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(reader.lines().collect::<std::io::Result<_>>()?)
}

/// Reads a CSV file of `x,y,z` rows. Blank lines are skipped and extra
/// columns are ignored.
pub fn read_points_csv(path: &str) -> Result<Vec<Point3>> {
    let lines = read_lines(path)?;
    let mut pts = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 3 {
            return Err(Error::InvalidData(format!(
                "line {}: expected three comma-separated values",
                idx + 1
            )));
        }
        let mut coords = [0.0; 3];
        for (c, part) in coords.iter_mut().zip(&parts) {
            *c = part
                .trim()
                .parse::<f64>()
                .map_err(|e| Error::InvalidData(format!("line {}: {}", idx + 1, e)))?;
        }
        pts.push(Point3::new(coords[0], coords[1], coords[2]));
    }
    Ok(pts)
}

/// Writes points as `x,y,z` rows.
pub fn write_points_csv(path: &str, points: &[Point3]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for p in points {
        writeln!(file, "{},{},{}", p.x, p.y, p.z)?;
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_roundtrip() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let pts = vec![Point3::new(1.5, 2.0, 3.25), Point3::new(-4.0, 5.0, 6.0)];
        write_points_csv(path, &pts).unwrap();
        assert_eq!(read_points_csv(path).unwrap(), pts);
    }

    #[test]
    fn csv_reports_bad_line() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        write_string(path, "1,2,3\n\n4,five,6\n").unwrap();
        let err = read_points_csv(path).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }
}
