//! LAS/LAZ point clouds.
//!
//! The `las` crate applies the header scale factors and offsets while
//! reading, so every point leaving this module is in real-world units.

use las::{
    point::Format, point::Point as LasPoint, Builder, Reader, Transform, Vector, Version, Writer,
};

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Point, Point3};

/// Reads a LAS or LAZ file and returns the contained points.
pub fn read_points_las(path: &str) -> Result<Vec<Point3>> {
    let mut reader = Reader::from_path(path).map_err(Error::invalid_data)?;
    let mut pts = Vec::new();
    for wrapped in reader.points() {
        let p: LasPoint = wrapped.map_err(Error::invalid_data)?;
        pts.push(Point3::new(p.x, p.y, p.z));
    }
    Ok(pts)
}

/// Planar extent recorded in a LAS header, without reading the points.
pub fn read_bounds_las(path: &str) -> Result<Bounds> {
    let reader = Reader::from_path(path).map_err(Error::invalid_data)?;
    let b = reader.header().bounds();
    Ok(Bounds::new(
        Point::new(b.min.x, b.min.y),
        Point::new(b.max.x, b.max.y),
    ))
}

const SCALE: f64 = 0.001;

fn axis_transform(values: impl Iterator<Item = f64>) -> Transform {
    let offset = values.fold(f64::INFINITY, f64::min);
    Transform {
        scale: SCALE,
        offset: if offset.is_finite() { offset.floor() } else { 0.0 },
    }
}

/// Writes points to a LAS or LAZ file. Compression is inferred from the
/// file extension. Each axis is offset by its minimum so large projected
/// coordinates fit the scaled integer storage.
pub fn write_points_las(path: &str, points: &[Point3]) -> Result<()> {
    let mut builder = Builder::default();
    builder.point_format = Format::new(0).map_err(Error::invalid_data)?;
    builder.version = Version::new(1, 2);
    builder.transforms = Vector {
        x: axis_transform(points.iter().map(|p| p.x)),
        y: axis_transform(points.iter().map(|p| p.y)),
        z: axis_transform(points.iter().map(|p| p.z)),
    };
    let header = builder.into_header().map_err(Error::invalid_data)?;
    let mut writer = Writer::from_path(path, header).map_err(Error::invalid_data)?;
    for p in points {
        let lp = LasPoint {
            x: p.x,
            y: p.y,
            z: p.z,
            ..Default::default()
        };
        writer.write_point(lp).map_err(Error::invalid_data)?;
    }
    writer.close().map_err(Error::invalid_data)
}
