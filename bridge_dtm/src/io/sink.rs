//! Writing one output file per bridge group.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Point3;
use crate::pipeline::PointSink;

/// File format of group output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Obj,
    Csv,
    Las,
}

impl OutputFormat {
    /// Parses a format name. Case insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "obj" => Some(Self::Obj),
            "csv" => Some(Self::Csv),
            "las" => Some(Self::Las),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Csv => "csv",
            Self::Las => "las",
        }
    }

    pub fn write(&self, path: &str, points: &[Point3]) -> Result<()> {
        match self {
            Self::Obj => super::obj::write_points_obj(path, points),
            Self::Csv => super::write_points_csv(path, points),
            #[cfg(feature = "las")]
            Self::Las => super::las::write_points_las(path, points),
            #[cfg(not(feature = "las"))]
            Self::Las => Err(Error::InvalidData(format!(
                "{path}: LAS support not enabled"
            ))),
        }
    }
}

/// Writes each group to `{dir}/{prefix}{group}.{ext}`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    prefix: String,
    format: OutputFormat,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Creates the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>, prefix: &str, format: OutputFormat) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.to_string(),
            format,
            written: Vec::new(),
        })
    }

    pub fn path_for(&self, group: usize) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", self.prefix, group, self.format.extension()))
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PointSink for DirectorySink {
    fn write_group(&mut self, group: usize, points: &[Point3]) -> Result<()> {
        let path = self.path_for(group);
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::InvalidData(format!("non UTF-8 path {}", path.display())))?;
        self.format.write(path_str, points)?;
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_prefix_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"), "test", OutputFormat::Obj).unwrap();
        sink.write_group(3, &[Point3::new(1.0, 2.0, 3.0)]).unwrap();
        let expected = dir.path().join("out").join("test3.obj");
        assert_eq!(sink.written(), &[expected.clone()]);
        assert!(expected.exists());
    }

    #[test]
    fn format_parse() {
        assert_eq!(OutputFormat::parse("CSV"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::parse("ply"), None);
    }
}
