use pcd_core::{
    pointcloud::point::Point3D,
    record::{ParsedRecord, RecordKind},
    Error,
};

use super::Parser;
use crate::collector::{Collected, PointCollector};

/// Whitespace separated `x y z` rows, as written by the ToF saver and by the
/// normalized-text exporter. Extra columns are ignored.
pub struct XyzParser;

impl Parser for XyzParser {
    fn parse_str(&self, text: &str) -> Result<Collected, Error> {
        let mut collector = PointCollector::new();
        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            collector.collect(extract_row(trimmed, index + 1));
        }
        Ok(collector.finish())
    }
}

pub fn extract_row(line: &str, line_number: usize) -> ParsedRecord {
    let mut tokens = line.split_whitespace();
    let mut values = [0.0; 3];

    for (value, axis) in values.iter_mut().zip(["x", "y", "z"]) {
        let Some(token) = tokens.next() else {
            return ParsedRecord::malformed(line_number, line, format!("missing '{}' column", axis));
        };
        match token.parse::<f64>() {
            Ok(v) => *value = v,
            Err(e) => {
                return ParsedRecord::malformed(
                    line_number,
                    line,
                    format!("failed to parse '{}': {}", axis, e),
                )
            }
        }
    }

    ParsedRecord::Point {
        point: Point3D::from(values),
        kind: RecordKind::Raw,
    }
}
