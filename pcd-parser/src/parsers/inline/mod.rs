use std::sync::OnceLock;

use pcd_core::{
    pointcloud::point::Point3D,
    record::{ParsedRecord, RecordKind},
    Error,
};
use regex::Regex;

use super::Parser;
use crate::collector::{Collected, PointCollector};

pub struct InlineParser;

impl Parser for InlineParser {
    fn parse_str(&self, text: &str) -> Result<Collected, Error> {
        let mut collector = PointCollector::new();
        for (index, line) in text.lines().enumerate() {
            if let Some(record) = extract_line(line, index + 1) {
                collector.collect(record);
            }
        }
        Ok(collector.finish())
    }
}

// x, y and z tokens in that order, separated by whitespace and/or commas.
// Not anchored to the line start: x may follow a timestamp or an opening
// bracket, as in SLAM console lines like `[timestamp=.. x=.. y=.. z=..`.
fn xyz_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?:^|[\s,\[])x\s*=\s*([^\s,]+)[\s,]*y\s*=\s*([^\s,]+)[\s,]*z\s*=\s*([^\s,]+)",
        )
        .expect("static pattern")
    })
}

pub fn matches_shape(line: &str) -> bool {
    xyz_pattern().is_match(line)
}

/// Returns `None` for lines that do not have the `x=.. y=.. z=..` shape.
pub fn extract_line(line: &str, line_number: usize) -> Option<ParsedRecord> {
    let captures = xyz_pattern().captures(line)?;

    let mut values = [0.0; 3];
    for (i, value) in values.iter_mut().enumerate() {
        let token = &captures[i + 1];
        // Value is whatever follows the last '=' of the token.
        let number = token.rsplit('=').next().unwrap_or(token);
        match number.parse::<f64>() {
            Ok(v) => *value = v,
            Err(e) => {
                return Some(ParsedRecord::malformed(
                    line_number,
                    line,
                    format!("failed to parse {:?}: {}", number, e),
                ))
            }
        }
    }

    Some(ParsedRecord::Point {
        point: Point3D::from(values),
        kind: RecordKind::Raw,
    })
}
