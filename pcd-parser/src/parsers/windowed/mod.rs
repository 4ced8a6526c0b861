use pcd_core::{
    pointcloud::point::Point3D,
    record::{ParsedRecord, RecordKind},
    Error,
};

use super::Parser;
use crate::collector::{Collected, PointCollector};

pub const POSITION_MARKER: &str = "position:";

/// Lines after the marker holding x, y and z, in that order.
const WINDOW_LEN: usize = 3;

pub struct WindowedParser;

impl Parser for WindowedParser {
    fn parse_str(&self, text: &str) -> Result<Collected, Error> {
        let lines: Vec<&str> = text.lines().collect();
        let mut collector = PointCollector::new();

        // Every marker opens its own window, even one sitting inside another.
        for (index, line) in lines.iter().enumerate() {
            if line.contains(POSITION_MARKER) {
                collector.collect(extract_window(&lines, index));
            }
        }

        Ok(collector.finish())
    }
}

/// Builds a point from the three lines following the marker at `marker_index`.
pub fn extract_window(lines: &[&str], marker_index: usize) -> ParsedRecord {
    let line_number = marker_index + 1;
    let window = match lines.get(marker_index + 1..marker_index + 1 + WINDOW_LEN) {
        Some(window) => window,
        None => {
            return ParsedRecord::malformed(
                line_number,
                lines.get(marker_index).copied().unwrap_or_default(),
                "fewer than 3 lines follow the position marker",
            )
        }
    };

    let mut values = [0.0; WINDOW_LEN];
    for (value, (axis, line)) in values.iter_mut().zip(["x", "y", "z"].iter().zip(window)) {
        match parse_labeled_value(line) {
            Ok(v) => *value = v,
            Err(reason) => {
                return ParsedRecord::malformed(
                    line_number,
                    window.join("\n"),
                    format!("'{}': {}", axis, reason),
                )
            }
        }
    }

    ParsedRecord::Point {
        point: Point3D::from(values),
        kind: RecordKind::Pose,
    }
}

// `<label>: <number>`; the number is the second colon-delimited field.
fn parse_labeled_value(line: &str) -> Result<f64, String> {
    let value = line
        .split(':')
        .nth(1)
        .map(str::trim)
        .ok_or_else(|| "missing ':' separator".to_string())?;
    value
        .parse::<f64>()
        .map_err(|e| format!("failed to parse {:?}: {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Collected {
        WindowedParser.parse_str(text).unwrap()
    }

    #[test]
    fn extracts_position_window() {
        let collected = parse("header\nposition:\n  x: 10.0\n  y: 20.0\n  z: 30.0\ntrailer\n");
        assert_eq!(collected.accepted, 1);
        assert_eq!(
            collected.points.first(),
            Some(&Point3D::new(10.0, 20.0, 30.0))
        );
    }

    #[test]
    fn ros_pose_messages_yield_one_point_each_in_order() {
        let mut text = String::new();
        for i in 0..5 {
            text.push_str(&format!(
                "header:\n  seq: {i}\npose:\n  position:\n    x: {i}.5\n    y: -{i}\n    z: 0.25\n  orientation:\n    x: 0.0\n    y: 0.0\n    z: 0.0\n    w: 1.0\n---\n"
            ));
        }
        let collected = parse(&text);
        assert_eq!(collected.accepted, 5);
        assert_eq!(collected.poses, 5);
        let xs: Vec<f64> = collected.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.5, 1.5, 2.5, 3.5, 4.5]);
        assert_eq!(collected.points.last(), Some(&Point3D::new(4.5, -4.0, 0.25)));
    }

    #[test]
    fn truncated_window_is_skipped() {
        let collected = parse("position:\n x: 1\n y: 2\n z: 3\nposition:\n x: 4\n y: 5\n");
        assert_eq!(collected.accepted, 1);
        assert_eq!(collected.skipped(), 1);
        assert_eq!(collected.malformed[0].line, 5);
    }

    #[test]
    fn bad_number_drops_whole_window() {
        let collected = parse("position:\n x: 1\n y: nope\n z: 3\n");
        assert!(collected.points.is_empty());
        assert_eq!(collected.skipped(), 1);
        assert!(collected.malformed[0].reason.contains("'y'"));
    }

    #[test]
    fn line_without_colon_fails_the_window() {
        let collected = parse("position:\n x 1\n y: 2\n z: 3\n");
        assert!(collected.points.is_empty());
        assert!(collected.malformed[0].reason.contains("separator"));
    }

    #[test]
    fn no_markers_means_no_points() {
        assert!(parse("").points.is_empty());
        assert!(parse("x: 1\ny: 2\nz: 3\n").points.is_empty());
    }
}
