use std::fmt;

use crate::pointcloud::point::Point3D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A pose sample from a SLAM log.
    Pose,
    /// A raw point from a depth/ToF dump or a plain coordinate table.
    Raw,
}

/// A record that looked like a point but could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    /// 1-based line number where the record starts.
    pub line: usize,
    pub raw: String,
    pub reason: String,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.reason, self.raw)
    }
}

/// Result of running an extractor over one input unit.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecord {
    Point { point: Point3D, kind: RecordKind },
    Malformed(MalformedRecord),
}

impl ParsedRecord {
    pub fn malformed(line: usize, raw: impl Into<String>, reason: impl Into<String>) -> Self {
        ParsedRecord::Malformed(MalformedRecord {
            line,
            raw: raw.into(),
            reason: reason.into(),
        })
    }
}
