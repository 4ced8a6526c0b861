use pcd_core::{
    pointcloud::point::PointSequence,
    record::{MalformedRecord, ParsedRecord, RecordKind},
};

/// Accumulates extracted points in encounter order.
///
/// Malformed records are dropped and remembered for reporting. Nothing is
/// retried and no partial point ever reaches the sequence.
#[derive(Debug, Default)]
pub struct PointCollector {
    points: PointSequence,
    malformed: Vec<MalformedRecord>,
    poses: usize,
    raw: usize,
}

impl PointCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, record: ParsedRecord) {
        match record {
            ParsedRecord::Point { point, kind } => {
                match kind {
                    RecordKind::Pose => self.poses += 1,
                    RecordKind::Raw => self.raw += 1,
                }
                self.points.push(point);
            }
            ParsedRecord::Malformed(malformed) => {
                log::debug!("skipping malformed record at {}", malformed);
                self.malformed.push(malformed);
            }
        }
    }

    pub fn finish(self) -> Collected {
        Collected {
            accepted: self.points.len(),
            points: self.points,
            malformed: self.malformed,
            poses: self.poses,
            raw: self.raw,
        }
    }
}

impl Extend<ParsedRecord> for PointCollector {
    fn extend<I: IntoIterator<Item = ParsedRecord>>(&mut self, iter: I) {
        for record in iter {
            self.collect(record);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub points: PointSequence,
    pub accepted: usize,
    pub malformed: Vec<MalformedRecord>,
    /// Accepted records that came from pose logs.
    pub poses: usize,
    /// Accepted records that came from raw point dumps.
    pub raw: usize,
}

impl Collected {
    pub fn skipped(&self) -> usize {
        self.malformed.len()
    }
}
