use std::io::{self, Write};

use pcd_core::pointcloud::point::{Point3D, PointCloud};

use crate::Exporter;

/// Headerless `x y z` rows in sequence order.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn write(&self, point_cloud: &PointCloud, writer: &mut dyn Write) -> io::Result<()> {
        for point in &point_cloud.points {
            write_row(writer, point)?;
        }
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

// f64's Display is the shortest text that parses back to the same value.
pub(crate) fn write_row(writer: &mut dyn Write, point: &Point3D) -> io::Result<()> {
    writeln!(writer, "{} {} {}", point.x, point.y, point.z)
}
