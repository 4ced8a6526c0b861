use std::io::{self, Write};

use pcd_core::pointcloud::point::PointCloud;

use crate::{text::write_row, Exporter};

/// ASCII PLY with a single float vertex element.
pub struct PlyExporter;

impl Exporter for PlyExporter {
    fn write(&self, point_cloud: &PointCloud, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "ply")?;
        writeln!(writer, "format ascii 1.0")?;
        writeln!(writer, "element vertex {}", point_cloud.points.len())?;
        writeln!(writer, "property float x")?;
        writeln!(writer, "property float y")?;
        writeln!(writer, "property float z")?;
        writeln!(writer, "end_header")?;

        for point in &point_cloud.points {
            write_row(writer, point)?;
        }
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "ply"
    }
}
