use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt as _};
use pcd_core::pointcloud::point::PointCloud;

use crate::{text::write_row, Exporter};

/// Data section layout of a PCD file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PcdEncoding {
    #[default]
    Ascii,
    /// Packed little-endian `f32` triples.
    Binary,
}

impl PcdEncoding {
    fn marker(&self) -> &'static str {
        match self {
            PcdEncoding::Ascii => "ascii",
            PcdEncoding::Binary => "binary",
        }
    }
}

/// PCD v0.7 with `x y z` float fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcdExporter {
    pub encoding: PcdEncoding,
}

impl PcdExporter {
    // POINTS is taken from the same sequence the data section iterates.
    fn write_header(&self, point_count: usize, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "# .PCD v7 - Point Cloud Data file format")?;
        writeln!(writer, "VERSION .7")?;
        writeln!(writer, "FIELDS x y z")?;
        writeln!(writer, "SIZE 4 4 4")?;
        writeln!(writer, "TYPE F F F")?;
        writeln!(writer, "COUNT 1 1 1")?;
        writeln!(writer, "POINTS {}", point_count)?;
        writeln!(writer, "DATA {}", self.encoding.marker())
    }
}

impl Exporter for PcdExporter {
    fn write(&self, point_cloud: &PointCloud, writer: &mut dyn Write) -> io::Result<()> {
        let points = &point_cloud.points;
        self.write_header(points.len(), writer)?;

        match self.encoding {
            PcdEncoding::Ascii => {
                for point in points {
                    write_row(writer, point)?;
                }
            }
            PcdEncoding::Binary => {
                for point in points {
                    writer.write_f32::<LittleEndian>(point.x as f32)?;
                    writer.write_f32::<LittleEndian>(point.y as f32)?;
                    writer.write_f32::<LittleEndian>(point.z as f32)?;
                }
            }
        }

        Ok(())
    }

    fn extension(&self) -> &'static str {
        "pcd"
    }
}

#[cfg(test)]
mod tests {
    use byteorder::{ByteOrder as _, LittleEndian};
    use pcd_core::pointcloud::point::{Point3D, PointSequence};

    use super::*;

    fn sequence(n: usize) -> PointSequence {
        (0..n)
            .map(|i| Point3D::new(i as f64, i as f64 * 0.5, -(i as f64)))
            .collect()
    }

    fn render(pc: &PointCloud, encoding: PcdEncoding) -> Vec<u8> {
        let mut out = Vec::new();
        PcdExporter { encoding }.write(pc, &mut out).unwrap();
        out
    }

    fn split_ascii(text: &str) -> (Vec<&str>, Vec<&str>) {
        let lines: Vec<&str> = text.lines().collect();
        let data_at = lines.iter().position(|l| *l == "DATA ascii").unwrap();
        (lines[..=data_at].to_vec(), lines[data_at + 1..].to_vec())
    }

    #[test]
    fn two_points_ascii() {
        let points: PointSequence =
            vec![Point3D::new(1.0, 2.0, 3.0), Point3D::new(4.0, 5.0, 6.0)].into();
        let out = render(&PointCloud::cloud(points), PcdEncoding::Ascii);
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "# .PCD v7 - Point Cloud Data file format\n\
             VERSION .7\n\
             FIELDS x y z\n\
             SIZE 4 4 4\n\
             TYPE F F F\n\
             COUNT 1 1 1\n\
             POINTS 2\n\
             DATA ascii\n\
             1 2 3\n\
             4 5 6\n"
        );
    }

    #[test]
    fn points_header_matches_row_count() {
        for n in [0, 1, 7, 250] {
            let out = render(&PointCloud::cloud(sequence(n)), PcdEncoding::Ascii);
            let text = String::from_utf8(out).unwrap();
            let (header, rows) = split_ascii(&text);

            let declared: usize = header
                .iter()
                .find_map(|l| l.strip_prefix("POINTS "))
                .unwrap()
                .parse()
                .unwrap();
            assert_eq!(declared, n);
            assert_eq!(rows.len(), n);
        }
    }

    #[test]
    fn empty_cloud_declares_zero_points() {
        let out = render(&PointCloud::cloud(PointSequence::new()), PcdEncoding::Ascii);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("POINTS 0\n"));
        assert!(text.ends_with("DATA ascii\n"));
    }

    #[test]
    fn binary_data_is_packed_f32() {
        let points: PointSequence =
            vec![Point3D::new(1.5, -2.0, 3.25), Point3D::new(0.0, 0.0, 8.0)].into();
        let out = render(&PointCloud::cloud(points), PcdEncoding::Binary);

        let marker = b"DATA binary\n";
        let data_at = out
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap()
            + marker.len();
        let data = &out[data_at..];
        assert_eq!(data.len(), 2 * 12);

        let mut values = [0f32; 6];
        LittleEndian::read_f32_into(data, &mut values);
        assert_eq!(values, [1.5, -2.0, 3.25, 0.0, 0.0, 8.0]);
    }
}
