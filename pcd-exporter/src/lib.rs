use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use pcd_core::{pointcloud::point::PointCloud, Error};

pub mod pcd;
pub mod ply;
pub mod scene;
pub mod text;

pub use pcd::{PcdEncoding, PcdExporter};
pub use ply::PlyExporter;
pub use scene::SceneExporter;
pub use text::TextExporter;

pub trait Exporter {
    fn write(&self, point_cloud: &PointCloud, writer: &mut dyn Write) -> io::Result<()>;

    /// Conventional file extension, without the dot.
    fn extension(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Pcd,
    Ply,
    Scene,
}

impl OutputFormat {
    pub fn from_extension(extension: &str) -> Option<OutputFormat> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" | "xyz" => Some(OutputFormat::Text),
            "pcd" => Some(OutputFormat::Pcd),
            "ply" => Some(OutputFormat::Ply),
            "json" => Some(OutputFormat::Scene),
            _ => None,
        }
    }

    pub fn get_exporter(&self, encoding: PcdEncoding) -> Box<dyn Exporter> {
        match self {
            OutputFormat::Text => Box::new(TextExporter),
            OutputFormat::Pcd => Box::new(PcdExporter { encoding }),
            OutputFormat::Ply => Box::new(PlyExporter),
            OutputFormat::Scene => Box::new(SceneExporter::default()),
        }
    }
}

/// Writes `point_cloud` to `path`, replacing any existing file.
pub fn export_to_file(
    path: &Path,
    point_cloud: &PointCloud,
    exporter: &dyn Exporter,
) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    exporter
        .write(point_cloud, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(path, e))?;

    log::debug!(
        "wrote {} points to {}",
        point_cloud.len(),
        path.display()
    );
    Ok(())
}
