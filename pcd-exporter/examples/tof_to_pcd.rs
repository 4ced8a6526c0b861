use std::path::PathBuf;

use pcd_core::pointcloud::point::PointCloud;
use pcd_exporter::{export_to_file, PcdExporter};
use pcd_parser::{parse_file, Format};

fn main() {
    let input = PathBuf::from("tof_pointcloud.txt");
    let output = PathBuf::from("output.pcd");

    let (_, collected) = parse_file(&input, Some(Format::Inline)).unwrap();
    println!(
        "Number of points: {num_points}",
        num_points = collected.accepted
    );

    let point_cloud = PointCloud::cloud(collected.points);
    export_to_file(&output, &point_cloud, &PcdExporter::default()).unwrap();

    println!("Wrote {}", output.display());
}
