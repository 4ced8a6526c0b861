use std::{fs, path::Path, path::PathBuf, time::Instant};

use pcd_core::{
    pointcloud::{
        decimation::decimator::PointCloudDecimator as _,
        point::{PointCloud, PointSequence, Role},
    },
    Error,
};
use pcd_exporter::export_to_file;
use pcd_parser::parse_file;

use crate::config::Config;

/// Outcome of converting one input file.
#[derive(Debug, Clone)]
pub struct Report {
    pub input: PathBuf,
    pub output: PathBuf,
    pub accepted: usize,
    pub skipped: usize,
    pub written: usize,
}

pub fn run(config: &Config) -> Result<Vec<Report>, Error> {
    if config.inputs.len() > 1 {
        fs::create_dir_all(&config.output).map_err(|e| Error::io(&config.output, e))?;
    }

    config
        .inputs
        .iter()
        .map(|input| convert(config, input))
        .collect()
}

pub fn convert(config: &Config, input: &Path) -> Result<Report, Error> {
    let start = Instant::now();
    log::info!("start parsing {:?}...", input);

    let (format, collected) = parse_file(input, config.input_format)?;
    let accepted = collected.accepted;
    let skipped = collected.skipped();
    log::info!(
        "parsed {} as {}: {} points accepted ({} poses, {} raw)",
        input.display(),
        format.name(),
        accepted,
        collected.poses,
        collected.raw
    );
    if skipped > 0 {
        log::warn!(
            "skipped {} malformed records in {}",
            skipped,
            input.display()
        );
    }

    let point_cloud = build(config, collected.points);
    if point_cloud.is_empty() {
        log::warn!("no points extracted from {}", input.display());
    } else if let Some(bv) = point_cloud.metadata.bounding_volume {
        log::info!("bounds: min {:?}, max {:?}", bv.min, bv.max);
    }
    if let (Role::Path, Some((start, end))) = (point_cloud.role(), point_cloud.endpoints()) {
        log::info!("path start {:?}, end {:?}", start.to_array(), end.to_array());
    }

    let exporter = config.output_format.get_exporter(config.pcd_encoding);
    let output = config.output_for(input, exporter.extension());
    export_to_file(&output, &point_cloud, exporter.as_ref())?;
    log::info!(
        "wrote {} points to {:?} in {:?}",
        point_cloud.len(),
        output,
        start.elapsed()
    );

    Ok(Report {
        input: input.to_path_buf(),
        output,
        accepted,
        skipped,
        written: point_cloud.len(),
    })
}

fn build(config: &Config, points: PointSequence) -> PointCloud {
    match (config.role, &config.decimator) {
        (Role::Cloud, Some(decimator)) => {
            let before = points.len();
            let thinned: PointSequence = decimator.decimate(points.as_slice()).into();
            log::info!(
                "voxel decimation ({}): {} -> {} points",
                decimator.voxel_size(),
                before,
                thinned.len()
            );
            PointCloud::cloud(thinned)
        }
        (role, _) => PointCloud::new(points, role),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::config::Cli;

    fn config(args: &[&str]) -> Config {
        let cli = Cli::try_parse_from(std::iter::once("pcdconv").chain(args.iter().copied()))
            .unwrap();
        Config::from_cli(cli).unwrap()
    }

    #[test]
    fn tof_dump_to_pcd() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tof_pointcloud.txt");
        let output = dir.path().join("output.pcd");
        fs::write(
            &input,
            "x=1 ,y=2 ,z=3\nx=4 ,y=5 ,z=6\nnot a point\nx=bad ,y=0 ,z=0\n",
        )
        .unwrap();

        let reports = run(&config(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(reports[0].accepted, 2);
        assert_eq!(reports[0].skipped, 1);
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("POINTS 2\nDATA ascii\n1 2 3\n4 5 6\n"));
    }

    #[test]
    fn report_counts_survive_decimation() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tof_frame.txt");
        let output = dir.path().join("thinned.pcd");
        fs::write(
            &input,
            "TOF Frame: 640x480 @ 30fps\n\
             x=0.1 ,y=0.1 ,z=0.1\n\
             x=0.2 ,y=0.2 ,z=0.2\n\
             x=1.2.3 ,y=0 ,z=0\n\
             x=5 ,y=5 ,z=5\n",
        )
        .unwrap();

        let reports = run(&config(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--voxel-size",
            "1.0",
        ]))
        .unwrap();

        let report = &reports[0];
        assert_eq!(report.accepted, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.written, 2);
        assert_eq!(report.output, output);
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("POINTS 2\n"));
    }

    #[test]
    fn slam_log_to_path_scene() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("slam_data.txt");
        let output = dir.path().join("path.json");
        fs::write(
            &input,
            "position:\n  x: 0.0\n  y: 0.0\n  z: 0.0\nposition:\n  x: 1.0\n  y: 2.0\n  z: 3.0\n",
        )
        .unwrap();

        run(&config(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-m",
            "path",
        ]))
        .unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("\"role\": \"path\""));
        assert!(text.contains("\"point_count\": 2"));
    }

    #[test]
    fn empty_log_still_writes_valid_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        fs::write(&input, "").unwrap();

        let pcd = dir.path().join("empty.pcd");
        run(&config(&["-i", input.to_str().unwrap(), "-o", pcd.to_str().unwrap()])).unwrap();
        assert!(fs::read_to_string(&pcd).unwrap().ends_with("POINTS 0\nDATA ascii\n"));

        let scene = dir.path().join("empty.json");
        run(&config(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            scene.to_str().unwrap(),
            "-m",
            "path",
        ]))
        .unwrap();
        let text = fs::read_to_string(&scene).unwrap();
        assert!(text.contains("\"start\": null"));

        let txt = dir.path().join("empty_out.txt");
        run(&config(&["-i", input.to_str().unwrap(), "-o", txt.to_str().unwrap()])).unwrap();
        assert_eq!(fs::read_to_string(&txt).unwrap(), "");
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.txt");
        let output = dir.path().join("out.pcd");
        let err = run(&config(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn batch_of_frames_with_decimation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("frame_0.xyz"), "0.1 0.1 0.1\n0.2 0.2 0.2\n5 5 5\n").unwrap();
        fs::write(dir.path().join("frame_1.xyz"), "1 1 1\n").unwrap();
        let pattern = dir.path().join("frame_*.xyz");
        let out_dir = dir.path().join("clouds");

        let reports = run(&config(&[
            "-i",
            pattern.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--to",
            "ply",
            "--voxel-size",
            "1.0",
        ]))
        .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].accepted, 3);
        assert_eq!(reports[0].written, 2);
        let first = fs::read_to_string(out_dir.join("frame_0.ply")).unwrap();
        assert!(first.contains("element vertex 2\n"));
        assert!(out_dir.join("frame_1.ply").exists());
    }
}
