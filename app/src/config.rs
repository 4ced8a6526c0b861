use std::{
    collections::HashMap,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use glob::glob;

use pcd_core::{pointcloud::decimation::decimator::VoxelDecimator, pointcloud::point::Role, Error};
use pcd_exporter::{OutputFormat, PcdEncoding};
use pcd_parser::Format;

#[derive(Parser, Debug)]
#[command(
    name = "pcdconv",
    about = "Converts SLAM pose logs and depth-camera point dumps into paths and point clouds",
    version = "0.0.1"
)]
pub struct Cli {
    /// Input files or glob patterns
    #[arg(short, long, required = true, num_args = 1.., value_name = "FILE")]
    pub input: Vec<String>,

    /// Output file, or directory when several inputs are given
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = ModeArg::Cloud)]
    pub mode: ModeArg,

    /// Input layout; guessed from the file when omitted
    #[arg(long, value_enum)]
    pub from: Option<FromArg>,

    /// Output format; guessed from the output extension when omitted
    #[arg(long, value_enum)]
    pub to: Option<ToArg>,

    #[arg(long, value_enum, default_value_t = PcdDataArg::Ascii)]
    pub pcd_data: PcdDataArg,

    /// Thin a cloud to one point per voxel of this edge length
    #[arg(long, value_name = "SIZE")]
    pub voxel_size: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Path,
    Cloud,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FromArg {
    Windowed,
    Inline,
    Csv,
    Xyz,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToArg {
    Text,
    Pcd,
    Ply,
    Scene,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcdDataArg {
    Ascii,
    Binary,
}

impl From<ModeArg> for Role {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Path => Role::Path,
            ModeArg::Cloud => Role::Cloud,
        }
    }
}

impl From<FromArg> for Format {
    fn from(arg: FromArg) -> Self {
        match arg {
            FromArg::Windowed => Format::Windowed,
            FromArg::Inline => Format::Inline,
            FromArg::Csv => Format::Csv,
            FromArg::Xyz => Format::Xyz,
        }
    }
}

impl From<ToArg> for OutputFormat {
    fn from(arg: ToArg) -> Self {
        match arg {
            ToArg::Text => OutputFormat::Text,
            ToArg::Pcd => OutputFormat::Pcd,
            ToArg::Ply => OutputFormat::Ply,
            ToArg::Scene => OutputFormat::Scene,
        }
    }
}

impl From<PcdDataArg> for PcdEncoding {
    fn from(arg: PcdDataArg) -> Self {
        match arg {
            PcdDataArg::Ascii => PcdEncoding::Ascii,
            PcdDataArg::Binary => PcdEncoding::Binary,
        }
    }
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub role: Role,
    pub input_format: Option<Format>,
    pub output_format: OutputFormat,
    pub pcd_encoding: PcdEncoding,
    pub decimator: Option<VoxelDecimator>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, Error> {
        let inputs = expand_globs(&cli.input)?;
        if inputs.is_empty() {
            return Err(Error::Config(format!(
                "no input files matched {:?}",
                cli.input
            )));
        }

        let role = Role::from(cli.mode);

        let output_format = cli
            .to
            .map(OutputFormat::from)
            .or_else(|| {
                if inputs.len() > 1 || cli.output.is_dir() {
                    None
                } else {
                    cli.output
                        .extension()
                        .and_then(OsStr::to_str)
                        .and_then(OutputFormat::from_extension)
                }
            })
            .unwrap_or(match role {
                Role::Path => OutputFormat::Scene,
                Role::Cloud => OutputFormat::Pcd,
            });

        let decimator = match cli.voxel_size {
            Some(_) if role == Role::Path => {
                return Err(Error::Config(
                    "--voxel-size only applies to cloud mode".to_string(),
                ))
            }
            Some(size) => Some(VoxelDecimator::new(size)?),
            None => None,
        };

        let config = Config {
            inputs,
            output: cli.output,
            role,
            input_format: cli.from.map(Format::from),
            output_format,
            pcd_encoding: cli.pcd_data.into(),
            decimator,
        };
        config.check_distinct_outputs()?;

        Ok(config)
    }

    // Inputs sharing a file stem would overwrite each other's output.
    fn check_distinct_outputs(&self) -> Result<(), Error> {
        if !self.writes_to_directory() {
            return Ok(());
        }

        let extension = self.output_format.get_exporter(self.pcd_encoding).extension();
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
        for input in &self.inputs {
            let output = self.output_for(input, extension);
            if let Some(previous) = claimed.get(&output) {
                return Err(Error::Config(format!(
                    "{} and {} would both be written to {}",
                    previous.display(),
                    input.display(),
                    output.display()
                )));
            }
            claimed.insert(output, input);
        }
        Ok(())
    }

    /// Whether `output` names a directory to hold one file per input.
    pub fn writes_to_directory(&self) -> bool {
        self.inputs.len() > 1 || self.output.is_dir()
    }

    pub fn output_for(&self, input: &Path, extension: &str) -> PathBuf {
        if self.writes_to_directory() {
            let stem = input.file_stem().unwrap_or_else(|| OsStr::new("output"));
            self.output
                .join(format!("{}.{}", stem.to_string_lossy(), extension))
        } else {
            self.output.clone()
        }
    }
}

fn expand_globs(input_patterns: &[String]) -> Result<Vec<PathBuf>, Error> {
    let mut paths = Vec::new();
    for pattern in input_patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let entries = glob(pattern)
                .map_err(|e| Error::Config(format!("invalid glob pattern {:?}: {}", pattern, e)))?;
            for entry in entries {
                match entry {
                    Ok(path) => paths.push(path),
                    Err(e) => log::warn!("skipping unreadable glob match: {}", e),
                }
            }
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }
    Ok(paths)
}
