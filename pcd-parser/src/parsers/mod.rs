use std::{fs, path::Path};

use pcd_core::Error;

use crate::collector::Collected;

pub mod csv;
pub mod inline;
pub mod windowed;
pub mod xyz;

pub trait ParserProvider {
    fn get_parser(&self) -> Box<dyn Parser>;
}

pub trait Parser {
    /// Extracts every point in `text` in one pass.
    fn parse_str(&self, text: &str) -> Result<Collected, Error>;

    fn parse(&self, path: &Path) -> Result<Collected, Error> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.parse_str(&text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// SLAM pose log: `position:` followed by x, y, z label lines.
    Windowed,
    /// ToF dump: `x=<num> ,y=<num> ,z=<num>` per line.
    Inline,
    /// Pose table with a header row naming the x, y, z columns.
    Csv,
    /// Plain `x y z` rows.
    Xyz,
}

impl Format {
    pub fn from_extension(extension: &str) -> Option<Format> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Format::Csv),
            "xyz" => Some(Format::Xyz),
            _ => None,
        }
    }

    /// Guesses the layout of a log from its content.
    pub fn sniff(text: &str) -> Format {
        if text.lines().any(|line| line.contains(windowed::POSITION_MARKER)) {
            return Format::Windowed;
        }
        // ToF dumps usually open with a frame banner before the first point.
        if text.lines().any(inline::matches_shape) {
            return Format::Inline;
        }

        let first = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'));

        match first {
            Some(line) if line.contains(',') && csv::names_xyz_columns(line) => Format::Csv,
            _ => Format::Xyz,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Windowed => "windowed",
            Format::Inline => "inline",
            Format::Csv => "csv",
            Format::Xyz => "xyz",
        }
    }
}

impl ParserProvider for Format {
    fn get_parser(&self) -> Box<dyn Parser> {
        match self {
            Format::Windowed => Box::new(windowed::WindowedParser),
            Format::Inline => Box::new(inline::InlineParser),
            Format::Csv => Box::new(csv::CsvParser),
            Format::Xyz => Box::new(xyz::XyzParser),
        }
    }
}

/// Reads `path` once and parses it with `format`, or with the sniffed format
/// when none is given.
pub fn parse_file(path: &Path, format: Option<Format>) -> Result<(Format, Collected), Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let format = format
        .or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(Format::from_extension)
        })
        .unwrap_or_else(|| Format::sniff(&text));

    let collected = format.get_parser().parse_str(&text)?;
    Ok((format, collected))
}
