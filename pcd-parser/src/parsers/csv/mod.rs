use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};

use pcd_core::{
    pointcloud::point::Point3D,
    record::{ParsedRecord, RecordKind},
    Error,
};

use super::Parser;
use crate::collector::{Collected, PointCollector};

const REQUIRED_FIELDS: [&str; 3] = ["x", "y", "z"];

/// Pose tables such as `timestamp,x,y,z,pitch,yaw,roll,confidence`.
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse_str(&self, text: &str) -> Result<Collected, Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_reader(text.as_bytes());

        let mut collector = PointCollector::new();

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                return Err(Error::Config(format!("unreadable CSV header: {}", e)));
            }
        };
        if headers.iter().all(|h| h.is_empty()) {
            return Ok(collector.finish());
        }
        let field_mapping = create_field_mapping(&headers)?;

        for (index, record) in reader.records().enumerate() {
            // Header is line 1.
            let fallback_line = index + 2;
            let parsed = match record {
                Ok(record) => {
                    let line = record
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(fallback_line);
                    parse_point(&record, &field_mapping, line)
                }
                Err(e) => ParsedRecord::malformed(fallback_line, "", e.to_string()),
            };
            collector.collect(parsed);
        }

        Ok(collector.finish())
    }
}

fn normalize(name: &str) -> String {
    name.to_lowercase().replace(['_', '-', ' '], "")
}

/// Whether a header line names x, y and z columns.
pub fn names_xyz_columns(line: &str) -> bool {
    let names: Vec<String> = line.split(',').map(normalize).collect();
    REQUIRED_FIELDS
        .iter()
        .all(|field| names.iter().any(|name| name == field))
}

fn create_field_mapping(headers: &StringRecord) -> Result<HashMap<&'static str, usize>, Error> {
    let mut mapping = HashMap::new();

    for (index, header) in headers.iter().enumerate() {
        let normalized_header = normalize(header);
        for attr_name in REQUIRED_FIELDS {
            if normalized_header == attr_name {
                mapping.entry(attr_name).or_insert(index);
                break;
            }
        }
    }

    for attr_name in REQUIRED_FIELDS {
        if !mapping.contains_key(attr_name) {
            return Err(Error::MissingField(attr_name.to_string()));
        }
    }

    Ok(mapping)
}

fn get_field_value<'a>(
    record: &'a StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
    field_name: &str,
) -> Option<&'a str> {
    field_mapping
        .get(field_name)
        .and_then(|&index| record.get(index))
}

fn parse_point(
    record: &StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
    line: usize,
) -> ParsedRecord {
    let raw = record.iter().collect::<Vec<_>>().join(",");

    let mut values = [0.0; 3];
    for (value, field_name) in values.iter_mut().zip(REQUIRED_FIELDS) {
        let Some(value_str) = get_field_value(record, field_mapping, field_name) else {
            return ParsedRecord::malformed(line, raw, format!("missing '{}' field", field_name));
        };
        match value_str.parse::<f64>() {
            Ok(v) => *value = v,
            Err(e) => {
                return ParsedRecord::malformed(
                    line,
                    raw,
                    format!("failed to parse '{}': {}", field_name, e),
                )
            }
        }
    }

    ParsedRecord::Point {
        point: Point3D::from(values),
        kind: RecordKind::Pose,
    }
}
