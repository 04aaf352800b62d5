//! Structured project files (JSON).
//!
//! Version 2 (canonical):
//!
//! ```json
//! { "version": 2, "floors": [ { "name": "Ground", "rows": [["A", "3.00", "4.00", "2.50", "12.0", "30"]] } ] }
//! ```
//!
//! Version 1 is a bare array of four-column matrices, one per floor, and is
//! read only. Its floors get generated names.

use super::{FloorData, read_capped};
use crate::error::{Result, RoomcalcError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PROJECT_FORMAT_VERSION: u64 = 2;

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyProjectFile {
    Versioned(VersionedFile),
    Legacy(Vec<Vec<Vec<String>>>),
}

#[derive(Serialize, Deserialize)]
struct VersionedFile {
    version: u64,
    #[serde(default)]
    floors: Vec<FloorRecord>,
}

#[derive(Serialize, Deserialize)]
struct FloorRecord {
    name: String,
    rows: Vec<Vec<String>>,
}

pub fn read_project(path: &Path, default_floor_name: &str) -> Result<Vec<FloorData>> {
    let content = read_capped(path)?;
    parse_project_content(&content, default_floor_name)
}

/// Decode either file version. `default_floor_name` names version 1 floors
/// (`"<name> 1"`, `"<name> 2"`, ...).
pub fn parse_project_content(content: &str, default_floor_name: &str) -> Result<Vec<FloorData>> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|err| RoomcalcError::Parse {
            line: err.line(),
            message: err.to_string(),
        })?;
    let floors = match serde_json::from_value::<AnyProjectFile>(value)? {
        AnyProjectFile::Versioned(file) => {
            if file.version != PROJECT_FORMAT_VERSION {
                return Err(RoomcalcError::UnsupportedVersion(file.version));
            }
            file.floors
                .into_iter()
                .map(|floor| FloorData {
                    name: floor.name,
                    rows: floor.rows,
                })
                .collect()
        }
        AnyProjectFile::Legacy(matrices) => matrices
            .into_iter()
            .enumerate()
            .map(|(index, rows)| FloorData {
                name: format!("{} {}", default_floor_name, index + 1),
                rows,
            })
            .collect(),
    };
    Ok(floors)
}

pub fn write_project(path: &Path, floors: &[FloorData]) -> Result<()> {
    std::fs::write(path, write_project_content(floors)?)?;
    Ok(())
}

pub fn write_project_content(floors: &[FloorData]) -> Result<String> {
    let file = VersionedFile {
        version: PROJECT_FORMAT_VERSION,
        floors: floors
            .iter()
            .map(|floor| FloorRecord {
                name: floor.name.clone(),
                rows: floor.rows.clone(),
            })
            .collect(),
    };
    let mut out = serde_json::to_string_pretty(&file)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn floor(name: &str, rows: &[&[&str]]) -> FloorData {
        FloorData {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_parse_version_2() {
        let content = r#"{
            "version": 2,
            "floors": [
                { "name": "Ground", "rows": [["A", "3.00", "4.00", "2.50", "12.0", "30"]] },
                { "name": "Attic", "rows": [] }
            ]
        }"#;
        let floors = parse_project_content(content, "Floor").unwrap();
        assert_eq!(
            floors,
            vec![
                floor("Ground", &[&["A", "3.00", "4.00", "2.50", "12.0", "30"]]),
                floor("Attic", &[]),
            ]
        );
    }

    #[test]
    fn test_parse_version_1_bare_array() {
        let content = r#"[[["A", "1", "2", "3"]], [["B", "4", "5", "6"], ["+", "1", "1", "1"]]]"#;
        let floors = parse_project_content(content, "Floor").unwrap();
        assert_eq!(
            floors,
            vec![
                floor("Floor 1", &[&["A", "1", "2", "3"]]),
                floor("Floor 2", &[&["B", "4", "5", "6"], &["+", "1", "1", "1"]]),
            ]
        );
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let content = r#"{ "version": 3, "floors": [] }"#;
        assert!(matches!(
            parse_project_content(content, "Floor"),
            Err(RoomcalcError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn test_malformed_json_reports_line() {
        let content = "{\n  \"version\": 2,\n  \"floors\": [ oops ]\n}";
        match parse_project_content(content, "Floor").unwrap_err() {
            RoomcalcError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_a_json_error() {
        let content = r#"{ "floors": "nope" }"#;
        assert!(matches!(
            parse_project_content(content, "Floor"),
            Err(RoomcalcError::Json(_))
        ));
    }

    #[test]
    fn test_written_content_parses_back() {
        let floors = vec![
            floor("Ground", &[&["A", "3.00", "4.00", "2.50", "12.0", "30"]]),
            floor("Loft \"east\"", &[&["Ж", "1.00", "1.00", "1.00", "1.0", "1"]]),
        ];
        let content = write_project_content(&floors).unwrap();
        assert!(content.contains("\"version\": 2"));
        assert_eq!(parse_project_content(&content, "Floor").unwrap(), floors);
    }
}
