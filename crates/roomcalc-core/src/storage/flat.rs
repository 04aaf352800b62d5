//! Flat text format: one floor, four raw columns per line.
//!
//! Fields are comma-separated; a field may be quoted (`"a,b"`, with `""` for
//! a literal quote). Derived columns are never written, the engine recomputes
//! them on load.

use super::read_capped;
use crate::error::{Result, RoomcalcError};
use roomcalc_engine::engine::Column;
use std::path::Path;
use tracing::trace;

/// Read a flat file into a row matrix.
pub fn read_flat(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = read_capped(path)?;
    parse_flat_content(&content)
}

/// Parse flat content. Blank lines are skipped and fields past the fourth
/// are dropped.
pub fn parse_flat_content(content: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = parse_line(line).map_err(|message| RoomcalcError::Parse {
            line: line_num + 1,
            message,
        })?;
        if fields.len() > Column::RAW.len() {
            trace!(line = line_num + 1, extra = fields.len() - Column::RAW.len(), "dropping extra fields");
            fields.truncate(Column::RAW.len());
        }
        rows.push(fields);
    }
    Ok(rows)
}

/// Write a row matrix as flat text. Only the first four fields of each row
/// are written.
pub fn write_flat(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    std::fs::write(path, write_flat_content(rows))?;
    Ok(())
}

pub fn write_flat_content(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let fields: Vec<String> = row
            .iter()
            .take(Column::RAW.len())
            .map(|field| escape_field(field))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Split one line into fields, honouring quotes.
fn parse_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    fields.push(finish_field(&mut current, field_was_quoted));
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if in_quotes {
        return Err("Unterminated quoted field".to_string());
    }
    fields.push(finish_field(&mut current, field_was_quoted));
    Ok(fields)
}

fn finish_field(current: &mut String, quoted: bool) -> String {
    let field = std::mem::take(current);
    if quoted { field } else { field.trim().to_string() }
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
