//! CSV export of every floor with derived columns.

use crate::project::Project;
use crate::error::Result;
use roomcalc_engine::engine::{Column, MatrixShape};
use rust_decimal::Decimal;
use std::path::Path;

/// Export all floors to a CSV file.
pub fn write_csv(path: &Path, project: &Project) -> Result<()> {
    std::fs::write(path, write_csv_content(project))?;
    Ok(())
}

/// One header line, then `Floor, Room, Width, Length, Height, Area, Volume`
/// per grid row.
pub fn write_csv_content(project: &Project) -> String {
    let mut out = String::from("Floor");
    for col in Column::ALL {
        out.push(',');
        out.push_str(col.header());
    }
    out.push('\n');

    for floor in project.floors() {
        for row in floor.sheet.to_matrix(MatrixShape::Full) {
            let mut fields = vec![escape_csv_field(&floor.name)];
            fields.extend(row.iter().map(|field| escape_csv_field(field)));
            out.push_str(&fields.join(","));
            out.push('\n');
        }
    }
    out
}

/// Escape a field for CSV output.
fn escape_csv_field(field: &str) -> String {
    // Guard against CSV formula injection in spreadsheet apps. Plain numbers
    // such as a negative area pass through.
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    let is_number = field.parse::<Decimal>().is_ok();
    let safe_field = if !is_number && matches!(first_non_space, Some('=' | '+' | '-' | '@')) {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if safe_field.contains(',')
        || safe_field.contains('"')
        || safe_field.contains('\n')
        || safe_field.contains('\r')
    {
        format!("\"{}\"", safe_field.replace('"', "\"\""))
    } else {
        safe_field
    }
}
