//! Markdown export functionality

use crate::project::{AreaReport, Project};
use crate::error::Result;
use roomcalc_engine::engine::{Column, MatrixShape, format_fixed};
use std::fmt::Write;
use std::path::Path;

/// Write the project to a markdown file
pub fn write_markdown(path: &Path, project: &Project) -> Result<()> {
    std::fs::write(path, write_markdown_content(project))?;
    Ok(())
}

/// One section per floor with its rows and report; a closing totals section
/// when there is more than one floor.
pub fn write_markdown_content(project: &Project) -> String {
    let mut out = String::from("# Rooms\n");

    for floor in project.floors() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", escape_markdown(&floor.name));
        let _ = writeln!(out);

        out.push('|');
        for col in Column::ALL {
            let _ = write!(out, " {} |", col.header());
        }
        out.push('\n');
        out.push('|');
        for _ in Column::ALL {
            out.push_str("---|");
        }
        out.push('\n');

        for row in floor.sheet.to_matrix(MatrixShape::Full) {
            out.push('|');
            for field in &row {
                let _ = write!(out, " {} |", escape_markdown(field));
            }
            out.push('\n');
        }

        let _ = writeln!(out);
        write_report(&mut out, &floor.report());
    }

    if project.floor_count() > 1 {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Totals");
        let _ = writeln!(out);
        write_report(&mut out, &project.totals());
    }
    out
}

fn write_report(out: &mut String, report: &AreaReport) {
    let _ = writeln!(out, "- Total area: {}", format_fixed(report.total, 1));
    let _ = writeln!(out, "- Dwelling area: {}", format_fixed(report.dwelling, 1));
    let _ = writeln!(out, "- Economical area: {}", format_fixed(report.economical, 1));
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
