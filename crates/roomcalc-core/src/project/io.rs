use super::{Floor, Project};
use crate::error::{Result, RoomcalcError};
use crate::storage::{
    ExportFormat, FileFormat, FloorData, read_flat, read_project, write_csv, write_flat,
    write_markdown, write_project,
};
use roomcalc_engine::engine::{MatrixShape, Sheet};
use std::path::{Path, PathBuf};
use tracing::info;

impl Project {
    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(RoomcalcError::NoFilePath);
        };
        self.write_to(&path)?;
        self.modified = false;
        Ok(path)
    }

    /// Save to `path` and make it the current file path.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.write_to(path)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(path.to_path_buf())
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        match FileFormat::from_path(path)? {
            FileFormat::Flat => {
                if self.floors.len() > 1 {
                    return Err(RoomcalcError::FlatFormatFloors(self.floors.len()));
                }
                write_flat(path, &self.active_sheet().to_matrix(MatrixShape::Raw))?;
            }
            FileFormat::Project => write_project(path, &self.floor_data())?,
        }
        info!(path = %path.display(), floors = self.floors.len(), "saved project");
        Ok(())
    }

    /// Load from file.
    ///
    /// Every floor is rebuilt before anything is replaced, so a failure
    /// leaves the current project untouched.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let decoded = match FileFormat::from_path(path)? {
            FileFormat::Flat => vec![FloorData {
                name: self.next_default_name(0),
                rows: read_flat(path)?,
            }],
            FileFormat::Project => read_project(path, &self.settings.default_floor_name)?,
        };

        let mut floors = Vec::with_capacity(decoded.len().max(1));
        for data in decoded {
            let mut sheet = Sheet::new(self.settings.calc.clone(), 0);
            sheet.load_matrix(&data.rows)?;
            floors.push(Floor {
                name: data.name,
                sheet,
            });
        }
        if floors.is_empty() {
            floors.push(Floor::new(self.next_default_name(0), &self.settings));
        }

        info!(path = %path.display(), floors = floors.len(), "loaded project");
        self.floors = floors;
        self.active = 0;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Export every floor; the format follows the file extension.
    pub fn export(&self, path: &Path) -> Result<ExportFormat> {
        let format = ExportFormat::from_path(path)?;
        match format {
            ExportFormat::Markdown => self.export_markdown(path)?,
            ExportFormat::Csv => self.export_csv(path)?,
        }
        Ok(format)
    }

    pub fn export_markdown(&self, path: &Path) -> Result<()> {
        write_markdown(path, self)?;
        info!(path = %path.display(), "exported markdown");
        Ok(())
    }

    pub fn export_csv(&self, path: &Path) -> Result<()> {
        write_csv(path, self)?;
        info!(path = %path.display(), "exported csv");
        Ok(())
    }

    /// Every floor as a six-column matrix.
    pub fn floor_data(&self) -> Vec<FloorData> {
        self.floors
            .iter()
            .map(|floor| FloorData {
                name: floor.name.clone(),
                rows: floor.sheet.to_matrix(MatrixShape::Full),
            })
            .collect()
    }

    fn next_default_name(&self, index: usize) -> String {
        format!("{} {}", self.settings.default_floor_name, index + 1)
    }
}
