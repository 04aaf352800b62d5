use super::{Floor, Project};
use crate::error::{Result, RoomcalcError};
use roomcalc_engine::engine::{CellPos, Sheet, Summary};
use tracing::debug;

impl Project {
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn floor(&self, index: usize) -> Result<&Floor> {
        let len = self.floors.len();
        self.floors
            .get(index)
            .ok_or(RoomcalcError::FloorOutOfRange { index, len })
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_floor(&self) -> &Floor {
        &self.floors[self.active]
    }

    pub fn active_sheet(&self) -> &Sheet {
        &self.active_floor().sheet
    }

    /// Direct access to the active sheet. Changes made through it do not
    /// set the modified flag.
    pub fn active_sheet_mut(&mut self) -> &mut Sheet {
        &mut self.floors[self.active].sheet
    }

    pub fn set_active(&mut self, index: usize) -> Result<()> {
        self.floor(index)?;
        self.active = index;
        Ok(())
    }

    /// Cycle the active floor forward (or backward) with wrap-around.
    pub fn cycle_active(&mut self, forward: bool) -> usize {
        let len = self.floors.len();
        self.active = if forward {
            (self.active + 1) % len
        } else {
            (self.active + len - 1) % len
        };
        self.active
    }

    /// Append a new floor and make it active. An empty name picks the next
    /// default name.
    pub fn add_floor(&mut self, name: &str) -> usize {
        let name = if name.trim().is_empty() {
            format!(
                "{} {}",
                self.settings.default_floor_name,
                self.floors.len() + 1
            )
        } else {
            name.trim().to_string()
        };
        debug!(floor = %name, "adding floor");
        self.floors.push(Floor::new(name, &self.settings));
        self.active = self.floors.len() - 1;
        self.modified = true;
        self.active
    }

    /// Remove a floor. The last remaining floor cannot be removed.
    pub fn remove_floor(&mut self, index: usize) -> Result<Floor> {
        self.floor(index)?;
        if self.floors.len() == 1 {
            return Err(RoomcalcError::LastFloor);
        }
        let removed = self.floors.remove(index);
        if self.active > index || self.active == self.floors.len() {
            self.active -= 1;
        }
        self.modified = true;
        Ok(removed)
    }

    pub fn rename_floor(&mut self, index: usize, name: &str) -> Result<()> {
        let len = self.floors.len();
        let floor = self
            .floors
            .get_mut(index)
            .ok_or(RoomcalcError::FloorOutOfRange { index, len })?;
        let name = name.trim();
        if !name.is_empty() && floor.name != name {
            floor.name = name.to_string();
            self.modified = true;
        }
        Ok(())
    }

    /// Edit a cell on the active floor.
    pub fn edit(&mut self, row: usize, col: usize, text: &str) -> Result<Option<Summary>> {
        let summary = self.active_sheet_mut().edit(row, col, text)?;
        if summary.is_some() {
            self.modified = true;
        }
        Ok(summary)
    }

    pub fn insert_row_after(&mut self, index: usize) -> Result<Summary> {
        let summary = self.active_sheet_mut().insert_row_after(index)?;
        self.modified = true;
        Ok(summary)
    }

    pub fn append_row(&mut self) -> Result<Summary> {
        let summary = self.active_sheet_mut().append_row()?;
        self.modified = true;
        Ok(summary)
    }

    pub fn set_row_count(&mut self, count: usize) -> Result<Summary> {
        let summary = self.active_sheet_mut().set_row_count(count)?;
        self.modified = true;
        Ok(summary)
    }

    /// Remove rows from the active floor; returns the re-selected cell.
    pub fn remove_rows(&mut self, indices: &[usize]) -> Result<Option<CellPos>> {
        let before = self.active_sheet().row_count();
        let pos = self.active_sheet_mut().remove_rows(indices)?;
        if self.active_sheet().row_count() != before {
            self.modified = true;
        }
        Ok(pos)
    }

    pub fn select<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = CellPos>,
    {
        self.active_sheet_mut().select(cells);
    }
}
