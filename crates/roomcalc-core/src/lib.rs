//! roomcalc-core - UI-agnostic project model + storage.

pub mod error;
pub mod project;
pub mod storage;

pub use error::{Result, RoomcalcError};
pub use project::{AreaReport, Floor, Project, ProjectSettings};

pub use roomcalc_engine::engine::{CalcConfig, CellPos, Column, Sheet, Summary};
