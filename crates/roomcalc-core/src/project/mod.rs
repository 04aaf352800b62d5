//! Project state and logic (UI-agnostic).

mod io;
mod ops;
mod state;

pub use state::{AreaReport, Floor, Project, ProjectSettings};
