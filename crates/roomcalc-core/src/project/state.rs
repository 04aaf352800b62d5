use roomcalc_engine::engine::{CalcConfig, Sheet, Summary};
use rust_decimal::Decimal;
use std::ops::Add;
use std::path::PathBuf;

/// Settings applied to every floor a project creates.
#[derive(Clone, Debug)]
pub struct ProjectSettings {
    pub calc: CalcConfig,
    /// Name prefix for floors created without an explicit name.
    pub default_floor_name: String,
    /// Rows in a freshly created floor.
    pub initial_rows: usize,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            calc: CalcConfig::default(),
            default_floor_name: "Floor".to_string(),
            initial_rows: 1,
        }
    }
}

/// Total, dwelling and economical area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AreaReport {
    pub total: Decimal,
    pub dwelling: Decimal,
    pub economical: Decimal,
}

impl From<Summary> for AreaReport {
    fn from(summary: Summary) -> Self {
        AreaReport {
            total: summary.total_area,
            dwelling: summary.dwelling_area,
            economical: summary.total_area - summary.dwelling_area,
        }
    }
}

impl Add for AreaReport {
    type Output = AreaReport;

    fn add(self, other: AreaReport) -> AreaReport {
        AreaReport {
            total: self.total + other.total,
            dwelling: self.dwelling + other.dwelling,
            economical: self.economical + other.economical,
        }
    }
}

/// One named sheet of a project.
#[derive(Clone, Debug)]
pub struct Floor {
    pub name: String,
    pub sheet: Sheet,
}

impl Floor {
    pub fn new(name: impl Into<String>, settings: &ProjectSettings) -> Floor {
        Floor {
            name: name.into(),
            sheet: Sheet::new(settings.calc.clone(), settings.initial_rows),
        }
    }

    pub fn report(&self) -> AreaReport {
        self.sheet.summary().into()
    }
}

/// UI-agnostic project: an ordered list of floors, one sheet each.
///
/// Floors share nothing but the settings they were created with; the
/// project-wide report is the sum of each floor's emitted summary.
#[derive(Clone, Debug)]
pub struct Project {
    pub(crate) floors: Vec<Floor>,
    pub(crate) active: usize,
    pub(crate) settings: ProjectSettings,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the project has been modified since load/save
    pub modified: bool,
}

impl Project {
    /// Create a project with a single empty floor.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new(settings: ProjectSettings) -> Self {
        let first = Floor::new(format!("{} 1", settings.default_floor_name), &settings);
        Project {
            floors: vec![first],
            active: 0,
            settings,
            file_path: None,
            modified: false,
        }
    }

    /// Create a project and load a file if provided.
    ///
    /// A path that does not exist yet becomes the save target.
    pub fn with_file(path: Option<PathBuf>, settings: ProjectSettings) -> crate::Result<Self> {
        let mut project = Self::new(settings);
        if let Some(p) = path {
            if p.exists() {
                project.load_file(&p)?;
            } else {
                project.file_path = Some(p);
            }
        }
        Ok(project)
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Project-wide report across every floor.
    pub fn totals(&self) -> AreaReport {
        self.floors
            .iter()
            .map(Floor::report)
            .fold(AreaReport::default(), Add::add)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(ProjectSettings::default())
    }
}
