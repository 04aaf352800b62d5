//! User configuration (`config.toml`).
//!
//! Every problem with the file becomes a warning and the defaults are used
//! instead; a bad config never stops the program.

use directories::ProjectDirs;
use roomcalc_core::ProjectSettings;
use roomcalc_engine::engine::CalcConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const DEFAULT_COLUMN_WIDTH: usize = 10;
const MIN_COLUMN_WIDTH: usize = 4;
const MAX_COLUMN_WIDTH: usize = 40;
const MAX_INITIAL_ROWS: usize = 1_000;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub engine: CalcConfig,
    pub display: DisplayConfig,
    pub project: ProjectConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub column_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub default_floor_name: String,
    pub initial_rows: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let settings = ProjectSettings::default();
        ProjectConfig {
            default_floor_name: settings.default_floor_name,
            initial_rows: settings.initial_rows,
        }
    }
}

impl Config {
    pub fn project_settings(&self) -> ProjectSettings {
        ProjectSettings {
            calc: self.engine.clone(),
            default_floor_name: self.project.default_floor_name.clone(),
            initial_rows: self.project.initial_rows,
        }
    }

    /// Clamp out-of-range values, reporting each one.
    fn sanitize(mut self, warnings: &mut Vec<String>) -> Config {
        let width = self
            .display
            .column_width
            .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        if width != self.display.column_width {
            warnings.push(format!(
                "display.column_width {} out of range, using {}",
                self.display.column_width, width
            ));
            self.display.column_width = width;
        }
        if self.project.initial_rows > MAX_INITIAL_ROWS {
            warnings.push(format!(
                "project.initial_rows {} too large, using {}",
                self.project.initial_rows, MAX_INITIAL_ROWS
            ));
            self.project.initial_rows = MAX_INITIAL_ROWS;
        }
        if self.project.default_floor_name.trim().is_empty() {
            warnings.push("project.default_floor_name is empty, using default".to_string());
            self.project.default_floor_name = ProjectConfig::default().default_floor_name;
        }
        if self.engine.dwelling_markers.is_empty() {
            warnings.push("engine.dwelling_markers is empty; no row will count as dwelling".to_string());
        }
        self
    }
}

/// Load the config from `explicit`, or from the user config dir.
///
/// Returns the config and any warnings produced while reading it.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let path = explicit.map(Path::to_path_buf).or_else(user_config_path);

    let Some(path) = path else {
        return (Config::default(), warnings);
    };
    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match read_config(&path) {
        Ok(config) => config.sanitize(&mut warnings),
        Err(message) => {
            warnings.push(message);
            Config::default()
        }
    };
    (config, warnings)
}

fn read_config(path: &Path) -> Result<Config, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    parse_config(&content).map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "roomcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
