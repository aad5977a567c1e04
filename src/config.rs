//! Editor settings, persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::states::{Mode, Side};

pub const DEFAULT_LOG_FILTER: &str = "dialogue_editor=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Mode new states open in.
    pub initial_mode: Mode,
    /// Sides endpoint schemas may use.
    pub sides: Vec<Side>,
    pub log_filter: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            initial_mode: Mode::Preview,
            sides: Side::default_set(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Writes the default settings to `path` unless a file is already there.
pub fn ensure_settings_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&EditorSettings::default())
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(())
}

/// `None` when the file is missing or malformed; callers fall back to
/// `EditorSettings::default()`.
pub fn load_settings(path: &Path) -> Option<EditorSettings> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid settings file");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
