//! Project settings for snapkeep
//!
//! Settings live in a `.snapkeep.json` file at the project root. Every field
//! has a default, so projects without a settings file get the stock exclusion
//! list and retention policy.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapkeepError;

/// Name of the optional per-project settings file
pub const SETTINGS_FILE: &str = ".snapkeep.json";

/// Project settings for snapkeep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Exclusion patterns applied to paths relative to the project root
    #[serde(default = "default_exclude_patterns")]
    pub exclude: Vec<String>,

    /// Number of prior snapshots to keep during retention cleanup
    #[serde(default = "default_retention_limit")]
    pub retention_limit: usize,

    /// Files whose presence in both source and snapshot is verified
    #[serde(default = "default_key_files")]
    pub key_files: Vec<String>,

    /// Directories whose presence in both source and snapshot is verified
    #[serde(default = "default_key_dirs")]
    pub key_dirs: Vec<String>,

    /// File that must exist at the project root before anything is touched
    #[serde(default = "default_marker_file")]
    pub marker_file: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_retention_limit() -> usize {
    10
}

fn default_marker_file() -> String {
    "package.json".to_string()
}

fn default_key_files() -> Vec<String> {
    vec!["package.json".to_string(), "turbo.json".to_string()]
}

fn default_key_dirs() -> Vec<String> {
    vec![
        "apps".to_string(),
        "packages".to_string(),
        "scripts".to_string(),
    ]
}

fn default_exclude_patterns() -> Vec<String> {
    [
        // Dependencies and build artifacts
        "node_modules",
        ".next",
        "dist",
        "build",
        ".turbo",
        // Cache directories
        ".cache",
        ".npm",
        ".yarn",
        // IDE and OS files
        ".vscode/settings.json",
        ".idea",
        ".DS_Store",
        "Thumbs.db",
        "*.swp",
        "*.swo",
        "*~",
        // Logs
        "*.log",
        "logs",
        "npm-debug.log*",
        "yarn-debug.log*",
        "yarn-error.log*",
        "lerna-debug.log*",
        // Runtime and temporary files
        ".env.local",
        ".env.*.local",
        "coverage",
        ".nyc_output",
        ".tmp",
        ".temp",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            exclude: default_exclude_patterns(),
            retention_limit: default_retention_limit(),
            key_files: default_key_files(),
            key_dirs: default_key_dirs(),
            marker_file: default_marker_file(),
        }
    }
}

impl Settings {
    /// Load settings from the project root, or fall back to defaults if no
    /// settings file exists
    pub fn load_or_default(project_root: &Path) -> Result<Self, SnapkeepError> {
        let settings_path = project_root.join(SETTINGS_FILE);

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SnapkeepError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| SnapkeepError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the project root
    pub fn save(&self, project_root: &Path) -> Result<(), SnapkeepError> {
        let settings_path = project_root.join(SETTINGS_FILE);
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SnapkeepError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| SnapkeepError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.retention_limit, 10);
        assert_eq!(settings.marker_file, "package.json");
        assert!(settings.exclude.contains(&"node_modules".to_string()));
        assert!(settings.exclude.contains(&"*.log".to_string()));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(settings.retention_limit, 10);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();

        let mut settings = Settings::default();
        settings.retention_limit = 3;
        settings.exclude = vec!["target".to_string()];
        settings.save(temp_dir.path()).unwrap();

        let loaded = Settings::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(loaded.retention_limit, 3);
        assert_eq!(loaded.exclude, vec!["target".to_string()]);
    }

    #[test]
    fn test_partial_settings_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{"retention_limit": 2}"#,
        )
        .unwrap();

        let settings = Settings::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(settings.retention_limit, 2);
        assert!(settings.exclude.contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_malformed_settings_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(SETTINGS_FILE), "not json").unwrap();

        let err = Settings::load_or_default(temp_dir.path()).unwrap_err();
        assert!(matches!(err, SnapkeepError::Config(_)));
    }
}
