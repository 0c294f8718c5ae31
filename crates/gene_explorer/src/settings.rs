//! User settings stored as YAML in the data directory.
//!
//! ```yaml
//! server:
//!   base_url: https://www.immunespace.org
//!   container: Studies/SDY269
//! explorer:
//!   retry_policy:
//!     mode: limited
//!     max_retries: 1
//! ui:
//!   cell_width_px: 8
//! ```

use std::path::{Path, PathBuf};

use gene_explorer_core::{ConfigError, ExplorerConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_FILE: &str = "config.yaml";

/// Environment variable that overrides `server.api_key`.
pub const API_KEY_ENV: &str = "GENE_EXPLORER_API_KEY";

const DEFAULT_BASE_URL: &str = "https://www.immunespace.org";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_saphyr::Error),
    #[error("invalid explorer settings: {0}")]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server root, e.g. `https://www.immunespace.org`
    pub base_url: String,
    /// Container (project/folder) path the explorer runs in
    pub container: String,
    pub api_key: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            container: String::new(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Approximate width of one terminal cell in pixels, used to size plots
    pub cell_width_px: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { cell_width_px: 8 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub explorer: ExplorerConfig,
    pub ui: UiSettings,
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Load `config.yaml` from `data_dir`, falling back to defaults when the
    /// file does not exist. The API key environment variable wins over the file.
    pub fn load(data_dir: &Path) -> Result<Self, SettingsError> {
        let path = data_dir.join(SETTINGS_FILE);
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
                path: path.clone(),
                source,
            })?;
            Self::from_yaml(&content)?
        } else {
            tracing::info!(path = %path.display(), "No settings file, using defaults");
            Self::default()
        };

        settings.apply_api_key(std::env::var(API_KEY_ENV).ok());
        settings.explorer.validate()?;
        Ok(settings)
    }

    fn apply_api_key(&mut self, from_env: Option<String>) {
        if let Some(key) = from_env.filter(|k| !k.trim().is_empty()) {
            self.server.api_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gene_explorer_core::RetryPolicy;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.server.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.explorer, ExplorerConfig::default());
        assert_eq!(settings.ui.cell_width_px, 8);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            "server:\n  container: Studies/SDY269\nexplorer:\n  retry_policy:\n    mode: unbounded\n",
        )
        .unwrap();

        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.server.container, "Studies/SDY269");
        assert_eq!(settings.server.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.explorer.retry_policy, RetryPolicy::Unbounded);
        assert_eq!(settings.explorer.max_image_px, 800);
    }

    #[test]
    fn test_invalid_text_size_bounds_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            "explorer:\n  text_size:\n    min: 10\n    max: 5\n    default: 7\n",
        )
        .unwrap();

        let err = Settings::load(dir.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "server: [unterminated\n").unwrap();

        let err = Settings::load(dir.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_env_api_key_overrides_file() {
        let mut settings = Settings::default();
        settings.server.api_key = Some("from-file".to_string());

        settings.apply_api_key(Some(String::new()));
        assert_eq!(settings.server.api_key.as_deref(), Some("from-file"));

        settings.apply_api_key(Some("from-env".to_string()));
        assert_eq!(settings.server.api_key.as_deref(), Some("from-env"));
    }
}
