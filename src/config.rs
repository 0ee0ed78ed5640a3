use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_LOG_FILTER: &str = "roadmap_gantt=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Snapshot reopened on startup.
    pub last_snapshot: Option<PathBuf>,
    /// Web app root for "View product" links.
    pub product_base_url: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub collapse_all_by_default: bool,
    /// Visual floor for bar widths, in percent of the time axis.
    pub min_bar_width_pct: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            last_snapshot: None,
            product_base_url: "http://localhost:5173".into(),
            log_filter: DEFAULT_LOG_FILTER.into(),
            collapse_all_by_default: false,
            min_bar_width_pct: 2.0,
        }
    }
}

impl AppSettings {
    /// Load from the OS config directory, falling back to defaults.
    pub fn load() -> Self {
        let path = settings_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "using default settings");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)?;
        info!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// `{product_base_url}/products/{id}`
    pub fn product_url(&self, product_id: uuid::Uuid) -> String {
        format!("{}/products/{}", self.product_base_url.trim_end_matches('/'), product_id)
    }
}

/// `settings.json` in the platform config dir, or the working directory.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "RoadmapGantt") {
        proj_dirs.config_dir().join("settings.json")
    } else {
        PathBuf::from(".").join("settings.json")
    }
}
