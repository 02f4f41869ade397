//! Project settings file.
//!
//! ```yaml
//! model: Coil
//! workers: 8
//! engine:
//!   program: femm-bridge
//!   args: ["--quiet"]
//!   working_dir: C:/work/coil
//! ```

use std::path::{Path, PathBuf};

use femm_core::EngineConfig;

/// Configuration stored in `femm.yaml`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    /// Registry name of the model used by `pre`, `solve` and `post`
    pub model: String,
    pub engine: EngineConfig,
    /// Sweep pool size; defaults to CPU count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), model = %settings.model, "settings loaded");
        Ok(settings)
    }
}
