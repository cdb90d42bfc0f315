use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

/// File-name conventions for edited documents.
///
/// Suffixes are appended to the source file stem; `merged` is a full name
/// because a merge has no single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNames {
    pub extracted: String,
    pub trimmed: String,
    pub rearranged: String,
    pub expanded: String,
    pub merged: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            extracted: "_extracted".to_string(),
            trimmed: "_trimmed".to_string(),
            rearranged: "_rearranged".to_string(),
            expanded: "_expanded".to_string(),
            merged: "merged_file.pdf".to_string(),
        }
    }
}

/// Editor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Directory edited files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Compress content streams of written files
    #[serde(default = "default_true")]
    pub compress: bool,

    /// Output file naming
    #[serde(default)]
    pub names: OutputNames,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

const fn default_true() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            compress: true,
            names: OutputNames::default(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject names that would escape the output directory or be empty.
    pub fn validate(&self) -> Result<(), Error> {
        let names = &self.names;
        let suffixes = [
            ("names.extracted", &names.extracted),
            ("names.trimmed", &names.trimmed),
            ("names.rearranged", &names.rearranged),
            ("names.expanded", &names.expanded),
        ];
        for (field, value) in suffixes {
            if value.contains(['/', '\\']) {
                return Err(Error::ConfigInvalid {
                    field: field.to_string(),
                    reason: format!("'{value}' must not contain path separators"),
                });
            }
        }

        if names.merged.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                field: "names.merged".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if names.merged.contains(['/', '\\']) {
            return Err(Error::ConfigInvalid {
                field: "names.merged".to_string(),
                reason: format!("'{}' must not contain path separators", names.merged),
            });
        }

        Ok(())
    }

    /// Load from default locations (~/.config/pdf-pages/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("pdf-pages").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}
