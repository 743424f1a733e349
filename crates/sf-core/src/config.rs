//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! sub-configs for profile loading and client language preferences. Every
//! section defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profiles: ProfilesConfig,
    pub languages: LanguageConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.profiles.path.is_none() {
            warnings.push(
                "profiles.path is not set; resolving plans requires --profiles".into(),
            );
        }
        if self.profiles.section.trim().is_empty() {
            warnings.push("profiles.section is empty".into());
        }
        if self.profiles.default_profile.trim().is_empty() {
            warnings.push("profiles.default_profile is empty".into());
        }

        let langs = &self.languages.preferred_audio;
        if !langs.is_empty() && langs.split(',').any(|l| l.trim().is_empty()) {
            warnings.push(format!(
                "languages.preferred_audio '{langs}' contains empty entries; they are ignored"
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Where profile definitions come from and which one is used by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// JSON file with profile definitions.
    pub path: Option<PathBuf>,
    /// Section the definitions are registered under.
    pub section: String,
    /// Profile used when a client does not name one.
    pub default_profile: String,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            path: None,
            section: "default".into(),
            default_profile: "generic".into(),
        }
    }
}

/// Client language preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Comma-separated audio language codes, highest priority first.
    pub preferred_audio: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            preferred_audio: "EN".into(),
        }
    }
}
