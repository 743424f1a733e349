//! Named profiles grouped by section, with inheritance between profiles of
//! the same section.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sf_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::registry::ProfileRegistry;
use crate::settings::PolicySettings;
use crate::target::{
    AudioTranscodingTarget, ImageTranscodingTarget, TargetSpec, TranscodingTarget,
    VideoTranscodingTarget,
};

/// A profile as written in a definition file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    /// Profile name, unique within its section.
    pub id: String,
    /// Profile in the same section to inherit from. Must be defined earlier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_profile: Option<String>,
    /// Settings overrides in [`PolicySettings`] shape. Only the fields named
    /// here replace the base profile's settings (or the defaults).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default)]
    pub video_targets: Vec<VideoTranscodingTarget>,
    #[serde(default)]
    pub audio_targets: Vec<AudioTranscodingTarget>,
    #[serde(default)]
    pub image_targets: Vec<ImageTranscodingTarget>,
}

/// Top-level shape of a profile definition file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub profiles: Vec<ProfileDefinition>,
}

/// Built registries keyed by section, then by profile name.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    sections: HashMap<String, HashMap<String, Arc<ProfileRegistry>>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile, replacing any existing one with the same name.
    pub fn add_profile(&mut self, section: &str, name: &str, registry: ProfileRegistry) {
        let profiles = self.sections.entry(section.to_string()).or_default();
        if profiles
            .insert(name.to_string(), Arc::new(registry))
            .is_some()
        {
            tracing::warn!(section, profile = name, "Profile overridden by a later definition");
        } else {
            tracing::debug!(section, profile = name, "Profile registered");
        }
    }

    /// Remove every profile of a section.
    pub fn clear_section(&mut self, section: &str) {
        if let Some(profiles) = self.sections.remove(section) {
            tracing::debug!(section, removed = profiles.len(), "Section cleared");
        }
    }

    pub fn contains(&self, section: &str, name: &str) -> bool {
        self.sections
            .get(section)
            .is_some_and(|profiles| profiles.contains_key(name))
    }

    /// Look up a profile by section and name.
    pub fn get(&self, section: &str, name: &str) -> Result<Arc<ProfileRegistry>> {
        let profiles = self
            .sections
            .get(section)
            .ok_or_else(|| Error::not_found("section", section))?;
        profiles
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found("profile", format!("{section}/{name}")))
    }

    /// Profile names in a section, sorted.
    pub fn profile_names(&self, section: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .sections
            .get(section)
            .map(|profiles| profiles.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Section names, sorted.
    pub fn sections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build and register definitions in order. Returns how many were added.
    ///
    /// Definitions are applied one by one, so a base profile must appear
    /// before the profiles that inherit from it. On error, definitions
    /// before the failing one stay registered.
    pub fn load_definitions(
        &mut self,
        section: &str,
        definitions: Vec<ProfileDefinition>,
    ) -> Result<usize> {
        let mut added = 0;
        for definition in definitions {
            let id = definition.id.trim().to_string();
            if id.is_empty() {
                return Err(Error::Validation(format!(
                    "profile definition #{} in section '{section}' has no id",
                    added + 1
                )));
            }
            let registry = self.build_registry(section, definition)?;
            self.add_profile(section, &id, registry);
            added += 1;
        }
        Ok(added)
    }

    /// Parse a definition file body and register its profiles.
    pub fn load_json(&mut self, section: &str, json: &str) -> Result<usize> {
        let file = crate::deserialize_profiles(json)
            .map_err(|e| Error::Validation(format!("profile definitions parse error: {e}")))?;
        self.load_definitions(section, file.profiles)
    }

    /// Read a definition file and register its profiles.
    pub fn load_file(&mut self, section: &str, path: &Path) -> Result<usize> {
        let contents = std::fs::read_to_string(path)?;
        let added = self.load_json(section, &contents)?;
        tracing::info!(section, path = %path.display(), added, "Loaded profile definitions");
        Ok(added)
    }

    fn build_registry(
        &self,
        section: &str,
        definition: ProfileDefinition,
    ) -> Result<ProfileRegistry> {
        let base = match definition.base_profile.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(base_name) => Some(self.get(section, base_name).map_err(|_| {
                Error::Validation(format!(
                    "profile '{}' inherits from undefined base profile '{base_name}'",
                    definition.id
                ))
            })?),
        };

        let settings = match (definition.settings, &base) {
            (None, Some(base)) => base.settings.clone(),
            (None, None) => PolicySettings::default(),
            (Some(own), base) => {
                let inherited = base.as_ref().map(|b| &b.settings);
                merge_settings(inherited, own).map_err(|e| {
                    Error::Validation(format!(
                        "profile '{}' has invalid settings: {e}",
                        definition.id
                    ))
                })?
            }
        };

        let mut registry = ProfileRegistry {
            settings,
            video_targets: definition.video_targets,
            audio_targets: definition.audio_targets,
            image_targets: definition.image_targets,
        };

        if let Some(base) = base {
            inherit(&mut registry.video_targets, &base.video_targets);
            inherit(&mut registry.audio_targets, &base.audio_targets);
            inherit(&mut registry.image_targets, &base.image_targets);
        }

        for warning in registry.validate() {
            tracing::warn!(section, profile = %definition.id, "{warning}");
        }

        Ok(registry)
    }
}

/// Overlay `own` onto the inherited settings (or the defaults), one field at
/// a time.
fn merge_settings(
    inherited: Option<&PolicySettings>,
    own: Value,
) -> serde_json::Result<PolicySettings> {
    let mut merged = match inherited {
        Some(settings) => serde_json::to_value(settings)?,
        None => serde_json::to_value(PolicySettings::default())?,
    };
    overlay(&mut merged, own);
    serde_json::from_value(merged)
}

fn overlay(into: &mut Value, from: Value) {
    match (into, from) {
        (Value::Object(into), Value::Object(from)) => {
            for (key, value) in from {
                match into.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        into.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Append the base profiles flagged for inheritance after the own ones.
fn inherit<S: Clone, T: Clone + TargetSpec>(
    own: &mut Vec<TranscodingTarget<S, T>>,
    base: &[TranscodingTarget<S, T>],
) {
    own.extend(base.iter().filter(|p| p.is_inherited()).cloned());
}
