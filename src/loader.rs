//! Loading probe results and profile definitions from disk.

use anyhow::{bail, Context, Result};
use sf_core::config::Config;
use sf_probe::MetadataContainer;
use sf_transcode::{ProfileStore, SharedProfiles};
use std::path::Path;

/// Read a probe result written as JSON.
pub fn load_probe(path: &Path) -> Result<MetadataContainer> {
    if !path.exists() {
        bail!("Probe file does not exist: {:?}", path);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read probe file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid probe file {}", path.display()))
}

/// Load the configured profile definitions into a fresh store.
///
/// `override_path` takes precedence over `profiles.path` from the config.
/// Definitions are registered under `profiles.section`.
pub fn load_store(config: &Config, override_path: Option<&Path>) -> Result<ProfileStore> {
    let Some(path) = override_path.or(config.profiles.path.as_deref()) else {
        bail!("No profile definitions: pass --profiles or set profiles.path in the config");
    };

    let mut store = ProfileStore::new();
    store
        .load_file(&config.profiles.section, path)
        .with_context(|| format!("failed to load profiles from {}", path.display()))?;
    Ok(store)
}

/// Load the configured profile definitions and publish them.
pub fn load_shared(config: &Config, override_path: Option<&Path>) -> Result<SharedProfiles> {
    let shared = SharedProfiles::new();
    shared.publish(load_store(config, override_path)?);
    Ok(shared)
}
