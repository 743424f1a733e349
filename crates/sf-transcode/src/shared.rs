//! Process-wide holder for the current [`ProfileStore`].
//!
//! Writers replace the whole store; readers take an `Arc` snapshot and
//! resolve without holding any lock.

use parking_lot::RwLock;
use sf_core::{Error, Result};
use sf_probe::MetadataContainer;
use std::sync::Arc;

use crate::plan::{AudioTranscoding, ImageTranscoding, PlanOptions, VideoTranscoding};
use crate::registry::ProfileRegistry;
use crate::store::ProfileStore;

// ---------------------------------------------------------------------------
// SharedProfiles
// ---------------------------------------------------------------------------

/// The published profile store, swappable at runtime.
#[derive(Debug, Default)]
pub struct SharedProfiles {
    current: RwLock<Option<Arc<ProfileStore>>>,
}

impl SharedProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new store, returning the one it replaces.
    ///
    /// In-flight readers keep the snapshot they already hold.
    pub fn publish(&self, store: ProfileStore) -> Option<Arc<ProfileStore>> {
        let store = Arc::new(store);
        let previous = self.current.write().replace(store);
        tracing::info!(replaced = previous.is_some(), "Published profile store");
        previous
    }

    /// Whether a store has been published.
    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Current store, or [`Error::NotReady`] before the first publish.
    pub fn snapshot(&self) -> Result<Arc<ProfileStore>> {
        self.current.read().clone().ok_or(Error::NotReady)
    }

    /// Look up a profile in the current store.
    pub fn registry(&self, section: &str, profile: &str) -> Result<Arc<ProfileRegistry>> {
        self.snapshot()?.get(section, profile)
    }

    /// Plan a video transcode with the named profile.
    pub fn video_plan(
        &self,
        section: &str,
        profile: &str,
        probe: &MetadataContainer,
        preferred_audio_languages: &str,
        options: &PlanOptions,
    ) -> Result<Option<VideoTranscoding>> {
        let registry = self.registry(section, profile)?;
        Ok(registry.plan_video(probe, preferred_audio_languages, options))
    }

    /// Plan an audio transcode with the named profile.
    pub fn audio_plan(
        &self,
        section: &str,
        profile: &str,
        probe: &MetadataContainer,
        options: &PlanOptions,
    ) -> Result<Option<AudioTranscoding>> {
        let registry = self.registry(section, profile)?;
        Ok(registry.plan_audio(probe, options))
    }

    /// Plan an image conversion with the named profile.
    pub fn image_plan(
        &self,
        section: &str,
        profile: &str,
        probe: &MetadataContainer,
        options: &PlanOptions,
    ) -> Result<Option<ImageTranscoding>> {
        let registry = self.registry(section, profile)?;
        Ok(registry.plan_image(probe, options))
    }
}
