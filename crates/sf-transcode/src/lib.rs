//! # sf-transcode
//!
//! Transcoding target resolution for media delivery.
//!
//! Given a probed media item and a client profile, this crate decides which
//! output (if any) the item must be converted to before it can be delivered.
//! "No profile" means the item is already compatible and can be streamed as
//! is.
//!
//! ## Overview
//!
//! - [`VideoSource`], [`AudioSource`], [`ImageSource`] -- conjunctive
//!   constraints over a probe, behind the [`SourceMatcher`] trait.
//! - [`TranscodingTarget`] -- a named profile: ordered sources plus one
//!   output specification.
//! - [`PolicySettings`] -- limits and defaults shared by a profile.
//! - [`ProfileRegistry`] -- first-match resolution over ordered profiles.
//! - [`ProfileStore`] / [`SharedProfiles`] -- named profiles by section,
//!   inheritance, and the published snapshot readers resolve against.
//! - [`plan`] -- parameter records for the transcoder.

pub mod language;
pub mod matcher;
pub mod plan;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod shared;
pub mod store;
pub mod target;

pub use matcher::{AudioSource, ImageSource, SourceMatcher, VideoContext, VideoSource};
pub use plan::{
    live_audio, live_video, AudioTranscoding, ImageTranscoding, PlanOptions, VideoTranscoding,
};
pub use registry::ProfileRegistry;
pub use resolver::{AudioMatch, ImageMatch, VideoMatch};
pub use settings::{
    AudioSettings, DefaultAudioStream, EncoderDefaults, ImageSettings, PolicySettings,
    SubtitleFormat, SubtitleSettings, VideoSettings,
};
pub use shared::SharedProfiles;
pub use store::{ProfileDefinition, ProfileFile, ProfileStore};
pub use target::{
    AudioTarget, AudioTranscodingTarget, ImageTarget, ImageTranscodingTarget, TranscoderOverride,
    TranscodingTarget, VideoTarget, VideoTranscodingTarget,
};

/// Serialize a profile definition file to a pretty-printed JSON string.
pub fn serialize_profiles_pretty(file: &ProfileFile) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(file)
}

/// Deserialize a profile definition file from a JSON string.
pub fn deserialize_profiles(json: &str) -> Result<ProfileFile, serde_json::Error> {
    serde_json::from_str(json)
}
