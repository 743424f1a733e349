//! Transcoding targets: an ordered list of source matchers bound to one
//! output specification.

use serde::{Deserialize, Serialize};
use sf_core::{
    AudioCodec, AudioContainer, EncodingPreset, EncodingProfile, ImageContainer, PixelFormat,
    QualityMode, VideoCodec, VideoContainer,
};
use sf_probe::MetadataContainer;
use std::path::PathBuf;

use crate::matcher::{AudioSource, ImageSource, SourceMatcher, VideoSource};

/// Output-side behaviour shared by every target specification.
pub trait TargetSpec {
    /// Whether profiles deriving from the owning profile inherit this target.
    fn force_inheritance(&self) -> bool;
}

/// A named profile: the first of its `sources` that matches a probe selects
/// `target` as the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodingTarget<S, T> {
    /// Human-readable identifier, unique within its list by convention.
    #[serde(default)]
    pub name: String,
    /// Matchers tried in declaration order.
    #[serde(default)]
    pub sources: Vec<S>,
    /// Output specification.
    pub target: T,
    /// Custom transcoder for this profile, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcoder: Option<TranscoderOverride>,
}

pub type VideoTranscodingTarget = TranscodingTarget<VideoSource, VideoTarget>;
pub type AudioTranscodingTarget = TranscodingTarget<AudioSource, AudioTarget>;
pub type ImageTranscodingTarget = TranscodingTarget<ImageSource, ImageTarget>;

impl<S, T> TranscodingTarget<S, T> {
    /// Create a profile with no sources and no transcoder override.
    pub fn new(name: impl Into<String>, target: T) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            target,
            transcoder: None,
        }
    }

    /// Append a source matcher.
    pub fn with_source(mut self, source: S) -> Self {
        self.sources.push(source);
        self
    }

    /// Return the first source that matches the probe.
    pub fn matching_source(&self, probe: &MetadataContainer, ctx: S::Context) -> Option<&S>
    where
        S: SourceMatcher,
    {
        self.sources.iter().find(|s| s.matches(probe, ctx))
    }

    /// Whether derived profiles inherit this one.
    pub fn is_inherited(&self) -> bool
    where
        T: TargetSpec,
    {
        self.target.force_inheritance()
    }
}

/// External transcoder invocation for a single profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscoderOverride {
    /// Path to the transcoder binary.
    pub bin_path: PathBuf,
    /// Argument template passed to the binary.
    #[serde(default)]
    pub arguments: Option<String>,
}

// ---------------------------------------------------------------------------
// Output specifications
// ---------------------------------------------------------------------------

/// Requested video output. Unset fields keep the source value or fall back
/// to policy defaults when a job is planned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoTarget {
    pub container: Option<VideoContainer>,
    pub video_codec: Option<VideoCodec>,
    pub fourcc: Option<String>,
    pub aspect_ratio: Option<f32>,
    pub profile: Option<EncodingProfile>,
    pub level: Option<f32>,
    pub preset: Option<EncodingPreset>,
    pub quality: Option<QualityMode>,
    pub pixel_format: Option<PixelFormat>,
    /// Upper bound in kbit/s.
    pub max_video_bitrate: Option<u64>,
    pub max_video_height: Option<u32>,
    pub audio_codec: Option<AudioCodec>,
    /// Audio bitrate in kbit/s.
    pub audio_bitrate: Option<u64>,
    pub audio_frequency: Option<u32>,
    /// Transcode even when the matched source already satisfies the target.
    pub force_video_transcoding: bool,
    pub force_stereo: bool,
    /// Extra MP4 muxer flags.
    pub movflags: Option<String>,
    pub force_inheritance: bool,
}

impl TargetSpec for VideoTarget {
    fn force_inheritance(&self) -> bool {
        self.force_inheritance
    }
}

/// Requested audio output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioTarget {
    pub container: Option<AudioContainer>,
    pub codec: Option<AudioCodec>,
    /// Bitrate in kbit/s.
    pub bitrate: Option<u64>,
    pub frequency: Option<u32>,
    pub force_stereo: bool,
    pub force_inheritance: bool,
}

impl TargetSpec for AudioTarget {
    fn force_inheritance(&self) -> bool {
        self.force_inheritance
    }
}

/// Requested image output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTarget {
    pub container: Option<ImageContainer>,
    pub pixel_format: Option<PixelFormat>,
    pub quality: Option<QualityMode>,
    pub force_inheritance: bool,
}

impl TargetSpec for ImageTarget {
    fn force_inheritance(&self) -> bool {
        self.force_inheritance
    }
}
