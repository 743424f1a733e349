//! Profile-wide policy: limits and defaults applied during resolution and
//! job planning.
//!
//! Every section implements `Default`, so `{}` deserializes to a usable
//! policy. Settings are immutable once a registry is published.

use serde::{Deserialize, Deserializer, Serialize};
use sf_core::{
    EncodingPreset, EncodingProfile, LevelCheck, QualityMode, SubtitleCodec, SubtitleSupport,
    VideoCodec,
};
use sf_probe::{MetadataContainer, SubtitleStream};

/// Policy settings for one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub video: VideoSettings,
    pub audio: AudioSettings,
    pub image: ImageSettings,
    pub subtitles: SubtitleSettings,
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Output height used when a target declares none.
    pub max_height: u32,
    pub quality: QualityMode,
    /// Generic quality factor for encoders without their own defaults.
    pub quality_factor: u32,
    /// How H.264 levels are compared by `min_level` constraints.
    pub h264_level_check: LevelCheck,
    #[serde(deserialize_with = "EncoderDefaults::deserialize_h262")]
    pub h262: EncoderDefaults,
    #[serde(deserialize_with = "EncoderDefaults::deserialize_h264")]
    pub h264: EncoderDefaults,
    #[serde(deserialize_with = "EncoderDefaults::deserialize_h265")]
    pub h265: EncoderDefaults,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            max_height: 1080,
            quality: QualityMode::Normal,
            quality_factor: 3,
            h264_level_check: LevelCheck::Any,
            h262: EncoderDefaults::h262(),
            h264: EncoderDefaults::h264(),
            h265: EncoderDefaults::h265(),
        }
    }
}

impl VideoSettings {
    /// Encoder defaults for the given output codec, if it has any.
    pub fn encoder_for(&self, codec: VideoCodec) -> Option<&EncoderDefaults> {
        match codec {
            VideoCodec::Mpeg2 => Some(&self.h262),
            VideoCodec::H264 => Some(&self.h264),
            VideoCodec::H265 => Some(&self.h265),
            _ => None,
        }
    }
}

/// Per-codec encoder defaults.
///
/// A settings document only names the fields it changes; the rest keep the
/// codec's own defaults rather than falling back to zero values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncoderDefaults {
    pub quality_factor: u32,
    pub preset: EncodingPreset,
    pub profile: EncodingProfile,
    pub level: Option<f32>,
}

/// Fields named in a settings document for one encoder.
#[derive(Deserialize)]
struct EncoderOverrides {
    quality_factor: Option<u32>,
    preset: Option<EncodingPreset>,
    profile: Option<EncodingProfile>,
    level: Option<f32>,
}

impl EncoderDefaults {
    pub fn h262() -> Self {
        Self {
            quality_factor: 3,
            preset: EncodingPreset::Default,
            profile: EncodingProfile::Main,
            level: None,
        }
    }

    pub fn h264() -> Self {
        Self {
            quality_factor: 23,
            preset: EncodingPreset::Medium,
            profile: EncodingProfile::High,
            level: Some(4.1),
        }
    }

    pub fn h265() -> Self {
        Self {
            quality_factor: 28,
            preset: EncodingPreset::Medium,
            profile: EncodingProfile::Main,
            level: Some(4.1),
        }
    }

    fn overridden(self, overrides: EncoderOverrides) -> Self {
        Self {
            quality_factor: overrides.quality_factor.unwrap_or(self.quality_factor),
            preset: overrides.preset.unwrap_or(self.preset),
            profile: overrides.profile.unwrap_or(self.profile),
            level: overrides.level.or(self.level),
        }
    }

    fn deserialize_h262<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::h262().overridden(EncoderOverrides::deserialize(deserializer)?))
    }

    fn deserialize_h264<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::h264().overridden(EncoderOverrides::deserialize(deserializer)?))
    }

    fn deserialize_h265<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::h265().overridden(EncoderOverrides::deserialize(deserializer)?))
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Bitrate in kbit/s used when a target declares none.
    pub default_bitrate: u64,
    /// Downmix to stereo unless a target says otherwise.
    pub default_stereo: bool,
    /// Which audio stream to use when language preferences do not decide.
    pub default_stream: DefaultAudioStream,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            default_bitrate: 192,
            default_stereo: true,
            default_stream: DefaultAudioStream::FirstIndex,
        }
    }
}

/// Fallback audio stream policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultAudioStream {
    /// The stream at position 0.
    #[default]
    FirstIndex,
    /// The stream flagged as default, else the one with the lowest index.
    Designated,
}

impl DefaultAudioStream {
    /// Pick the fallback stream position, or `None` when there is no audio.
    pub fn pick(self, probe: &MetadataContainer) -> Option<usize> {
        if probe.audio.is_empty() {
            return None;
        }
        match self {
            DefaultAudioStream::FirstIndex => Some(0),
            DefaultAudioStream::Designated => probe.first_audio_stream(),
        }
    }
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub max_width: u32,
    pub max_height: u32,
    /// Rotate images whose orientation tag says they are not upright.
    pub auto_rotate: bool,
    pub quality: QualityMode,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            auto_rotate: true,
            quality: QualityMode::Best,
        }
    }
}

// ---------------------------------------------------------------------------
// Subtitles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleSettings {
    pub mode: SubtitleSupport,
    /// Formats the client accepts. Empty accepts every format.
    pub supported: Vec<SubtitleFormat>,
}

impl SubtitleSettings {
    /// Mode reported to planned jobs. Burning subtitles in is not a stream
    /// the client receives, so it is reported as no subtitle support.
    pub fn effective_mode(&self) -> SubtitleSupport {
        match self.mode {
            SubtitleSupport::HardCoded => SubtitleSupport::None,
            mode => mode,
        }
    }

    pub fn accepts(&self, codec: SubtitleCodec) -> bool {
        self.supported.is_empty() || self.supported.iter().any(|f| f.format == codec)
    }

    /// Subtitle streams handed to the client alongside the output.
    pub fn deliverable(&self, streams: &[SubtitleStream]) -> Vec<SubtitleStream> {
        if self.effective_mode() == SubtitleSupport::None {
            return Vec::new();
        }
        streams
            .iter()
            .filter(|s| self.accepts(s.codec))
            .cloned()
            .collect()
    }
}

/// A subtitle format the client accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleFormat {
    pub format: SubtitleCodec,
    #[serde(default)]
    pub mime: Option<String>,
}
