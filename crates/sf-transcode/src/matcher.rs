//! Source matchers that evaluate against [`MetadataContainer`].
//!
//! Each matcher is a conjunction of optional constraints; a constraint left
//! unset is a wildcard. A constraint on a value the probe does not report
//! (an unknown bitrate, a missing stream) does not hold.

use serde::{Deserialize, Serialize};
use sf_core::{
    AudioCodec, AudioContainer, EncodingProfile, ImageContainer, LevelCheck, PixelFormat,
    VideoCodec, VideoContainer,
};
use sf_probe::{AudioStream, MetadataContainer, VideoStream};

use crate::target::{AudioTarget, ImageTarget, VideoTarget};

/// Tolerance for aspect-ratio comparisons.
const RATIO_EPSILON: f32 = 0.01;

/// Capability shared by all source matchers.
pub trait SourceMatcher {
    /// Per-request data the matcher needs besides the probe.
    type Context: Copy;
    /// Output specification this matcher is paired with.
    type Target;

    /// Whether the probe satisfies every declared constraint.
    fn matches(&self, probe: &MetadataContainer, ctx: Self::Context) -> bool;

    /// Whether any source matched by `self` already has the output `target`
    /// asks for, so transcoding it would be a no-op.
    fn describes(&self, target: &Self::Target) -> bool;
}

/// Context for video matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoContext {
    /// Position of the selected audio stream, if the probe has audio.
    pub audio_stream: Option<usize>,
    /// Which H.264 level to compare against `min_level`.
    pub level_check: LevelCheck,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn allows<T: PartialEq>(want: Option<T>, have: T) -> bool {
    want.map_or(true, |w| w == have)
}

fn within<T: PartialOrd>(limit: Option<T>, have: Option<T>) -> bool {
    limit.map_or(true, |max| have.is_some_and(|v| v <= max))
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < RATIO_EPSILON
}

/// Target declares nothing, or the matcher pins exactly the same value.
fn pinned<T: PartialEq>(target: Option<T>, source: Option<T>) -> bool {
    target.is_none() || target == source
}

/// Target declares no bound, or the matcher already enforces a tighter one.
fn bounded<T: PartialOrd>(target: Option<T>, source: Option<T>) -> bool {
    match (target, source) {
        (None, _) => true,
        (Some(t), Some(s)) => s <= t,
        (Some(_), None) => false,
    }
}

/// The level a video stream is judged by under the given check.
fn effective_level(video: &VideoStream, check: LevelCheck) -> Option<f32> {
    match check {
        LevelCheck::Header => video.header_level,
        LevelCheck::Reference => video.ref_level,
        LevelCheck::Any => match (video.header_level, video.ref_level) {
            (Some(h), Some(r)) => Some(h.max(r)),
            (h, r) => h.or(r),
        },
    }
}

fn is_square(video: &VideoStream) -> bool {
    video
        .pixel_aspect_ratio
        .map_or(true, |par| approx_eq(par, 1.0))
}

fn is_multichannel(audio: &AudioStream) -> bool {
    audio.channels > 2
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// Constraints on a video item, its primary video stream and the selected
/// audio stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSource {
    pub container: Option<VideoContainer>,
    pub video_codec: Option<VideoCodec>,
    /// Case-insensitive FourCC.
    pub fourcc: Option<String>,
    pub aspect_ratio: Option<f32>,
    pub profile: Option<EncodingProfile>,
    /// Minimum H.264 level, compared per [`LevelCheck`].
    pub min_level: Option<f32>,
    /// Major brand the item must NOT carry.
    pub brand_exclusion: Option<String>,
    /// Upper bound in kbit/s.
    pub max_video_bitrate: Option<u64>,
    pub max_video_height: Option<u32>,
    pub square_pixels: Option<bool>,
    pub pixel_format: Option<PixelFormat>,
    pub audio_codec: Option<AudioCodec>,
    /// Upper bound in kbit/s.
    pub max_audio_bitrate: Option<u64>,
    pub audio_frequency: Option<u32>,
    pub audio_multichannel: Option<bool>,
}

impl VideoSource {
    fn constrains_video(&self) -> bool {
        self.video_codec.is_some()
            || self.fourcc.is_some()
            || self.aspect_ratio.is_some()
            || self.profile.is_some()
            || self.min_level.is_some()
            || self.max_video_bitrate.is_some()
            || self.max_video_height.is_some()
            || self.square_pixels.is_some()
            || self.pixel_format.is_some()
    }

    fn constrains_audio(&self) -> bool {
        self.audio_codec.is_some()
            || self.max_audio_bitrate.is_some()
            || self.audio_frequency.is_some()
            || self.audio_multichannel.is_some()
    }

    fn matches_video(&self, video: &VideoStream, check: LevelCheck) -> bool {
        allows(self.video_codec, video.codec)
            && self.fourcc.as_deref().map_or(true, |want| {
                video
                    .fourcc
                    .as_deref()
                    .is_some_and(|have| have.eq_ignore_ascii_case(want))
            })
            && self.aspect_ratio.map_or(true, |want| {
                video.aspect_ratio.is_some_and(|have| approx_eq(have, want))
            })
            && allows(self.profile, video.profile)
            && self.min_level.map_or(true, |min| {
                effective_level(video, check).is_some_and(|level| level >= min)
            })
            && within(self.max_video_bitrate, video.bitrate)
            && within(self.max_video_height, Some(video.height))
            && allows(self.square_pixels, is_square(video))
            && allows(self.pixel_format, video.pixel_format)
    }

    fn matches_audio(&self, audio: &AudioStream) -> bool {
        allows(self.audio_codec, audio.codec)
            && within(self.max_audio_bitrate, audio.bitrate)
            && self
                .audio_frequency
                .map_or(true, |want| audio.frequency == Some(want))
            && allows(self.audio_multichannel, is_multichannel(audio))
    }
}

impl SourceMatcher for VideoSource {
    type Context = VideoContext;
    type Target = VideoTarget;

    fn matches(&self, probe: &MetadataContainer, ctx: VideoContext) -> bool {
        if !allows(self.container, probe.metadata.video_container) {
            return false;
        }

        if let Some(ref excluded) = self.brand_exclusion {
            let same_brand = probe
                .metadata
                .major_brand
                .as_deref()
                .is_some_and(|brand| brand.trim().eq_ignore_ascii_case(excluded.trim()));
            if same_brand {
                return false;
            }
        }

        if self.constrains_video() {
            match probe.primary_video() {
                Some(video) if self.matches_video(video, ctx.level_check) => {}
                _ => return false,
            }
        }

        if self.constrains_audio() {
            match ctx.audio_stream.and_then(|pos| probe.audio_stream(pos)) {
                Some(audio) if self.matches_audio(audio) => {}
                _ => return false,
            }
        }

        true
    }

    fn describes(&self, target: &VideoTarget) -> bool {
        !target.force_video_transcoding
            && pinned(target.container, self.container)
            && pinned(target.video_codec, self.video_codec)
            && pinned(target.profile, self.profile)
            && pinned(target.pixel_format, self.pixel_format)
            && pinned(target.audio_codec, self.audio_codec)
            && pinned(target.audio_frequency, self.audio_frequency)
            && match (&target.fourcc, &self.fourcc) {
                (None, _) => true,
                (Some(t), Some(s)) => t.eq_ignore_ascii_case(s),
                (Some(_), None) => false,
            }
            && match (target.aspect_ratio, self.aspect_ratio) {
                (None, _) => true,
                (Some(t), Some(s)) => approx_eq(t, s),
                (Some(_), None) => false,
            }
            && bounded(target.max_video_bitrate, self.max_video_bitrate)
            && bounded(target.max_video_height, self.max_video_height)
            && bounded(target.audio_bitrate, self.max_audio_bitrate)
            && (!target.force_stereo || self.audio_multichannel == Some(false))
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Constraints on an audio-only item and its selected audio stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSource {
    pub container: Option<AudioContainer>,
    pub codec: Option<AudioCodec>,
    /// Upper bound in kbit/s.
    pub max_bitrate: Option<u64>,
    pub frequency: Option<u32>,
    pub multichannel: Option<bool>,
}

impl AudioSource {
    fn constrains_stream(&self) -> bool {
        self.codec.is_some()
            || self.max_bitrate.is_some()
            || self.frequency.is_some()
            || self.multichannel.is_some()
    }
}

impl SourceMatcher for AudioSource {
    /// Position of the selected audio stream.
    type Context = Option<usize>;
    type Target = AudioTarget;

    fn matches(&self, probe: &MetadataContainer, audio_stream: Option<usize>) -> bool {
        if !allows(self.container, probe.metadata.audio_container) {
            return false;
        }
        if !self.constrains_stream() {
            return true;
        }

        let Some(audio) = audio_stream.and_then(|pos| probe.audio_stream(pos)) else {
            return false;
        };
        allows(self.codec, audio.codec)
            && within(self.max_bitrate, audio.bitrate)
            && self
                .frequency
                .map_or(true, |want| audio.frequency == Some(want))
            && allows(self.multichannel, is_multichannel(audio))
    }

    fn describes(&self, target: &AudioTarget) -> bool {
        pinned(target.container, self.container)
            && pinned(target.codec, self.codec)
            && pinned(target.frequency, self.frequency)
            && bounded(target.bitrate, self.max_bitrate)
            && (!target.force_stereo || self.multichannel == Some(false))
    }
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// Constraints on an image item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSource {
    pub container: Option<ImageContainer>,
    pub pixel_format: Option<PixelFormat>,
}

impl SourceMatcher for ImageSource {
    type Context = ();
    type Target = ImageTarget;

    fn matches(&self, probe: &MetadataContainer, _ctx: ()) -> bool {
        if !allows(self.container, probe.metadata.image_container) {
            return false;
        }
        match self.pixel_format {
            None => true,
            Some(want) => probe.image.as_ref().is_some_and(|i| i.pixel_format == want),
        }
    }

    fn describes(&self, target: &ImageTarget) -> bool {
        pinned(target.container, self.container) && pinned(target.pixel_format, self.pixel_format)
    }
}
