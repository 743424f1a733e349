//! Core types for normalized probe results.

use serde::{Deserialize, Serialize};
use sf_core::{
    AudioCodec, AudioContainer, EncodingProfile, ImageContainer, PixelFormat, SubtitleCodec,
    VideoCodec, VideoContainer,
};

/// Normalized description of one source media item.
///
/// Produced once per request by a prober and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataContainer {
    /// Item-level attributes.
    pub metadata: Metadata,
    /// Video streams found in the item.
    pub video: Vec<VideoStream>,
    /// Audio streams found in the item, in probe order.
    pub audio: Vec<AudioStream>,
    /// Subtitle streams found in the item.
    pub subtitles: Vec<SubtitleStream>,
    /// Image attributes (image items only).
    pub image: Option<ImageInfo>,
}

impl MetadataContainer {
    /// Returns the primary video stream (the first one).
    pub fn primary_video(&self) -> Option<&VideoStream> {
        self.video.first()
    }

    /// Position in [`audio`](Self::audio) of the designated first audio stream.
    ///
    /// Prefers the first stream marked as default; falls back to the stream
    /// with the lowest stream index. This is not necessarily position 0.
    pub fn first_audio_stream(&self) -> Option<usize> {
        self.audio
            .iter()
            .position(|s| s.default)
            .or_else(|| {
                self.audio
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, s)| s.stream_index)
                    .map(|(pos, _)| pos)
            })
    }

    /// Audio stream at the given position, if any.
    pub fn audio_stream(&self, position: usize) -> Option<&AudioStream> {
        self.audio.get(position)
    }

    /// Whether the item carries any video stream.
    pub fn has_video(&self) -> bool {
        !self.video.is_empty()
    }
}

/// Item-level attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Source path or URL.
    pub source: Option<String>,
    /// Container type when the item is a video.
    pub video_container: VideoContainer,
    /// Container type when the item is audio-only.
    pub audio_container: AudioContainer,
    /// File format when the item is an image.
    pub image_container: ImageContainer,
    /// MP4 major brand (e.g. "isom", "qt").
    pub major_brand: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    /// Overall bitrate in kbit/s.
    pub bitrate: Option<u64>,
}

/// A video stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoStream {
    /// Stream index within the source.
    pub stream_index: u32,
    pub codec: VideoCodec,
    /// FourCC code (e.g. "avc1", "hvc1").
    pub fourcc: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Display aspect ratio.
    pub aspect_ratio: Option<f32>,
    /// Pixel aspect ratio.
    pub pixel_aspect_ratio: Option<f32>,
    pub pixel_format: PixelFormat,
    pub profile: EncodingProfile,
    /// Level signalled in the H.264 header.
    pub header_level: Option<f32>,
    /// Level implied by resolution and reference frames.
    pub ref_level: Option<f32>,
    /// Bitrate in kbit/s.
    pub bitrate: Option<u64>,
    pub frame_rate: Option<f32>,
}

/// An audio stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioStream {
    /// Stream index within the source.
    pub stream_index: u32,
    pub codec: AudioCodec,
    /// Language code (ISO 639 or IETF).
    pub language: Option<String>,
    pub channels: u32,
    /// Sample rate in Hz.
    pub frequency: Option<u32>,
    /// Bitrate in kbit/s.
    pub bitrate: Option<u64>,
    /// Whether this is the default track.
    pub default: bool,
}

/// A subtitle stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleStream {
    pub stream_index: u32,
    pub codec: SubtitleCodec,
    pub language: Option<String>,
    pub default: bool,
}

/// Image attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// EXIF orientation: 1 is upright, anything above needs rotation.
    pub orientation: u8,
    pub pixel_format: PixelFormat,
}

impl Default for ImageInfo {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            orientation: 1,
            pixel_format: PixelFormat::Unknown,
        }
    }
}

impl ImageInfo {
    /// Whether the picture must be rotated to display upright.
    pub fn needs_rotation(&self) -> bool {
        self.orientation > 1
    }
}
