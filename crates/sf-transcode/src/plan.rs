//! Job planning: turn a resolved profile into the parameter record a
//! transcoder is started with.
//!
//! Source attributes come from the probe's selected streams; output
//! attributes come from the target, falling back to the profile's
//! [`PolicySettings`] where the target leaves them open. A match whose
//! matcher already [describes](SourceMatcher::describes) the target yields
//! no plan.

use serde::Serialize;
use sf_core::{
    AudioCodec, AudioContainer, EncodingPreset, EncodingProfile, ImageContainer, PixelFormat,
    QualityMode, SubtitleSupport, VideoCodec, VideoContainer,
};
use sf_probe::{AudioStream, ImageInfo, MetadataContainer, SubtitleStream, VideoStream};

use crate::language;
use crate::matcher::SourceMatcher;
use crate::registry::ProfileRegistry;
use crate::settings::{DefaultAudioStream, PolicySettings};
use crate::target::{AudioTarget, TranscoderOverride, VideoTarget};

/// Profile name recorded on stream-copy plans.
pub const COPY_PROFILE: &str = "copy";

/// Per-request job options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Identifier of the transcode job.
    pub transcode_id: String,
    /// Whether the output is a live stream.
    pub live: bool,
}

impl PlanOptions {
    pub fn new(transcode_id: impl Into<String>) -> Self {
        Self {
            transcode_id: transcode_id.into(),
            live: false,
        }
    }

    pub fn live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }
}

// ---------------------------------------------------------------------------
// Plan records
// ---------------------------------------------------------------------------

/// Parameters for a video transcode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoTranscoding {
    pub transcode_id: String,
    pub live: bool,
    /// Name of the profile the plan was derived from.
    pub profile: String,
    pub source_media: Option<String>,
    pub source_container: VideoContainer,
    /// Duration in seconds.
    pub source_duration: Option<f64>,
    pub source_video: VideoStream,
    pub source_audio: Option<AudioStream>,
    pub source_subtitles: Vec<SubtitleStream>,
    pub output: VideoOutput,
    pub subtitle_support: SubtitleSupport,
    /// Source subtitle streams in a format the client accepts; empty when
    /// subtitles are not delivered.
    pub subtitles: Vec<SubtitleStream>,
    pub transcoder: Option<TranscoderOverride>,
}

/// Output side of a [`VideoTranscoding`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoOutput {
    pub container: VideoContainer,
    pub video_codec: VideoCodec,
    /// Copy the video stream instead of encoding it.
    pub copy_video: bool,
    pub profile: EncodingProfile,
    pub level: Option<f32>,
    pub preset: EncodingPreset,
    pub quality: QualityMode,
    /// Quality factor of the declared output codec's encoder.
    pub quality_factor: Option<u32>,
    /// Generic quality factor for encoders without their own defaults.
    pub video_quality_factor: u32,
    pub pixel_format: Option<PixelFormat>,
    pub aspect_ratio: Option<f32>,
    /// Upper bound in kbit/s.
    pub max_bitrate: Option<u64>,
    pub max_height: u32,
    pub audio_codec: AudioCodec,
    /// Copy the audio stream instead of encoding it.
    pub copy_audio: bool,
    /// Audio bitrate in kbit/s.
    pub audio_bitrate: Option<u64>,
    pub audio_frequency: Option<u32>,
    pub force_stereo: bool,
    pub force_video_transcoding: bool,
    pub movflags: Option<String>,
}

/// Parameters for an audio transcode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTranscoding {
    pub transcode_id: String,
    pub live: bool,
    pub profile: String,
    pub source_media: Option<String>,
    pub source_container: AudioContainer,
    pub source_duration: Option<f64>,
    pub source_audio: AudioStream,
    pub output: AudioOutput,
    pub transcoder: Option<TranscoderOverride>,
}

/// Output side of an [`AudioTranscoding`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioOutput {
    pub container: AudioContainer,
    pub codec: AudioCodec,
    pub copy: bool,
    /// Bitrate in kbit/s.
    pub bitrate: Option<u64>,
    pub frequency: Option<u32>,
    pub force_stereo: bool,
}

/// Parameters for an image conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageTranscoding {
    pub transcode_id: String,
    pub profile: String,
    /// The profile was synthesized by the size/rotation fallback.
    pub synthesized: bool,
    pub source_media: Option<String>,
    pub source_container: ImageContainer,
    pub source_image: ImageInfo,
    pub output: ImageOutput,
    pub transcoder: Option<TranscoderOverride>,
}

/// Output side of an [`ImageTranscoding`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOutput {
    pub container: ImageContainer,
    pub pixel_format: PixelFormat,
    pub quality: QualityMode,
    pub quality_factor: u32,
    pub auto_rotate: bool,
    pub max_width: u32,
    pub max_height: u32,
}

// ---------------------------------------------------------------------------
// Output derivation
// ---------------------------------------------------------------------------

impl VideoOutput {
    fn from_target(
        target: &VideoTarget,
        settings: &PolicySettings,
        container: VideoContainer,
        video: &VideoStream,
        audio: Option<&AudioStream>,
    ) -> Self {
        // Encoder defaults only apply to a codec the target asks for.
        let encoder = target
            .video_codec
            .and_then(|codec| settings.video.encoder_for(codec));

        Self {
            container: target.container.unwrap_or(container),
            video_codec: target.video_codec.unwrap_or(video.codec),
            copy_video: false,
            profile: target
                .profile
                .or(encoder.map(|e| e.profile))
                .unwrap_or(video.profile),
            level: target.level.or(encoder.and_then(|e| e.level)),
            preset: target
                .preset
                .or(encoder.map(|e| e.preset))
                .unwrap_or_default(),
            quality: target
                .quality
                .filter(|q| *q != QualityMode::Default)
                .unwrap_or(settings.video.quality),
            quality_factor: encoder.map(|e| e.quality_factor),
            video_quality_factor: settings.video.quality_factor,
            pixel_format: target.pixel_format,
            aspect_ratio: target.aspect_ratio,
            max_bitrate: target.max_video_bitrate,
            max_height: target
                .max_video_height
                .unwrap_or(settings.video.max_height),
            audio_codec: target
                .audio_codec
                .or(audio.map(|a| a.codec))
                .unwrap_or_default(),
            copy_audio: false,
            audio_bitrate: Some(
                target
                    .audio_bitrate
                    .unwrap_or(settings.audio.default_bitrate),
            ),
            audio_frequency: target.audio_frequency,
            force_stereo: target.force_stereo || settings.audio.default_stereo,
            force_video_transcoding: target.force_video_transcoding,
            movflags: target.movflags.clone(),
        }
    }

    /// Stream copy of the source.
    fn copy_of(container: VideoContainer, video: &VideoStream, audio: Option<&AudioStream>) -> Self {
        Self {
            container,
            video_codec: video.codec,
            copy_video: true,
            profile: video.profile,
            level: video.header_level,
            preset: EncodingPreset::Default,
            quality: QualityMode::Default,
            quality_factor: None,
            video_quality_factor: 0,
            pixel_format: Some(video.pixel_format),
            aspect_ratio: video.aspect_ratio,
            max_bitrate: None,
            max_height: video.height,
            audio_codec: audio.map(|a| a.codec).unwrap_or_default(),
            copy_audio: audio.is_some(),
            audio_bitrate: audio.and_then(|a| a.bitrate),
            audio_frequency: audio.and_then(|a| a.frequency),
            force_stereo: false,
            force_video_transcoding: false,
            movflags: None,
        }
    }
}

impl AudioOutput {
    fn from_target(
        target: &AudioTarget,
        settings: &PolicySettings,
        container: AudioContainer,
        audio: &AudioStream,
    ) -> Self {
        Self {
            container: target.container.unwrap_or(container),
            codec: target.codec.unwrap_or(audio.codec),
            copy: false,
            bitrate: Some(target.bitrate.unwrap_or(settings.audio.default_bitrate)),
            frequency: target.frequency,
            force_stereo: target.force_stereo || settings.audio.default_stereo,
        }
    }
}

fn selected_audio(probe: &MetadataContainer, position: Option<usize>) -> Option<AudioStream> {
    position.and_then(|pos| probe.audio_stream(pos)).cloned()
}

// ---------------------------------------------------------------------------
// Planning against a registry
// ---------------------------------------------------------------------------

impl ProfileRegistry {
    /// Plan a video transcode, or `None` when nothing matches or the matched
    /// source already satisfies the target.
    pub fn plan_video(
        &self,
        probe: &MetadataContainer,
        preferred_audio_languages: &str,
        options: &PlanOptions,
    ) -> Option<VideoTranscoding> {
        let (profile, matched) = self.resolve_video(probe, preferred_audio_languages)?;
        if matched.source.describes(&profile.target) {
            tracing::debug!(profile = %profile.name, "Source already satisfies video target");
            return None;
        }

        let video = probe.primary_video()?;
        let audio = selected_audio(probe, matched.audio_stream);
        let output = VideoOutput::from_target(
            &profile.target,
            &self.settings,
            probe.metadata.video_container,
            video,
            audio.as_ref(),
        );

        Some(VideoTranscoding {
            transcode_id: options.transcode_id.clone(),
            live: options.live,
            profile: profile.name.clone(),
            source_media: probe.metadata.source.clone(),
            source_container: probe.metadata.video_container,
            source_duration: probe.metadata.duration,
            source_video: video.clone(),
            source_audio: audio,
            source_subtitles: probe.subtitles.clone(),
            output,
            subtitle_support: self.settings.subtitles.effective_mode(),
            subtitles: self.settings.subtitles.deliverable(&probe.subtitles),
            transcoder: profile.transcoder.clone(),
        })
    }

    /// Plan an audio transcode.
    pub fn plan_audio(
        &self,
        probe: &MetadataContainer,
        options: &PlanOptions,
    ) -> Option<AudioTranscoding> {
        let (profile, matched) = self.resolve_audio(probe)?;
        if matched.source.describes(&profile.target) {
            tracing::debug!(profile = %profile.name, "Source already satisfies audio target");
            return None;
        }

        let audio = selected_audio(probe, matched.audio_stream)?;
        let output = AudioOutput::from_target(
            &profile.target,
            &self.settings,
            probe.metadata.audio_container,
            &audio,
        );

        Some(AudioTranscoding {
            transcode_id: options.transcode_id.clone(),
            live: options.live,
            profile: profile.name.clone(),
            source_media: probe.metadata.source.clone(),
            source_container: probe.metadata.audio_container,
            source_duration: probe.metadata.duration,
            source_audio: audio,
            output,
            transcoder: profile.transcoder.clone(),
        })
    }

    /// Plan an image conversion, including synthesized fallbacks.
    pub fn plan_image(
        &self,
        probe: &MetadataContainer,
        options: &PlanOptions,
    ) -> Option<ImageTranscoding> {
        let (profile, matched) = self.resolve_image(probe)?;
        if matched.source.describes(&profile.target) {
            tracing::debug!(profile = %profile.name, "Source already satisfies image target");
            return None;
        }

        let image = probe.image.clone()?;
        let limits = &self.settings.image;
        let output = ImageOutput {
            container: profile
                .target
                .container
                .unwrap_or(probe.metadata.image_container),
            pixel_format: profile.target.pixel_format.unwrap_or(image.pixel_format),
            quality: profile
                .target
                .quality
                .filter(|q| *q != QualityMode::Default)
                .unwrap_or(limits.quality),
            quality_factor: self.settings.video.quality_factor,
            auto_rotate: limits.auto_rotate,
            max_width: limits.max_width,
            max_height: limits.max_height,
        };

        Some(ImageTranscoding {
            transcode_id: options.transcode_id.clone(),
            profile: profile.name.clone(),
            synthesized: matched.synthesized,
            source_media: probe.metadata.source.clone(),
            source_container: probe.metadata.image_container,
            source_image: image,
            output,
            transcoder: profile.transcoder.clone(),
        })
    }

    /// Plan a stream copy that keeps subtitles according to this profile's
    /// subtitle mode. Needs both a video and an audio stream.
    pub fn subtitle_video(
        &self,
        probe: &MetadataContainer,
        preferred_audio_languages: &str,
        options: &PlanOptions,
    ) -> Option<VideoTranscoding> {
        let audio_stream = language::select_audio_stream(
            probe,
            preferred_audio_languages,
            self.settings.audio.default_stream,
        )?;
        let mut plan = copy_plan(probe, Some(audio_stream), options)?;
        plan.subtitle_support = self.settings.subtitles.effective_mode();
        plan.subtitles = self.settings.subtitles.deliverable(&probe.subtitles);
        Some(plan)
    }
}

// ---------------------------------------------------------------------------
// Profile-independent copy plans
// ---------------------------------------------------------------------------

fn copy_plan(
    probe: &MetadataContainer,
    audio_stream: Option<usize>,
    options: &PlanOptions,
) -> Option<VideoTranscoding> {
    let video = probe.primary_video()?;
    let audio = selected_audio(probe, audio_stream);
    let container = probe.metadata.video_container;

    Some(VideoTranscoding {
        transcode_id: options.transcode_id.clone(),
        live: options.live,
        profile: COPY_PROFILE.to_string(),
        source_media: probe.metadata.source.clone(),
        source_container: container,
        source_duration: probe.metadata.duration,
        source_video: video.clone(),
        output: VideoOutput::copy_of(container, video, audio.as_ref()),
        source_audio: audio,
        source_subtitles: probe.subtitles.clone(),
        subtitle_support: SubtitleSupport::None,
        subtitles: Vec::new(),
        transcoder: None,
    })
}

/// Live stream copy of a video item with language-selected audio and
/// subtitles off.
pub fn live_video(
    probe: &MetadataContainer,
    preferred_audio_languages: &str,
    fallback: DefaultAudioStream,
    transcode_id: &str,
) -> Option<VideoTranscoding> {
    let audio_stream = language::select_audio_stream(probe, preferred_audio_languages, fallback);
    copy_plan(probe, audio_stream, &PlanOptions::new(transcode_id).live(true))
}

/// Live stream copy of an audio item.
pub fn live_audio(
    probe: &MetadataContainer,
    fallback: DefaultAudioStream,
    transcode_id: &str,
) -> Option<AudioTranscoding> {
    let audio = selected_audio(probe, fallback.pick(probe))?;
    let container = probe.metadata.audio_container;

    Some(AudioTranscoding {
        transcode_id: transcode_id.to_string(),
        live: true,
        profile: COPY_PROFILE.to_string(),
        source_media: probe.metadata.source.clone(),
        source_container: container,
        source_duration: probe.metadata.duration,
        output: AudioOutput {
            container,
            codec: audio.codec,
            copy: true,
            bitrate: audio.bitrate,
            frequency: audio.frequency,
            force_stereo: false,
        },
        source_audio: audio,
        transcoder: None,
    })
}
