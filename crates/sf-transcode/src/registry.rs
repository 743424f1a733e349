//! The [`ProfileRegistry`] resolves probes against ordered profile lists.

use serde::{Deserialize, Serialize};
use sf_probe::{ImageInfo, MetadataContainer};
use std::borrow::Cow;

use crate::language;
use crate::matcher::{ImageSource, VideoContext};
use crate::resolver::{first_match, AudioMatch, ImageMatch, VideoMatch};
use crate::settings::PolicySettings;
use crate::target::{
    AudioTranscodingTarget, ImageTarget, ImageTranscodingTarget, VideoTranscodingTarget,
};

/// Name given to profiles synthesized by the image fallback.
pub const SYNTHESIZED_IMAGE_PROFILE: &str = "image_fallback";

/// Ordered video, audio and image profiles plus the policy they share.
///
/// Resolution is pure: the registry is never modified by it, so a published
/// registry can be shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRegistry {
    pub settings: PolicySettings,
    pub video_targets: Vec<VideoTranscodingTarget>,
    pub audio_targets: Vec<AudioTranscodingTarget>,
    pub image_targets: Vec<ImageTranscodingTarget>,
}

impl ProfileRegistry {
    /// Create an empty registry with the given settings.
    pub fn new(settings: PolicySettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn with_video_target(mut self, profile: VideoTranscodingTarget) -> Self {
        self.video_targets.push(profile);
        self
    }

    pub fn with_audio_target(mut self, profile: AudioTranscodingTarget) -> Self {
        self.audio_targets.push(profile);
        self
    }

    pub fn with_image_target(mut self, profile: ImageTranscodingTarget) -> Self {
        self.image_targets.push(profile);
        self
    }

    /// Whether the registry has no profiles at all.
    pub fn is_empty(&self) -> bool {
        self.video_targets.is_empty() && self.audio_targets.is_empty() && self.image_targets.is_empty()
    }

    /// Find the video profile for a probe.
    ///
    /// The audio stream is selected from `preferred_audio_languages`, a
    /// comma-separated list of language codes, highest priority first.
    /// Returns `None` when the probe has no video stream or no profile
    /// matches.
    pub fn resolve_video<'a>(
        &'a self,
        probe: &MetadataContainer,
        preferred_audio_languages: &str,
    ) -> Option<(&'a VideoTranscodingTarget, VideoMatch<'a>)> {
        if !probe.has_video() {
            tracing::debug!("Video resolution skipped: probe has no video stream");
            return None;
        }

        let audio_stream = language::select_audio_stream(
            probe,
            preferred_audio_languages,
            self.settings.audio.default_stream,
        );
        let ctx = VideoContext {
            audio_stream,
            level_check: self.settings.video.h264_level_check,
        };

        match first_match(&self.video_targets, probe, ctx) {
            Some((profile, source)) => {
                tracing::debug!(profile = %profile.name, ?audio_stream, "Video profile matched");
                Some((
                    profile,
                    VideoMatch {
                        source,
                        audio_stream,
                    },
                ))
            }
            None => {
                tracing::debug!("No video profile matched");
                None
            }
        }
    }

    /// Find the audio profile for a probe, using the default audio stream.
    pub fn resolve_audio<'a>(
        &'a self,
        probe: &MetadataContainer,
    ) -> Option<(&'a AudioTranscodingTarget, AudioMatch<'a>)> {
        let Some(audio_stream) = self.settings.audio.default_stream.pick(probe) else {
            tracing::debug!("Audio resolution skipped: probe has no audio stream");
            return None;
        };

        let (profile, source) = first_match(&self.audio_targets, probe, Some(audio_stream))?;
        tracing::debug!(profile = %profile.name, audio_stream, "Audio profile matched");
        Some((
            profile,
            AudioMatch {
                source,
                audio_stream: Some(audio_stream),
            },
        ))
    }

    /// Find the image profile for a probe.
    ///
    /// When no explicit profile matches but the image exceeds the configured
    /// size limits, or needs rotation and auto-rotate is on, a profile is
    /// synthesized that keeps the source format and applies the policy
    /// quality. The returned profile is then owned.
    pub fn resolve_image<'a>(
        &'a self,
        probe: &MetadataContainer,
    ) -> Option<(Cow<'a, ImageTranscodingTarget>, ImageMatch<'a>)> {
        let Some(image) = probe.image.as_ref() else {
            tracing::debug!("Image resolution skipped: probe has no image attributes");
            return None;
        };

        if let Some((profile, source)) = first_match(&self.image_targets, probe, ()) {
            tracing::debug!(profile = %profile.name, "Image profile matched");
            return Some((
                Cow::Borrowed(profile),
                ImageMatch {
                    source: Cow::Borrowed(source),
                    synthesized: false,
                },
            ));
        }

        let profile = self.synthesize_image_profile(probe, image)?;
        tracing::debug!(
            width = image.width,
            height = image.height,
            orientation = image.orientation,
            "Synthesized image profile"
        );
        Some((
            Cow::Owned(profile),
            ImageMatch {
                source: Cow::Owned(ImageSource::default()),
                synthesized: true,
            },
        ))
    }

    fn synthesize_image_profile(
        &self,
        probe: &MetadataContainer,
        image: &ImageInfo,
    ) -> Option<ImageTranscodingTarget> {
        let limits = &self.settings.image;
        let oversized = image.height > limits.max_height || image.width > limits.max_width;
        let rotate = image.needs_rotation() && limits.auto_rotate;
        if !oversized && !rotate {
            return None;
        }

        Some(ImageTranscodingTarget::new(
            SYNTHESIZED_IMAGE_PROFILE,
            ImageTarget {
                container: Some(probe.metadata.image_container),
                pixel_format: Some(image.pixel_format),
                quality: Some(limits.quality),
                force_inheritance: false,
            },
        ))
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let names = self
            .video_targets
            .iter()
            .map(|p| (&p.name, p.sources.is_empty(), "video"))
            .chain(
                self.audio_targets
                    .iter()
                    .map(|p| (&p.name, p.sources.is_empty(), "audio")),
            )
            .chain(
                self.image_targets
                    .iter()
                    .map(|p| (&p.name, p.sources.is_empty(), "image")),
            );
        for (name, no_sources, kind) in names {
            if no_sources {
                warnings.push(format!("{kind} profile '{name}' has no sources and never matches"));
            }
        }

        if self.settings.image.max_width == 0 || self.settings.image.max_height == 0 {
            warnings.push("image size limit of 0 makes every image oversized".into());
        }
        if self.settings.video.max_height == 0 {
            warnings.push("video.max_height is 0".into());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{AudioSource, VideoSource};
    use crate::settings::DefaultAudioStream;
    use crate::target::{AudioTarget, VideoTarget};
    use sf_core::{
        AudioCodec, AudioContainer, ImageContainer, LevelCheck, PixelFormat, QualityMode,
        VideoCodec, VideoContainer,
    };
    use sf_probe::{AudioStream, Metadata, VideoStream};

    fn make_test_info() -> MetadataContainer {
        MetadataContainer {
            metadata: Metadata {
                video_container: VideoContainer::Matroska,
                ..Default::default()
            },
            video: vec![VideoStream {
                codec: VideoCodec::H264,
                width: 1920,
                height: 1080,
                header_level: Some(5.1),
                ..Default::default()
            }],
            audio: vec![
                AudioStream {
                    stream_index: 1,
                    codec: AudioCodec::Dts,
                    language: Some("en".to_string()),
                    channels: 6,
                    ..Default::default()
                },
                AudioStream {
                    stream_index: 2,
                    codec: AudioCodec::Ac3,
                    language: Some("de".to_string()),
                    channels: 2,
                    default: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn video_profile(name: &str, source: VideoSource) -> VideoTranscodingTarget {
        VideoTranscodingTarget::new(
            name,
            VideoTarget {
                container: Some(VideoContainer::Mpeg2Ts),
                ..Default::default()
            },
        )
        .with_source(source)
    }

    fn make_image_info(width: u32, height: u32, orientation: u8) -> MetadataContainer {
        MetadataContainer {
            metadata: Metadata {
                image_container: ImageContainer::Jpeg,
                ..Default::default()
            },
            image: Some(ImageInfo {
                width,
                height,
                orientation,
                pixel_format: PixelFormat::Yuv420,
            }),
            ..Default::default()
        }
    }

    // ----------------------------------------------------------------
    // Video
    // ----------------------------------------------------------------

    #[test]
    fn video_first_match_wins() {
        let info = make_test_info();
        let registry = ProfileRegistry::default()
            .with_video_target(video_profile(
                "mp4_only",
                VideoSource {
                    container: Some(VideoContainer::Mp4),
                    ..Default::default()
                },
            ))
            .with_video_target(video_profile(
                "mkv",
                VideoSource {
                    container: Some(VideoContainer::Matroska),
                    ..Default::default()
                },
            ))
            .with_video_target(video_profile("catch_all", VideoSource::default()));

        let (profile, matched) = registry.resolve_video(&info, "").unwrap();
        assert_eq!(profile.name, "mkv");
        assert_eq!(matched.source.container, Some(VideoContainer::Matroska));
        assert_eq!(matched.audio_stream, Some(0));
    }

    #[test]
    fn video_language_selects_audio_stream() {
        let info = make_test_info();
        let registry = ProfileRegistry::default()
            .with_video_target(video_profile("any", VideoSource::default()));

        let (_, matched) = registry.resolve_video(&info, "de,en").unwrap();
        assert_eq!(matched.audio_stream, Some(1));
        let (_, matched) = registry.resolve_video(&info, "fr").unwrap();
        assert_eq!(matched.audio_stream, Some(0));
    }

    #[test]
    fn video_fallback_stream_follows_policy() {
        let info = make_test_info();
        let mut settings = PolicySettings::default();
        settings.audio.default_stream = DefaultAudioStream::Designated;
        let registry = ProfileRegistry::new(settings)
            .with_video_target(video_profile("any", VideoSource::default()));

        let (_, matched) = registry.resolve_video(&info, "").unwrap();
        assert_eq!(matched.audio_stream, Some(1));
    }

    #[test]
    fn video_selected_stream_drives_audio_constraints() {
        let info = make_test_info();
        let registry = ProfileRegistry::default().with_video_target(video_profile(
            "multichannel",
            VideoSource {
                audio_multichannel: Some(true),
                ..Default::default()
            },
        ));

        assert!(registry.resolve_video(&info, "en").is_some());
        assert!(registry.resolve_video(&info, "de").is_none());
    }

    #[test]
    fn video_level_check_comes_from_settings() {
        let mut info = make_test_info();
        info.video[0].header_level = Some(3.0);
        info.video[0].ref_level = Some(5.1);
        let source = VideoSource {
            min_level: Some(4.2),
            ..Default::default()
        };

        let mut settings = PolicySettings::default();
        settings.video.h264_level_check = LevelCheck::Header;
        let header = ProfileRegistry::new(settings.clone())
            .with_video_target(video_profile("level", source.clone()));
        assert!(header.resolve_video(&info, "").is_none());

        settings.video.h264_level_check = LevelCheck::Any;
        let any = ProfileRegistry::new(settings).with_video_target(video_profile("level", source));
        assert!(any.resolve_video(&info, "").is_some());
    }

    #[test]
    fn video_without_video_stream() {
        let mut info = make_test_info();
        info.video.clear();
        let registry = ProfileRegistry::default()
            .with_video_target(video_profile("any", VideoSource::default()));
        assert!(registry.resolve_video(&info, "en").is_none());
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let registry = ProfileRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.resolve_video(&make_test_info(), "en").is_none());
        assert!(registry.resolve_audio(&make_test_info()).is_none());
        assert!(registry.resolve_image(&make_image_info(100, 100, 1)).is_none());
    }

    // ----------------------------------------------------------------
    // Audio
    // ----------------------------------------------------------------

    #[test]
    fn audio_uses_default_stream() {
        let mut info = make_test_info();
        info.video.clear();
        info.metadata.audio_container = AudioContainer::Ac3;
        let registry = ProfileRegistry::default().with_audio_target(
            AudioTranscodingTarget::new("dts", AudioTarget::default()).with_source(AudioSource {
                codec: Some(AudioCodec::Dts),
                ..Default::default()
            }),
        );

        let (profile, matched) = registry.resolve_audio(&info).unwrap();
        assert_eq!(profile.name, "dts");
        assert_eq!(matched.audio_stream, Some(0));
    }

    #[test]
    fn audio_without_audio_stream() {
        let registry = ProfileRegistry::default().with_audio_target(
            AudioTranscodingTarget::new("any", AudioTarget::default())
                .with_source(AudioSource::default()),
        );
        assert!(registry.resolve_audio(&MetadataContainer::default()).is_none());
    }

    // ----------------------------------------------------------------
    // Image
    // ----------------------------------------------------------------

    #[test]
    fn image_explicit_match_is_borrowed() {
        let registry = ProfileRegistry::default().with_image_target(
            ImageTranscodingTarget::new("jpeg", ImageTarget::default()).with_source(ImageSource {
                container: Some(ImageContainer::Jpeg),
                pixel_format: None,
            }),
        );

        let (profile, matched) = registry.resolve_image(&make_image_info(4000, 3000, 1)).unwrap();
        assert!(matches!(profile, Cow::Borrowed(_)));
        assert_eq!(profile.name, "jpeg");
        assert!(!matched.synthesized);
    }

    #[test]
    fn image_oversized_synthesizes_profile() {
        let registry = ProfileRegistry::default();
        let info = make_image_info(4000, 3000, 1);

        let (profile, matched) = registry.resolve_image(&info).unwrap();
        assert!(matched.synthesized);
        assert_eq!(*matched.source, ImageSource::default());
        assert_eq!(profile.name, SYNTHESIZED_IMAGE_PROFILE);
        assert_eq!(profile.target.container, Some(ImageContainer::Jpeg));
        assert_eq!(profile.target.pixel_format, Some(PixelFormat::Yuv420));
        assert_eq!(profile.target.quality, Some(QualityMode::Best));
    }

    #[test]
    fn image_rotation_synthesizes_only_with_auto_rotate() {
        let info = make_image_info(800, 600, 6);
        assert!(ProfileRegistry::default().resolve_image(&info).is_some());

        let mut settings = PolicySettings::default();
        settings.image.auto_rotate = false;
        assert!(ProfileRegistry::new(settings).resolve_image(&info).is_none());
    }

    #[test]
    fn image_within_limits_passes_through() {
        let registry = ProfileRegistry::default();
        assert!(registry.resolve_image(&make_image_info(1920, 1080, 1)).is_none());
    }

    #[test]
    fn image_without_image_attributes() {
        let registry = ProfileRegistry::default();
        assert!(registry.resolve_image(&make_test_info()).is_none());
    }

    // ----------------------------------------------------------------
    // Validation
    // ----------------------------------------------------------------

    #[test]
    fn validate_flags_sourceless_profiles() {
        let registry = ProfileRegistry::default()
            .with_audio_target(AudioTranscodingTarget::new("orphan", AudioTarget::default()));
        let warnings = registry.validate();
        assert_eq!(warnings.len(), 1, "unexpected warnings: {:?}", warnings);
        assert!(warnings[0].contains("orphan"));
    }

    #[test]
    fn default_registry_has_no_warnings() {
        assert!(ProfileRegistry::default().validate().is_empty());
    }
}
