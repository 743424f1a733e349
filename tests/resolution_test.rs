//! Resolution engine integration tests.
//!
//! Exercises first-match resolution, audio language selection, the image
//! fallback, profile inheritance from definition files and planning through
//! the shared snapshot.

mod common;

use std::sync::Arc;

use common::*;
use sf_core::{
    AudioCodec, AudioContainer, ImageContainer, PixelFormat, QualityMode, SubtitleSupport,
    VideoCodec, VideoContainer,
};
use sf_probe::MetadataContainer;
use sf_transcode::{
    DefaultAudioStream, PlanOptions, PolicySettings, ProfileRegistry, SharedProfiles, VideoSource,
    VideoTarget, VideoTranscodingTarget,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn container_profile(name: &str, container: VideoContainer) -> VideoTranscodingTarget {
    VideoTranscodingTarget::new(
        name,
        VideoTarget {
            container: Some(VideoContainer::Mpeg2Ts),
            ..Default::default()
        },
    )
    .with_source(VideoSource {
        container: Some(container),
        ..Default::default()
    })
}

fn catch_all(name: &str) -> VideoTranscodingTarget {
    VideoTranscodingTarget::new(name, VideoTarget::default()).with_source(VideoSource::default())
}

// ---------------------------------------------------------------------------
// First match wins
// ---------------------------------------------------------------------------

#[test]
fn earlier_profile_wins_over_later_match() {
    let registry = ProfileRegistry::default()
        .with_video_target(container_profile("avi", VideoContainer::Avi))
        .with_video_target(container_profile("mkv", VideoContainer::Matroska))
        .with_video_target(catch_all("everything"));

    let (profile, _) = registry.resolve_video(&make_mkv_movie(), "").unwrap();
    assert_eq!(profile.name, "mkv");

    let (profile, _) = registry.resolve_video(&make_hevc_movie(), "").unwrap();
    assert_eq!(profile.name, "everything");
}

#[test]
fn earlier_source_within_profile_wins() {
    let profile = VideoTranscodingTarget::new("multi", VideoTarget::default())
        .with_source(VideoSource {
            video_codec: Some(VideoCodec::H264),
            ..Default::default()
        })
        .with_source(VideoSource::default());
    let registry = ProfileRegistry::default().with_video_target(profile);

    let (_, matched) = registry.resolve_video(&make_mkv_movie(), "").unwrap();
    assert_eq!(matched.source.video_codec, Some(VideoCodec::H264));

    let (_, matched) = registry.resolve_video(&make_hevc_movie(), "").unwrap();
    assert_eq!(*matched.source, VideoSource::default());
}

#[test]
fn resolution_is_deterministic() {
    let registry = ProfileRegistry::default()
        .with_video_target(container_profile("mkv", VideoContainer::Matroska))
        .with_video_target(catch_all("everything"));
    let probe = make_mkv_movie();

    let first = registry.resolve_video(&probe, "de,en");
    for _ in 0..10 {
        assert_eq!(registry.resolve_video(&probe, "de,en"), first);
    }
}

// ---------------------------------------------------------------------------
// Audio stream selection
// ---------------------------------------------------------------------------

#[test]
fn language_priority_selects_stream() {
    let registry = ProfileRegistry::default().with_video_target(catch_all("everything"));
    let probe = make_mkv_movie();

    let (_, matched) = registry.resolve_video(&probe, "de,en").unwrap();
    assert_eq!(matched.audio_stream, Some(1));

    let (_, matched) = registry.resolve_video(&probe, "EN,de").unwrap();
    assert_eq!(matched.audio_stream, Some(0));
}

#[test]
fn no_language_match_falls_back_to_default_stream() {
    let registry = ProfileRegistry::default().with_video_target(catch_all("everything"));
    let probe = make_mkv_movie();

    for prefs in ["", "fr", ",,", "fr,,it"] {
        let (_, matched) = registry.resolve_video(&probe, prefs).unwrap();
        assert_eq!(matched.audio_stream, Some(0), "preferences {:?}", prefs);
    }
}

#[test]
fn designated_default_stream_policy() {
    let mut settings = PolicySettings::default();
    settings.audio.default_stream = DefaultAudioStream::Designated;
    let registry = ProfileRegistry::new(settings).with_video_target(catch_all("everything"));

    let mut probe = make_mkv_movie();
    probe.audio[1].default = true;
    let (_, matched) = registry.resolve_video(&probe, "fr").unwrap();
    assert_eq!(matched.audio_stream, Some(1));
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[test]
fn oversized_image_gets_fallback_profile() {
    let registry = ProfileRegistry::default();
    let (profile, matched) = registry.resolve_image(&make_photo(6000, 4000, 1)).unwrap();

    assert!(matched.synthesized);
    assert_eq!(profile.target.container, Some(ImageContainer::Jpeg));
    assert_eq!(profile.target.pixel_format, Some(PixelFormat::Yuv420));
    assert_eq!(profile.target.quality, Some(registry.settings.image.quality));
}

#[test]
fn rotated_image_gets_fallback_profile() {
    let registry = ProfileRegistry::default();
    let (_, matched) = registry.resolve_image(&make_photo(800, 600, 8)).unwrap();
    assert!(matched.synthesized);
}

#[test]
fn compatible_image_passes_through() {
    let registry = ProfileRegistry::default();
    assert!(registry.resolve_image(&make_photo(1920, 1080, 1)).is_none());
}

// ---------------------------------------------------------------------------
// Degenerate input
// ---------------------------------------------------------------------------

#[test]
fn degenerate_probes_resolve_to_none() {
    let store = load_fixture_store();
    let registry = store.get(SECTION, "generic").unwrap();
    let empty = MetadataContainer::default();

    assert!(registry.resolve_video(&empty, "en").is_none());
    assert!(registry.resolve_audio(&empty).is_none());
    assert!(registry.resolve_image(&empty).is_none());
    // A movie is not an image, an image is not a movie.
    assert!(registry.resolve_image(&make_mkv_movie()).is_none());
    assert!(registry.resolve_video(&make_photo(6000, 4000, 1), "en").is_none());
}

#[test]
fn empty_registry_resolves_nothing_but_image_fallback() {
    let registry = ProfileRegistry::default();
    assert!(registry.resolve_video(&make_mkv_movie(), "en").is_none());
    assert!(registry.resolve_audio(&make_mkv_movie()).is_none());
    assert!(registry.resolve_image(&make_photo(640, 480, 1)).is_none());
    assert!(registry.resolve_image(&make_photo(6400, 4800, 1)).is_some());
}

// ---------------------------------------------------------------------------
// Definition files and inheritance
// ---------------------------------------------------------------------------

#[test]
fn fixture_profiles_load() {
    let store = load_fixture_store();
    assert_eq!(store.profile_names(SECTION), vec!["generic", "tv"]);

    let generic = store.get(SECTION, "generic").unwrap();
    assert_eq!(generic.video_targets.len(), 2);
    assert_eq!(generic.settings.audio.default_bitrate, 256);
    assert_eq!(generic.settings.subtitles.mode, SubtitleSupport::SoftCoded);
}

#[test]
fn derived_profile_inherits_forced_targets_and_settings() {
    let store = load_fixture_store();
    let tv = store.get(SECTION, "tv").unwrap();

    let video: Vec<&str> = tv.video_targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(video, vec!["hevc_to_h264", "mkv_to_ts"]);
    let audio: Vec<&str> = tv.audio_targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(audio, vec!["lossless_to_mp3"]);
    assert!(tv.image_targets.is_empty());
    assert_eq!(tv.settings.audio.default_bitrate, 256);

    let (profile, _) = tv.resolve_video(&make_mkv_movie(), "").unwrap();
    assert_eq!(profile.name, "mkv_to_ts");
    let (profile, _) = tv.resolve_video(&make_hevc_movie(), "").unwrap();
    assert_eq!(profile.name, "hevc_to_h264");
}

// ---------------------------------------------------------------------------
// Planning through the shared snapshot
// ---------------------------------------------------------------------------

#[test]
fn shared_profiles_plan_video() {
    let shared = SharedProfiles::new();
    shared.publish(load_fixture_store());

    let plan = shared
        .video_plan(SECTION, "generic", &make_mkv_movie(), "de", &PlanOptions::new("job-7"))
        .unwrap()
        .unwrap();
    assert_eq!(plan.transcode_id, "job-7");
    assert_eq!(plan.profile, "mkv_to_ts");
    assert_eq!(plan.output.container, VideoContainer::Mpeg2Ts);
    assert_eq!(plan.output.audio_codec, AudioCodec::Ac3);
    assert_eq!(plan.output.audio_bitrate, Some(256));
    assert_eq!(plan.source_audio.unwrap().language.as_deref(), Some("de"));
    assert_eq!(plan.subtitle_support, SubtitleSupport::SoftCoded);
}

#[test]
fn shared_profiles_plan_audio_and_image() {
    let shared = SharedProfiles::new();
    shared.publish(load_fixture_store());

    let flac = MetadataContainer {
        metadata: sf_probe::Metadata {
            audio_container: AudioContainer::Flac,
            ..Default::default()
        },
        audio: vec![audio_stream(0, AudioCodec::Flac, None, 2)],
        ..Default::default()
    };
    let plan = shared
        .audio_plan(SECTION, "tv", &flac, &PlanOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(plan.output.container, AudioContainer::Mp3);

    let plan = shared
        .image_plan(SECTION, "generic", &make_photo(6000, 4000, 1), &PlanOptions::default())
        .unwrap()
        .unwrap();
    assert!(plan.synthesized);
    assert_eq!(plan.output.quality, QualityMode::Best);
}

#[test]
fn shared_profiles_concurrent_readers_and_republish() {
    let shared = Arc::new(SharedProfiles::new());
    shared.publish(load_fixture_store());

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                let snapshot = shared.snapshot().unwrap();
                let registry = snapshot.get(SECTION, "generic").unwrap();
                let probe = make_mkv_movie();
                (0..100).all(|_| registry.resolve_video(&probe, "de,en").is_some())
            })
        })
        .collect();

    shared.publish(load_fixture_store());

    for reader in readers {
        assert!(reader.join().unwrap());
    }
}
