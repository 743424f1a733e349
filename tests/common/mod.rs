//! Shared helpers for integration tests.
//!
//! Fixture paths, a loaded profile store and hand-built probes.

#![allow(dead_code)]

use std::path::PathBuf;

use sf_core::{
    AudioCodec, EncodingProfile, ImageContainer, PixelFormat, VideoCodec, VideoContainer,
};
use sf_probe::{AudioStream, ImageInfo, Metadata, MetadataContainer, VideoStream};
use sf_transcode::ProfileStore;

/// Section the fixture profiles are loaded under.
pub const SECTION: &str = "default";

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn profiles_path() -> PathBuf {
    fixtures_dir().join("profiles.json")
}

pub fn probe_path(name: &str) -> PathBuf {
    fixtures_dir().join("probes").join(name)
}

/// Load `tests/fixtures/profiles.json` into a new store.
pub fn load_fixture_store() -> ProfileStore {
    let mut store = ProfileStore::new();
    store
        .load_file(SECTION, &profiles_path())
        .expect("fixture profiles should load");
    store
}

pub fn audio_stream(stream_index: u32, codec: AudioCodec, lang: Option<&str>, channels: u32) -> AudioStream {
    AudioStream {
        stream_index,
        codec,
        language: lang.map(str::to_string),
        channels,
        frequency: Some(48000),
        ..Default::default()
    }
}

/// A 1080p H.264 Matroska movie with English and German audio.
pub fn make_mkv_movie() -> MetadataContainer {
    MetadataContainer {
        metadata: Metadata {
            source: Some("/movies/holiday.mkv".to_string()),
            video_container: VideoContainer::Matroska,
            ..Default::default()
        },
        video: vec![VideoStream {
            codec: VideoCodec::H264,
            width: 1920,
            height: 1080,
            pixel_format: PixelFormat::Yuv420,
            profile: EncodingProfile::High,
            header_level: Some(4.1),
            ..Default::default()
        }],
        audio: vec![
            audio_stream(1, AudioCodec::Ac3, Some("en"), 6),
            audio_stream(2, AudioCodec::Aac, Some("de"), 2),
        ],
        ..Default::default()
    }
}

/// A 4K HEVC movie in an MP4 container.
pub fn make_hevc_movie() -> MetadataContainer {
    MetadataContainer {
        metadata: Metadata {
            video_container: VideoContainer::Mp4,
            ..Default::default()
        },
        video: vec![VideoStream {
            codec: VideoCodec::H265,
            width: 3840,
            height: 2160,
            profile: EncodingProfile::Main10,
            ..Default::default()
        }],
        audio: vec![audio_stream(1, AudioCodec::Eac3, Some("en"), 6)],
        ..Default::default()
    }
}

pub fn make_photo(width: u32, height: u32, orientation: u8) -> MetadataContainer {
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
