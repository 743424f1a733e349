//! # sf-probe
//!
//! Normalized probe description consumed by transcoding decisions.
//!
//! A prober (ffprobe, a pure-Rust parser, a database cache) turns a source
//! item into a [`MetadataContainer`]:
//!
//! - item-level attributes (containers per media kind, brand, duration)
//! - video streams with codec, resolution, profile and H.264 levels
//! - audio streams with codec, language, channels and sample rate
//! - subtitle streams
//! - image attributes (size, orientation, pixel format)
//!
//! ## Quick start
//!
//! ```
//! use sf_probe::MetadataContainer;
//!
//! let json = r#"{"audio": [{"stream_index": 1, "language": "eng", "default": true}]}"#;
//! let info: MetadataContainer = serde_json::from_str(json).unwrap();
//! assert_eq!(info.first_audio_stream(), Some(0));
//! ```

pub mod types;

// Re-export key types at crate root for convenience.
pub use types::{AudioStream, ImageInfo, Metadata, MetadataContainer, SubtitleStream, VideoStream};
