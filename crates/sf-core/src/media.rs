//! Media-domain enums for containers, codecs, pixel formats, encoder knobs and
//! subtitle handling.
//!
//! Every enum serializes to its lowercase name, implements `Display` with the
//! same string, and parses case-insensitively through both `FromStr` and
//! `Deserialize` so hand-written profile definitions can use `"MP4"` or
//! `"mp4"` alike.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Generate a closed media vocabulary.
///
/// The macro produces an enum with:
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Default`,
///   `Serialize` (each variant renamed to its string form)
/// - `ALL` listing the variants in declaration order
/// - `as_str()`, `Display`, and a case-insensitive `FromStr` that
///   `Deserialize` goes through
macro_rules! media_enum {
    (
        $(#[doc = $doc:expr])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical lowercase name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        Error::Validation(format!("unknown {} '{}'", stringify!($name), s))
                    })
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

media_enum! {
    /// Video container formats.
    VideoContainer {
        #[default]
        Unknown => "unknown",
        Asf => "asf",
        Avi => "avi",
        Flv => "flv",
        Gp3 => "3gp",
        Hls => "hls",
        M2ts => "m2ts",
        Matroska => "matroska",
        Mp4 => "mp4",
        Mpeg1 => "mpeg1",
        Mpeg2Ps => "mpeg2ps",
        Mpeg2Ts => "mpeg2ts",
        Ogg => "ogg",
        RealMedia => "realmedia",
        WebM => "webm",
        Wtv => "wtv",
    }
}

media_enum! {
    /// Audio-only container formats.
    AudioContainer {
        #[default]
        Unknown => "unknown",
        Ac3 => "ac3",
        Adts => "adts",
        Ape => "ape",
        Asf => "asf",
        Flac => "flac",
        Flv => "flv",
        Lpcm => "lpcm",
        Mp2 => "mp2",
        Mp3 => "mp3",
        Mp4 => "mp4",
        MusePack => "musepack",
        Ogg => "ogg",
        Wav => "wav",
        WavPack => "wavpack",
    }
}

media_enum! {
    /// Image file formats.
    ImageContainer {
        #[default]
        Unknown => "unknown",
        Bmp => "bmp",
        Gif => "gif",
        Jpeg => "jpeg",
        Png => "png",
        Raw => "raw",
        Tiff => "tiff",
    }
}

// ---------------------------------------------------------------------------
// Codecs
// ---------------------------------------------------------------------------

media_enum! {
    /// Video codecs.
    VideoCodec {
        #[default]
        Unknown => "unknown",
        Mpeg1 => "mpeg1",
        Mpeg2 => "mpeg2",
        Mpeg4 => "mpeg4",
        H264 => "h264",
        H265 => "h265",
        Vc1 => "vc1",
        Wmv => "wmv",
        Mjpeg => "mjpeg",
        Vp8 => "vp8",
        Vp9 => "vp9",
        Av1 => "av1",
    }
}

media_enum! {
    /// Audio codecs.
    AudioCodec {
        #[default]
        Unknown => "unknown",
        Aac => "aac",
        Ac3 => "ac3",
        Amr => "amr",
        Dts => "dts",
        DtsHd => "dtshd",
        Eac3 => "eac3",
        Flac => "flac",
        Lpcm => "lpcm",
        Mp1 => "mp1",
        Mp2 => "mp2",
        Mp3 => "mp3",
        Opus => "opus",
        TrueHd => "truehd",
        Vorbis => "vorbis",
        Wma => "wma",
        WmaPro => "wmapro",
    }
}

media_enum! {
    /// Subtitle formats.
    SubtitleCodec {
        #[default]
        Unknown => "unknown",
        Ass => "ass",
        DvbSub => "dvbsub",
        MicroDvd => "microdvd",
        Pgs => "pgs",
        Smi => "smi",
        Srt => "srt",
        Ssa => "ssa",
        SubView => "subview",
        Teletext => "teletext",
        VobSub => "vobsub",
        WebVtt => "webvtt",
    }
}

// ---------------------------------------------------------------------------
// Picture / encoder parameters
// ---------------------------------------------------------------------------

media_enum! {
    /// Chroma subsampling / pixel layout.
    PixelFormat {
        #[default]
        Unknown => "unknown",
        Yuv411 => "yuv411",
        Yuv420 => "yuv420",
        Yuv422 => "yuv422",
        Yuv440 => "yuv440",
        Yuv444 => "yuv444",
        Argb32 => "argb32",
    }
}

media_enum! {
    /// Codec profile (H.264 / H.265 / MPEG-2 vocabulary).
    EncodingProfile {
        #[default]
        Unknown => "unknown",
        Simple => "simple",
        Baseline => "baseline",
        Main => "main",
        Main10 => "main10",
        High => "high",
        High10 => "high10",
        High422 => "high422",
        High444 => "high444",
    }
}

media_enum! {
    /// Encoder speed/quality preset.
    EncodingPreset {
        #[default]
        Default => "default",
        Ultrafast => "ultrafast",
        Superfast => "superfast",
        Veryfast => "veryfast",
        Faster => "faster",
        Fast => "fast",
        Medium => "medium",
        Slow => "slow",
        Slower => "slower",
        Veryslow => "veryslow",
        Placebo => "placebo",
    }
}

media_enum! {
    /// Output quality mode.
    QualityMode {
        #[default]
        Default => "default",
        Low => "low",
        Normal => "normal",
        Best => "best",
        Custom => "custom",
    }
}

media_enum! {
    /// Which H.264 level a compatibility check compares against.
    ///
    /// - `header`: the level signalled in the SPS header.
    /// - `reference`: the level implied by resolution and reference frames.
    /// - `any`: the larger of both, so either one exceeding a limit counts.
    LevelCheck {
        #[default]
        Any => "any",
        Header => "header",
        Reference => "reference",
    }
}

media_enum! {
    /// How a client handles subtitles.
    SubtitleSupport {
        #[default]
        None => "none",
        Embedded => "embedded",
        SoftCoded => "softcoded",
        HardCoded => "hardcoded",
    }
}
