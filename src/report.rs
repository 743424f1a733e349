//! Human-readable rendering of planned jobs.

use sf_transcode::{AudioTranscoding, ImageTranscoding, VideoTranscoding};
use std::fmt::Write;

/// Render a video plan.
pub fn video(plan: &VideoTranscoding) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Profile: {}", plan.profile);
    let v = &plan.source_video;
    let _ = writeln!(
        out,
        "Source: {} {} {}x{}",
        plan.source_container, v.codec, v.width, v.height
    );
    if let Some(ref audio) = plan.source_audio {
        let _ = write!(out, "Audio: [{}] {} {}ch", audio.stream_index, audio.codec, audio.channels);
        if let Some(ref lang) = audio.language {
            let _ = write!(out, " ({})", lang);
        }
        let _ = writeln!(out);
    }

    let o = &plan.output;
    if o.copy_video {
        let _ = writeln!(out, "Target: {} (stream copy)", o.container);
    } else {
        let _ = writeln!(
            out,
            "Target: {} {} {} level {} preset {} quality {} max {}p",
            o.container,
            o.video_codec,
            o.profile,
            o.level.map_or_else(|| "-".to_string(), |l| format!("{l:.1}")),
            o.preset,
            o.quality,
            o.max_height
        );
    }
    if o.copy_audio {
        let _ = writeln!(out, "Target audio: {} (stream copy)", o.audio_codec);
    } else {
        let _ = write!(out, "Target audio: {}", o.audio_codec);
        if let Some(bitrate) = o.audio_bitrate {
            let _ = write!(out, " {} kbit/s", bitrate);
        }
        if o.force_stereo {
            let _ = write!(out, " [stereo]");
        }
        let _ = writeln!(out);
    }
    let _ = write!(out, "Subtitles: {}", plan.subtitle_support);
    if !plan.subtitles.is_empty() {
        let _ = write!(out, " ({} delivered)", plan.subtitles.len());
    }
    let _ = writeln!(out);
    if plan.live {
        let _ = writeln!(out, "Live: yes");
    }
    if let Some(ref transcoder) = plan.transcoder {
        let _ = writeln!(out, "Transcoder: {}", transcoder.bin_path.display());
    }
    out
}

/// Render an audio plan.
pub fn audio(plan: &AudioTranscoding) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Profile: {}", plan.profile);
    let a = &plan.source_audio;
    let _ = writeln!(
        out,
        "Source: {} {} {}ch",
        plan.source_container, a.codec, a.channels
    );
    let o = &plan.output;
    if o.copy {
        let _ = writeln!(out, "Target: {} {} (stream copy)", o.container, o.codec);
    } else {
        let _ = write!(out, "Target: {} {}", o.container, o.codec);
        if let Some(bitrate) = o.bitrate {
            let _ = write!(out, " {} kbit/s", bitrate);
        }
        if o.force_stereo {
            let _ = write!(out, " [stereo]");
        }
        let _ = writeln!(out);
    }
    if plan.live {
        let _ = writeln!(out, "Live: yes");
    }
    out
}

/// Render an image plan.
pub fn image(plan: &ImageTranscoding) -> String {
    let mut out = String::new();
    let _ = write!(out, "Profile: {}", plan.profile);
    if plan.synthesized {
        let _ = write!(out, " [fallback]");
    }
    let _ = writeln!(out);
    let i = &plan.source_image;
    let _ = writeln!(
        out,
        "Source: {} {}x{} orientation {}",
        plan.source_container, i.width, i.height, i.orientation
    );
    let o = &plan.output;
    let _ = writeln!(
        out,
        "Target: {} {} quality {} max {}x{}{}",
        o.container,
        o.pixel_format,
        o.quality,
        o.max_width,
        o.max_height,
        if o.auto_rotate { " [auto-rotate]" } else { "" }
    );
    out
}
