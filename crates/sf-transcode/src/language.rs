//! Audio stream selection by client language preference.

use sf_probe::MetadataContainer;

use crate::settings::DefaultAudioStream;

/// Split a comma-separated preference list into its non-empty entries,
/// highest priority first.
pub fn parse_preferences(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Choose the audio stream to use for the given preference list.
///
/// The stream whose language equals (case-insensitively) the entry with the
/// lowest list position wins; among streams with the same language the first
/// in probe order wins. Without any language match the `fallback` policy
/// decides. Returns `None` only when the probe has no audio stream.
pub fn select_audio_stream(
    probe: &MetadataContainer,
    preferred: &str,
    fallback: DefaultAudioStream,
) -> Option<usize> {
    if probe.audio.is_empty() {
        return None;
    }

    let preferences = parse_preferences(preferred);
    let mut best: Option<(usize, usize)> = None;

    for (position, stream) in probe.audio.iter().enumerate() {
        let Some(language) = stream.language.as_deref() else {
            continue;
        };
        let Some(priority) = preferences
            .iter()
            .position(|p| p.eq_ignore_ascii_case(language.trim()))
        else {
            continue;
        };
        if best.map_or(true, |(best_priority, _)| priority < best_priority) {
            best = Some((priority, position));
        }
    }

    best.map(|(_, position)| position)
        .or_else(|| fallback.pick(probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_probe::AudioStream;

    fn make_probe(languages: &[Option<&str>]) -> MetadataContainer {
        MetadataContainer {
            audio: languages
                .iter()
                .enumerate()
                .map(|(i, lang)| AudioStream {
                    stream_index: i as u32 + 1,
                    language: lang.map(str::to_string),
                    channels: 2,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn parse_drops_empty_entries() {
        assert_eq!(parse_preferences("de, ,en,,"), vec!["de", "en"]);
        assert!(parse_preferences("").is_empty());
        assert!(parse_preferences(",,").is_empty());
    }

    #[test]
    fn highest_priority_language_wins() {
        let probe = make_probe(&[Some("en"), Some("de")]);
        assert_eq!(
            select_audio_stream(&probe, "de,en", DefaultAudioStream::FirstIndex),
            Some(1)
        );
        assert_eq!(
            select_audio_stream(&probe, "en,de", DefaultAudioStream::FirstIndex),
            Some(0)
        );
    }

    #[test]
    fn comparison_ignores_case() {
        let probe = make_probe(&[Some("fr"), Some("EN")]);
        assert_eq!(
            select_audio_stream(&probe, "en", DefaultAudioStream::FirstIndex),
            Some(1)
        );
    }

    #[test]
    fn first_stream_wins_among_equals() {
        let probe = make_probe(&[Some("fr"), Some("de"), Some("de")]);
        assert_eq!(
            select_audio_stream(&probe, "de", DefaultAudioStream::FirstIndex),
            Some(1)
        );
    }

    #[test]
    fn no_match_uses_fallback() {
        let mut probe = make_probe(&[Some("fr"), None]);
        probe.audio[1].default = true;
        assert_eq!(
            select_audio_stream(&probe, "de,en", DefaultAudioStream::FirstIndex),
            Some(0)
        );
        assert_eq!(
            select_audio_stream(&probe, "de,en", DefaultAudioStream::Designated),
            Some(1)
        );
    }

    #[test]
    fn malformed_preferences_are_tolerated() {
        let probe = make_probe(&[Some("fr"), Some("de")]);
        assert_eq!(
            select_audio_stream(&probe, ",,,", DefaultAudioStream::FirstIndex),
            Some(0)
        );
        assert_eq!(
            select_audio_stream(&probe, " ,xx, de", DefaultAudioStream::FirstIndex),
            Some(1)
        );
    }

    #[test]
    fn no_audio_is_none() {
        let probe = MetadataContainer::default();
        assert_eq!(
            select_audio_stream(&probe, "en", DefaultAudioStream::FirstIndex),
            None
        );
    }
}
