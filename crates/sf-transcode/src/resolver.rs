//! First-match resolution over an ordered list of profiles, and the match
//! records it produces.

use sf_probe::MetadataContainer;
use std::borrow::Cow;

use crate::matcher::{AudioSource, ImageSource, SourceMatcher, VideoSource};
use crate::target::TranscodingTarget;

/// Result of a successful video resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMatch<'a> {
    /// The matcher that accepted the probe.
    pub source: &'a VideoSource,
    /// Position of the selected audio stream.
    pub audio_stream: Option<usize>,
}

/// Result of a successful audio resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMatch<'a> {
    pub source: &'a AudioSource,
    pub audio_stream: Option<usize>,
}

/// Result of a successful image resolution.
///
/// A synthesized match owns a default matcher; an explicit one borrows from
/// the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMatch<'a> {
    pub source: Cow<'a, ImageSource>,
    pub synthesized: bool,
}

/// Return the first profile, in order, with a source that matches the probe,
/// together with that source.
///
/// Profiles are tried in slice order and each profile's sources in
/// declaration order; evaluation stops at the first match.
pub fn first_match<'a, S, T>(
    profiles: &'a [TranscodingTarget<S, T>],
    probe: &MetadataContainer,
    ctx: S::Context,
) -> Option<(&'a TranscodingTarget<S, T>, &'a S)>
where
    S: SourceMatcher,
{
    profiles
        .iter()
        .find_map(|profile| profile.matching_source(probe, ctx).map(|s| (profile, s)))
}
