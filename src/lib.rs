//! sceneforged-transcode - transcoding target resolution tool
//!
//! This library crate exposes the loading and reporting helpers used by the
//! binary for integration testing.

pub mod loader;
pub mod report;
