//! sf-core: shared media vocabulary, errors and configuration.
//!
//! This crate is the foundational dependency for the other sf-* crates,
//! providing the media-domain enums used by probes and profiles, a unified
//! error type, and application configuration.

pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;
