use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sceneforged-transcode")]
#[command(author, version, about = "Transcoding target resolution for media delivery")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the transcoding plan for a probed media item
    Resolve {
        /// Probe result (JSON) describing the media item
        #[arg(required = true)]
        probe: PathBuf,

        /// Kind of media to resolve
        #[arg(short, long, value_enum, default_value_t = MediaKind::Video)]
        kind: MediaKind,

        /// Profile definitions file (overrides profiles.path from the config)
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Section the profile is registered under
        #[arg(long)]
        section: Option<String>,

        /// Profile to resolve against (defaults to profiles.default_profile)
        #[arg(short, long)]
        profile: Option<String>,

        /// Preferred audio languages, comma-separated, highest priority first
        #[arg(short, long)]
        languages: Option<String>,

        /// Plan a live stream copy instead of a profile transcode
        #[arg(long)]
        live: bool,

        /// Identifier recorded on the planned job
        #[arg(long, default_value = "cli")]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration and profile definitions
    Validate {
        /// Profile definitions file (overrides profiles.path from the config)
        #[arg(long)]
        profiles: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}
