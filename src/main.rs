mod cli;

use sceneforged_transcode::{loader, report};

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, MediaKind};
use sf_core::config::Config;
use sf_transcode::{live_audio, live_video, DefaultAudioStream, PlanOptions};
use std::path::{Path, PathBuf};

struct ResolveArgs {
    probe: PathBuf,
    kind: MediaKind,
    profiles: Option<PathBuf>,
    section: Option<String>,
    profile: Option<String>,
    languages: Option<String>,
    live: bool,
    id: String,
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "sceneforged_transcode=debug,sf_transcode=trace,sf_core=debug".to_string()
        } else {
            "sceneforged_transcode=info,sf_transcode=warn,sf_core=warn".to_string()
        }
    });

    // Plans go to stdout; keep logs off it so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            probe,
            kind,
            profiles,
            section,
            profile,
            languages,
            live,
            id,
            json,
        } => resolve(
            cli.config.as_deref(),
            ResolveArgs {
                probe,
                kind,
                profiles,
                section,
                profile,
                languages,
                live,
                id,
                json,
            },
        ),
        Commands::Validate { profiles } => validate(cli.config.as_deref(), profiles.as_deref()),
        Commands::Version => {
            println!("sceneforged-transcode {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn print_plan<T: serde::Serialize>(
    plan: Option<&T>,
    json: bool,
    render: fn(&T) -> String,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }
    match plan {
        Some(plan) => print!("{}", render(plan)),
        None => println!("No transcoding required."),
    }
    Ok(())
}

fn resolve(config_path: Option<&Path>, args: ResolveArgs) -> Result<()> {
    let mut config = Config::load_or_default(config_path);
    if let Some(section) = args.section {
        config.profiles.section = section;
    }
    let languages = args
        .languages
        .unwrap_or_else(|| config.languages.preferred_audio.clone());

    let probe = loader::load_probe(&args.probe)?;
    tracing::debug!(
        video = probe.video.len(),
        audio = probe.audio.len(),
        image = probe.image.is_some(),
        "Loaded probe"
    );

    let section = config.profiles.section.clone();
    let profile = args
        .profile
        .unwrap_or_else(|| config.profiles.default_profile.clone());

    if args.live {
        // Copy plans need no targets; only the profile's stream policy.
        let fallback = if args.profiles.is_some() || config.profiles.path.is_some() {
            let shared = loader::load_shared(&config, args.profiles.as_deref())?;
            shared
                .registry(&section, &profile)?
                .settings
                .audio
                .default_stream
        } else {
            DefaultAudioStream::default()
        };
        tracing::debug!(?fallback, "Planning live stream copy");
        return match args.kind {
            MediaKind::Video => print_plan(
                live_video(&probe, &languages, fallback, &args.id).as_ref(),
                args.json,
                report::video,
            ),
            MediaKind::Audio => print_plan(
                live_audio(&probe, fallback, &args.id).as_ref(),
                args.json,
                report::audio,
            ),
            MediaKind::Image => bail!("Live streaming is not available for images"),
        };
    }

    let shared = loader::load_shared(&config, args.profiles.as_deref())?;
    tracing::info!(section = %section, profile = %profile, "Resolving {:?} plan", args.kind);

    let options = PlanOptions::new(args.id);
    match args.kind {
        MediaKind::Video => {
            let plan = shared.video_plan(&section, &profile, &probe, &languages, &options)?;
            print_plan(plan.as_ref(), args.json, report::video)
        }
        MediaKind::Audio => {
            let plan = shared.audio_plan(&section, &profile, &probe, &options)?;
            print_plan(plan.as_ref(), args.json, report::audio)
        }
        MediaKind::Image => {
            let plan = shared.image_plan(&section, &profile, &probe, &options)?;
            print_plan(plan.as_ref(), args.json, report::image)
        }
    }
}

fn validate(config_path: Option<&Path>, profiles: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read config file {}", p.display()))?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    let section = config.profiles.section.as_str();
    println!("  Section: {}", section);
    println!("  Default profile: {}", config.profiles.default_profile);
    println!("  Preferred audio: {}", config.languages.preferred_audio);
    for warning in config.validate() {
        if profiles.is_some() && warning.starts_with("profiles.path") {
            continue;
        }
        println!("  warning: {}", warning);
    }

    if profiles.is_none() && config.profiles.path.is_none() {
        println!("No profile definitions to validate");
        return Ok(());
    }

    let store = loader::load_store(&config, profiles)?;
    let names = store.profile_names(section);
    println!("✓ Profile definitions are valid");
    println!("  Profiles: {}", names.len());
    for name in names {
        let registry = store.get(section, name)?;
        println!(
            "    {}: {} video, {} audio, {} image targets",
            name,
            registry.video_targets.len(),
            registry.audio_targets.len(),
            registry.image_targets.len()
        );
        for warning in registry.validate() {
            println!("      warning: {}", warning);
        }
    }
    if !store.contains(section, &config.profiles.default_profile) {
        println!(
            "  warning: default profile '{}' is not defined",
            config.profiles.default_profile
        );
    }

    Ok(())
}
