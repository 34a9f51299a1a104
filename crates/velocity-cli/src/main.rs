//! Velocity Demo - terminal player for the "Day in the Life" compliance demo.
//!
//! Plays the built-in scenarios step by step, with progress bars, evidence
//! reveals and manual hand-over points, driven by the same playback engine a
//! richer frontend would use.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use velocity_config::{Config, ResolvedConfig};
use velocity_playback::ScenarioCatalog;

mod commands;
mod config_bridge;
mod render;
mod theme;

use commands::play::PlayArgs;
use commands::{config, list, play, show};

/// Velocity - "Day in the Life" demo player
#[derive(Parser)]
#[command(name = "velocity-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Load configuration from this file only, skipping the layered lookup
    #[arg(long, global = true, env = "VELOCITY_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenarios
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the steps of one scenario
    Show {
        /// Scenario id
        id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a scenario (default when no command is given)
    Play(PlayArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration with source annotations
    Show {
        /// Output format: toml (default) or json
        #[arg(short, long, default_value = "toml")]
        format: String,
    },

    /// Show config file search paths
    Paths,
}

fn load_config(path: Option<&Path>, workspace_root: Option<&Path>) -> Result<ResolvedConfig> {
    let resolved = match path {
        Some(path) => {
            let config = Config::load_file(path)?;
            ResolvedConfig::from_file(config, path.display().to_string())
        },
        None => Config::load(workspace_root)?,
    };
    Ok(resolved)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let workspace_root = std::env::current_dir().ok();

    let loaded = load_config(cli.config.as_deref(), workspace_root.as_deref());

    // Set up logging from config, with --verbose override.
    let log_config = if let Ok(resolved) = &loaded {
        let mut lc = config_bridge::to_log_config(&resolved.config);
        if cli.verbose {
            "debug".clone_into(&mut lc.level);
        }
        lc
    } else {
        // Fallback so the config error itself gets logged.
        let level = if cli.verbose { "debug" } else { "warn" };
        velocity_telemetry::LogConfig::new(level).with_format(velocity_telemetry::LogFormat::Compact)
    };
    if let Err(e) = velocity_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let catalog = ScenarioCatalog::builtin();

    match cli.command {
        Some(Commands::List { json }) => list::list_scenarios(&catalog, json)?,
        Some(Commands::Show { id, json }) => show::show_scenario(&catalog, &id, json)?,
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show { format } => config::show_config(&loaded?, &format)?,
            ConfigCommands::Paths => config::show_paths(workspace_root.as_deref()),
        },
        Some(Commands::Play(args)) => play::run_play(&loaded?.config, args).await?,
        None => play::run_play(&loaded?.config, PlayArgs::default()).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn play_flags_parse() {
        let cli = Cli::parse_from([
            "velocity-demo",
            "play",
            "vendor-review",
            "--json",
            "--auto-confirm",
            "--tick-ms",
            "100",
        ]);
        let Some(Commands::Play(args)) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.scenario.as_deref(), Some("vendor-review"));
        assert!(args.json);
        assert!(args.auto_confirm);
        assert_eq!(args.tick_ms, Some(100));
        assert_eq!(args.delay_ms, None);
    }

    #[test]
    fn no_command_defaults_to_play() {
        let cli = Cli::parse_from(["velocity-demo", "-v"]);
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn explicit_config_file_is_used_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.toml");
        std::fs::write(&path, "[playback]\ntick_interval_ms = 250\n").unwrap();

        let resolved = load_config(Some(path.as_path()), None).unwrap();
        assert_eq!(resolved.config.playback.tick_interval_ms, 250);
        assert_eq!(resolved.loaded_files, [path.display().to_string()]);
    }
}
