// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! VideoSort: sort downloaded movies and TV shows
//!
//! Post-processing command for download managers. Exit status: 93 when
//! something was moved, 95 when nothing was, 94 on error.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use videosort::guess::ExternalHints;
use videosort::{BatchJob, BatchOutcome, SceneNameEngine, SortConfig, Sorter};

/// VideoSort CLI - movie and TV show sorter
#[derive(Parser, Debug)]
#[command(name = "videosort")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "3.0.0")]
#[command(about = "Sort downloaded movies and TV shows into a templated layout", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort every video of a download directory
    Sort {
        /// Download directory
        dir: PathBuf,

        /// Release name (default: directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Download category
        #[arg(long, default_value = "")]
        category: String,

        /// Show destinations without moving anything
        #[arg(long)]
        preview: bool,

        /// Show or movie name supplied by the indexer
        #[arg(long)]
        proper_name: Option<String>,

        /// Episode name supplied by the indexer
        #[arg(long)]
        episode_name: Option<String>,

        /// Movie year supplied by the indexer
        #[arg(long)]
        movie_year: Option<u32>,

        /// Info link supplied by the indexer
        #[arg(long)]
        more_info: Option<String>,
    },

    /// Show what would be inferred for a single file
    Guess {
        /// Video file
        path: PathBuf,

        /// Download directory (default: the file's directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Download category
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(BatchOutcome::Failed.exit_code())
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = SortConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Sort {
            dir,
            name,
            category,
            preview,
            proper_name,
            episode_name,
            movie_year,
            more_info,
        } => {
            let hints = ExternalHints {
                proper_name,
                episode_name,
                movie_year,
                more_info,
            };
            run_sort(config, dir, name, category, preview, hints, &cli.format)
        }
        Commands::Guess {
            path,
            dir,
            category,
        } => {
            run_guess(config, &path, dir, category, &cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            run_config_command(config, action, &cli.config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Sort one download directory
fn run_sort(
    mut config: SortConfig,
    dir: PathBuf,
    name: Option<String>,
    category: String,
    preview: bool,
    hints: ExternalHints,
    format: &str,
) -> anyhow::Result<ExitCode> {
    config.validate().context("Invalid configuration")?;
    config.rules.preview |= preview;

    if !dir.is_dir() {
        bail!("Download directory {} does not exist", dir.display());
    }

    let mut job = BatchJob::new(&dir);
    if let Some(name) = name {
        job.release_name = name;
    }
    job.category = category;
    job.hints = hints;

    info!("Sorting {}", dir.display());
    let engine = SceneNameEngine::new();
    let report = Sorter::new(&config, &engine).run(&job);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if report.outcome == BatchOutcome::NothingMoved {
        warn!("Nothing was moved");
    }

    Ok(ExitCode::from(report.outcome.exit_code()))
}

/// Print inferred attributes and destination for one file
fn run_guess(
    config: SortConfig,
    path: &Path,
    dir: Option<PathBuf>,
    category: String,
    format: &str,
) -> anyhow::Result<()> {
    let dir = match dir.or_else(|| path.parent().map(Path::to_path_buf)) {
        Some(dir) => dir,
        None => bail!("Cannot determine download directory for {}", path.display()),
    };

    let mut job = BatchJob::new(dir);
    job.category = category;

    let engine = SceneNameEngine::new();
    let resolution = Sorter::new(&config, &engine)
        .resolve(&job, path, false)
        .with_context(|| format!("Failed to guess {}", path.display()))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    println!("Guessed name: {}", resolution.guess.name);
    match resolution.guess.classification {
        Some(kind) => println!("Type: {}", kind),
        None => println!("Type: unknown"),
    }
    println!("{}", serde_json::to_string_pretty(&resolution.guess.attributes)?);
    match resolution.destination {
        Some(dest) => println!("destination path: {}", dest.display()),
        None => println!("No move"),
    }

    Ok(())
}

/// Run config commands
fn run_config_command(config: SortConfig, action: ConfigCommands, config_path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            SortConfig::default()
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Movies: {}", config.formats.movies);
            println!("  Series: {}", config.formats.series);
            println!("  Dated: {}", config.formats.dated);
            println!("  Other TV: {}", config.formats.other_tv);
            println!("  Video extensions: {}", config.extensions.video.join(","));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_sort_command() {
        let cli = Cli::try_parse_from([
            "videosort", "sort", "/tmp/download", "--preview", "--category", "tv",
            "--movie-year", "2010",
        ])
        .unwrap();
        assert!(!cli.verbose);

        match cli.command {
            Commands::Sort { dir, preview, category, movie_year, name, .. } => {
                assert!(preview);
                assert_eq!(dir, PathBuf::from("/tmp/download"));
                assert_eq!(category, "tv");
                assert_eq!(movie_year, Some(2010));
                assert_eq!(name, None);
            }
            _ => panic!("Expected Sort command"),
        }
    }

    #[test]
    fn test_cli_guess_command() {
        let cli = Cli::try_parse_from([
            "videosort", "-v", "guess", "/tmp/Show.S01E02.mkv", "--format", "json"
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, "json");

        match cli.command {
            Commands::Guess { path, dir, .. } => {
                assert_eq!(path, PathBuf::from("/tmp/Show.S01E02.mkv"));
                assert_eq!(dir, None);
            }
            _ => panic!("Expected Guess command"),
        }
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["videosort"]).is_err());
        assert!(Cli::try_parse_from(["videosort", "sort", "/x", "--movie-year", "abc"]).is_err());
    }
}
