// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Shutter: AI-assisted macOS screenshot renamer
//!
//! Renames screenshot files to datetime, timestamp, date, or
//! vision-model-derived names.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing::debug;

use shutter::config::AppConfig;
use shutter::naming::{NamingMode, NamingOptions};
use shutter::renamer::Renamer;
use shutter::{Result, ShutterError};

/// Shutter CLI - AI-assisted macOS screenshot renamer
#[derive(Parser, Debug)]
#[command(name = "shutter")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Rename macOS screenshots with configurable naming patterns", long_about = None)]
#[command(group(ArgGroup::new("target").required(true).args(["file", "folder"])))]
struct Cli {
    /// Screenshot file to rename
    file: Option<PathBuf>,

    /// Folder containing screenshots to rename
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Search for screenshots recursively in subdirectories
    #[arg(short, long, requires = "folder")]
    recursive: bool,

    /// Naming pattern ('ai'/'content' use the vision model)
    #[arg(short, long, default_value = "datetime", value_parser = ["datetime", "timestamp", "date", "ai", "content"])]
    pattern: String,

    /// Prefix to add to the new filename
    #[arg(long)]
    prefix: Option<String>,

    /// Suffix to add to the new filename
    #[arg(long)]
    suffix: Option<String>,

    /// Show what would be renamed without actually renaming
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Rename even if the target name exists (adds a numeric suffix)
    #[arg(long)]
    force: bool,

    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "shutter.json")]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
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
        .init();

    let config = AppConfig::load(&cli.config)?;
    let mode = NamingMode::parse(&cli.pattern)?;
    debug!("Naming mode: {}", mode.as_str());

    let options = NamingOptions {
        mode,
        prefix: cli.prefix,
        suffix: cli.suffix,
    };

    let renamer = Renamer::new(config, options, cli.dry_run, cli.force);

    match (cli.file, cli.folder) {
        (Some(file), None) => renamer.run_file(&file).await,
        (None, Some(folder)) => renamer.run_folder(&folder, cli.recursive).await,
        _ => Err(ShutterError::Config(
            "Provide either a file path or --folder, not both".to_string(),
        )),
    }
}
