use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplelog::LevelFilter;
use tablesurvey::config::{self, Config};

mod convert;
mod extract;
mod inputarg;
mod project;

const CONFIG_FILENAME: &str = "config.yaml";

/// Converts a table extracted from a PDF into CSV files and a SurveyJS survey.
#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Logging level.
    #[arg(long, default_value = "Warn")]
    log_level: LevelFilter,

    /// Path to a YAML configuration file. Defaults to `tablesurvey/config.yaml` in the XDG config
    /// directories, if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    Extract(extract::Command),
    Convert(convert::Command),
    Project(project::Command),
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    let xdg_dirs = xdg::BaseDirectories::with_prefix("tablesurvey");
    let cfg = load_config(args.config.as_deref(), &xdg_dirs)?;

    use Command::*;
    match &args.command {
        Extract(cmd) => extract::run(cmd, &cfg),
        Convert(cmd) => convert::run(cmd, &cfg),
        Project(cmd) => project::run(cmd, &cfg),
    }
}

/// Loads configuration from `explicit_path` if given, otherwise from the first XDG config file
/// found. With neither, every setting takes its default.
fn load_config(explicit_path: Option<&Path>, xdg_dirs: &xdg::BaseDirectories) -> Result<Config> {
    if let Some(path) = explicit_path {
        return config::load_config(path);
    }
    match xdg_dirs.find_config_file(CONFIG_FILENAME) {
        Some(path) => config::load_config(&path),
        None => {
            log::debug!("No configuration file found; using defaults.");
            Ok(Config::default())
        }
    }
}
