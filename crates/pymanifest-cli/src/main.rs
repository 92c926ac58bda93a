//! pymanifest CLI - check `pyproject.toml` manifests for the uv build backend

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod check;
mod logging;
mod show;

#[derive(Parser)]
#[command(name = "pymanifest")]
#[command(version)]
#[command(about = "Validate pyproject.toml manifests for the uv build backend", long_about = None)]
struct Cli {
    /// Logging level; falls back to `PYMANIFEST_LOG`, then `warn`
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a manifest
    Check {
        /// Path to `pyproject.toml` or its directory (defaults to searching upward)
        #[arg(long, value_name = "PATH")]
        manifest_path: Option<PathBuf>,

        /// Also check that the files the manifest refers to exist
        #[arg(long)]
        tree: bool,

        /// Fail unless `requires-python` admits this interpreter version
        #[arg(long, value_name = "VERSION")]
        python: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = check::OutputFormat::Text)]
        format: check::OutputFormat,
    },

    /// Print the validated manifest as JSON
    Show {
        /// Path to `pyproject.toml` or its directory (defaults to searching upward)
        #[arg(long, value_name = "PATH")]
        manifest_path: Option<PathBuf>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level)?;

    match cli.command {
        Commands::Check {
            manifest_path,
            tree,
            python,
            format,
        } => {
            let options = check::CheckOptions {
                manifest_path,
                tree,
                python,
            };
            let report = check::run_check(&options)?;
            report.print(format)?;
        }

        Commands::Show { manifest_path } => {
            show::show_manifest(manifest_path.as_deref())?;
        }
    }

    Ok(())
}
