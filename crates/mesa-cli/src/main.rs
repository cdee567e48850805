//! # mesa CLI entry point
//!
//! Parses command-line arguments, merges configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mesa_cli::config::Settings;
use mesa_cli::export::{run_export, ExportArgs};
use mesa_cli::get::{run_get, GetArgs};
use mesa_cli::query::{run_query, QueryArgs};
use mesa_cli::reference::{run_reference, ReferenceArgs};
use mesa_cli::validate::{run_validate, ValidateArgs};

/// MESA: attribution enforcement for discourse graphs.
///
/// Validates graph documents, retrieves and exports nodes with their
/// Creative Commons attribution attached, and creates references.
#[derive(Parser, Debug)]
#[command(name = "mesa", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing the MESA JSON schemas.
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a graph against the schema and the attribution policy.
    Validate(ValidateArgs),

    /// Retrieve one node with its attribution.
    Get(GetArgs),

    /// List retrievable nodes matching exact field filters.
    Query(QueryArgs),

    /// Export several nodes as JSON or citations.
    Export(ExportArgs),

    /// Create a reference to a node.
    Reference(ReferenceArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let settings = match Settings::resolve(cli.config.as_deref(), cli.schema_dir.as_deref(), &cwd)
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(?settings, "resolved settings");

    let mut out = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, &settings, &mut out),
        Commands::Get(args) => run_get(args, &settings, &mut out),
        Commands::Query(args) => run_query(args, &settings, &mut out),
        Commands::Export(args) => run_export(args, &settings, &mut out),
        Commands::Reference(args) => run_reference(args, &settings, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
