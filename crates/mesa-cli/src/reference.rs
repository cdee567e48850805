//! # Reference Subcommand
//!
//! Create a reference to a node from `--context key=value` pairs and print
//! it as JSON. A CC-licensed source is refused unless the context echoes its
//! `sourceLink` and `creator`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use mesa_core::{Clock, SystemClock};

use crate::config::Settings;

/// Arguments for the `mesa reference` subcommand.
#[derive(Args, Debug)]
pub struct ReferenceArgs {
    /// Graph document (JSON, or YAML by extension).
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Identifier of the node being referenced.
    #[arg(value_name = "SOURCE_ID")]
    pub source_id: String,

    /// Context entry, e.g. `--context creator="Jane Smith"`. Repeatable.
    #[arg(long = "context", value_name = "KEY=VALUE", value_parser = crate::parse_pair)]
    pub context: Vec<(String, Value)>,
}

/// Execute the reference subcommand with the system clock.
pub fn run_reference(
    args: &ReferenceArgs,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<u8> {
    run_reference_with_clock(args, settings, SystemClock, out)
}

/// Execute the reference subcommand.
///
/// Returns exit code: 0 when the reference was created, 1 when it was
/// refused.
pub fn run_reference_with_clock<C: Clock>(
    args: &ReferenceArgs,
    _settings: &Settings,
    clock: C,
    out: &mut impl Write,
) -> Result<u8> {
    let accessor = crate::load_accessor(&args.graph)?;
    let context = crate::pairs_to_map(&args.context);

    match accessor
        .references(clock)
        .create_reference(&args.source_id, context)
    {
        Ok(reference) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&reference)?)?;
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "ERROR: {e}")?;
            Ok(1)
        }
    }
}
