//! # Query Subcommand
//!
//! Print every retrievable node whose fields equal all `--filter` pairs, as
//! a JSON array. No filters selects every retrievable node.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use mesa_core::export_json;

use crate::config::Settings;

/// Arguments for the `mesa query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Graph document (JSON, or YAML by extension).
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Exact-match filter, e.g. `--filter @type=pages:zsoX6_bEl`. Repeatable.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = crate::parse_pair)]
    pub filters: Vec<(String, Value)>,
}

/// Execute the query subcommand. Always exits 0; withheld nodes are simply
/// absent from the result.
pub fn run_query(args: &QueryArgs, _settings: &Settings, out: &mut impl Write) -> Result<u8> {
    let accessor = crate::load_accessor(&args.graph)?;
    let filters = crate::pairs_to_map(&args.filters);
    let results = accessor.query_nodes(&filters);
    tracing::info!(matched = results.len(), "query complete");
    writeln!(out, "{}", export_json(&results)?)?;
    Ok(0)
}
