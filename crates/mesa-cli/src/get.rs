//! # Get Subcommand
//!
//! Retrieve one node through the enforced accessor and print it as JSON,
//! HTML, or Markdown. A withheld node prints the refusal reason instead.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use mesa_core::{render_html, render_markdown, AttributedNode};

use crate::config::{OutputFormat, Settings};

/// Arguments for the `mesa get` subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Graph document (JSON, or YAML by extension).
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Node identifier (`@id`).
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output format; defaults to the configured format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Execute the get subcommand.
///
/// Returns exit code: 0 when the node was printed, 1 when it was withheld
/// or does not exist.
pub fn run_get(args: &GetArgs, settings: &Settings, out: &mut impl Write) -> Result<u8> {
    let accessor = crate::load_accessor(&args.graph)?;

    let node = match accessor.resolve(&args.id) {
        Ok(node) => node,
        Err(e) => {
            writeln!(out, "ERROR: {e}")?;
            return Ok(1);
        }
    };

    let format = args.format.unwrap_or(settings.format);
    writeln!(out, "{}", format_node(&node, format)?)?;
    Ok(0)
}

/// Render `node` in the requested format.
pub fn format_node(node: &AttributedNode, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(node)?,
        OutputFormat::Html => render_html(node),
        OutputFormat::Markdown => render_markdown(node),
    })
}
