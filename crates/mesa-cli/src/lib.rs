//! # mesa-cli: Command-Line Interface for MESA
//!
//! Provides the `mesa` binary. Every read goes through
//! [`mesa_core::EnforcedAccessor`]; the CLI adds file handling and output
//! formatting, never its own attribution checks.
//!
//! ## Subcommands
//!
//! - `mesa validate`: schema validation plus schema/policy conformance.
//! - `mesa get`: one node as JSON, HTML or Markdown.
//! - `mesa query`: nodes matching `--filter key=value` pairs.
//! - `mesa export`: a list of nodes as JSON or citations.
//! - `mesa reference`: create a reference from `--context key=value` pairs.
//!
//! ```bash
//! mesa validate graph.json
//! mesa get graph.json pages:evidence-001 --format markdown
//! mesa export graph.json pages:evidence-001 pages:source-001 --citations
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` enforcement or validation refusal, `2` operational error
//! (unreadable file, bad arguments, malformed graph).

pub mod config;
pub mod export;
pub mod get;
pub mod query;
pub mod reference;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use mesa_core::EnforcedAccessor;

/// Read a graph document (JSON or YAML) and build the accessor over it.
pub fn load_accessor(path: &Path) -> Result<EnforcedAccessor> {
    let document = mesa_schema::load_document(path)?;
    let accessor = EnforcedAccessor::from_document(&document)
        .with_context(|| format!("malformed graph document {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        node_count = accessor.store().len(),
        "loaded graph"
    );
    Ok(accessor)
}

/// Parse a `key=value` argument. The value is kept as a JSON string.
pub fn parse_pair(s: &str) -> Result<(String, Value), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            Ok((key.to_string(), Value::String(value.to_string())))
        }
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

/// Collect parsed pairs into a JSON object; later keys win.
pub fn pairs_to_map(pairs: &[(String, Value)]) -> Map<String, Value> {
    pairs.iter().cloned().collect()
}
