//! # Validate Subcommand
//!
//! Checks a graph document three ways:
//!
//! 1. against `mesa-graph.schema.json`,
//! 2. schema verdict vs. runtime attribution policy, node by node,
//! 3. which nodes the accessor would withhold, and why.
//!
//! Withheld nodes are reported but are not a failure on their own; a schema
//! violation or a schema/policy divergence is.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use mesa_core::policy;
use mesa_schema::{check_conformance, load_document, SchemaValidationError, SchemaValidator};

use crate::config::Settings;

/// Arguments for the `mesa validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Graph document (JSON, or YAML by extension).
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Skip the schema/policy conformance comparison.
    #[arg(long)]
    pub no_conformance: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_validate(args: &ValidateArgs, settings: &Settings, out: &mut impl Write) -> Result<u8> {
    let schema_dir = settings
        .schema_dir
        .as_deref()
        .context("no schema directory: pass --schema-dir or set schema_dir in the config file")?;
    let validator = SchemaValidator::new(schema_dir).context("failed to load JSON schemas")?;
    tracing::info!(schema_count = validator.schema_count(), "loaded schema registry");

    let document = load_document(&args.graph)?;
    let mut had_failures = false;

    had_failures |= report_schema(&validator, &document, &args.graph, out)?;

    if !args.no_conformance {
        had_failures |= report_conformance(&validator, &document, out)?;
    }

    report_withheld(&document, out)?;

    Ok(u8::from(had_failures))
}

fn report_schema(
    validator: &SchemaValidator,
    document: &serde_json::Value,
    path: &Path,
    out: &mut impl Write,
) -> Result<bool> {
    match validator.validate_graph(document) {
        Ok(()) => {
            writeln!(out, "OK: {}", path.display())?;
            Ok(false)
        }
        Err(SchemaValidationError::ValidationFailed { violations, .. }) => {
            writeln!(
                out,
                "FAIL: {} ({} violation(s))",
                path.display(),
                violations.len()
            )?;
            writeln!(out, "{violations}")?;
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

fn report_conformance(
    validator: &SchemaValidator,
    document: &serde_json::Value,
    out: &mut impl Write,
) -> Result<bool> {
    let report = check_conformance(validator, document)?;
    writeln!(
        out,
        "Conformance: {} checked, {} skipped, {} divergence(s)",
        report.checked,
        report.skipped,
        report.divergences.len()
    )?;
    for d in &report.divergences {
        writeln!(
            out,
            "  DIVERGE: {} (schema_ok={}, policy_ok={}, missing: {})",
            d.node_id, d.schema_ok, d.policy_ok, d.missing
        )?;
    }
    Ok(!report.is_conformant())
}

fn report_withheld(document: &serde_json::Value, out: &mut impl Write) -> Result<()> {
    let store = mesa_core::NodeStore::from_document(document)?;
    let mut withheld = 0usize;
    for node in store.iter() {
        let verdict = policy::validate(node);
        if !verdict.ok {
            withheld += 1;
            writeln!(out, "  WITHHELD: {} (missing: {})", node.id, verdict.missing)?;
        }
    }
    writeln!(out, "Retrievable: {}/{} node(s)", store.len() - withheld, store.len())?;
    Ok(())
}
