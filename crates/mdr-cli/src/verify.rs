//! # Verify-Chain Subcommand
//!
//! Prints the tamper-evidence report for one record's ledger chain.
//! Verification is read-only and diagnostic: findings are printed, not
//! raised, and the exit code reflects chain validity so the command can
//! gate CI or audit scripts.

use std::path::Path;

use clap::Args;
use uuid::Uuid;

use mdr_core::{RecordId, RecordKind};

use crate::dataset::{Dataset, Workspace};

/// Arguments for the verify-chain subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Record kind, e.g. DEVICE_MODEL.
    #[arg(long)]
    pub kind: RecordKind,

    /// Record id (UUID).
    #[arg(long)]
    pub id: Uuid,

    /// Emit the full report as JSON instead of summary lines.
    #[arg(long)]
    pub json: bool,
}

/// Verify the chain and print the report.
pub fn run(args: &VerifyArgs, data_path: &Path) -> anyhow::Result<()> {
    let ws = Workspace::wire(Dataset::load(data_path)?);
    let report = ws.ledger.verify_chain(args.kind, RecordId(args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("valid: {}", report.valid);
        println!("events_checked: {}", report.events_checked);
        for issue in &report.issues {
            println!("  {issue}");
        }
    }

    if !report.valid {
        anyhow::bail!("chain verification found {} issue(s)", report.issues.len());
    }
    Ok(())
}
