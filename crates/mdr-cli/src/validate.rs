//! # Validate Subcommand
//!
//! Runs a record's rule set and prints the outcome, one line per issue.

use std::path::Path;

use clap::Args;
use uuid::Uuid;

use mdr_core::{ComplianceModule, RecordId, RecordKind};

use crate::dataset::{Dataset, Workspace};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Record kind, e.g. DEVICE_MODEL.
    #[arg(long)]
    pub kind: RecordKind,

    /// Record id (UUID).
    #[arg(long)]
    pub id: Uuid,

    /// Compliance module to run; defaults to the kind's own module.
    #[arg(long)]
    pub module: Option<String>,
}

/// Run validation and persist the run into the dataset.
pub fn run(args: &ValidateArgs, data_path: &Path) -> anyhow::Result<()> {
    let ws = Workspace::wire(Dataset::load(data_path)?);
    let module = match &args.module {
        Some(name) => parse_module(name)?,
        None => args.kind.module(),
    };

    let report = ws
        .validator
        .validate(args.kind, RecordId(args.id), module)?;

    println!("outcome: {}", report.outcome);
    println!("run: {}", report.run_id);
    println!("can_promote: {}", report.can_promote);
    for issue in &report.issues {
        match &issue.suggested_fix {
            Some(fix) => println!(
                "  [{}] {} {}: {} (fix: {fix})",
                issue.severity, issue.rule_id, issue.field, issue.message
            ),
            None => println!(
                "  [{}] {} {}: {}",
                issue.severity, issue.rule_id, issue.field, issue.message
            ),
        }
    }

    ws.into_dataset().save(data_path)
}

fn parse_module(name: &str) -> anyhow::Result<ComplianceModule> {
    match name.to_ascii_uppercase().as_str() {
        "ACTORS" => Ok(ComplianceModule::Actors),
        "DEVICES" => Ok(ComplianceModule::Devices),
        "CERTIFICATES" => Ok(ComplianceModule::Certificates),
        "VIGILANCE" => Ok(ComplianceModule::Vigilance),
        other => anyhow::bail!("unknown compliance module: {other}"),
    }
}
