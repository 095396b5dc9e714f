//! # Update Subcommand
//!
//! Applies a field patch to a record. Mutating a READY record downgrades
//! it to VALIDATED first, clearing its validation timestamp.

use std::path::Path;

use clap::Args;
use uuid::Uuid;

use mdr_core::{RecordId, RecordKind};

use crate::dataset::{Dataset, Workspace};

/// Arguments for the update subcommand.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Record kind, e.g. DEVICE_MODEL.
    #[arg(long)]
    pub kind: RecordKind,

    /// Record id (UUID).
    #[arg(long)]
    pub id: Uuid,

    /// Field patch as a JSON object, e.g. '{"country": "FR"}'.
    #[arg(long)]
    pub patch: String,
}

/// Apply the patch and persist the resulting state.
pub fn run(args: &UpdateArgs, data_path: &Path) -> anyhow::Result<()> {
    let patch: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&args.patch)
            .map_err(|e| anyhow::anyhow!("--patch must be a JSON object: {e}"))?;

    let ws = Workspace::wire(Dataset::load(data_path)?);
    let merged = ws.service.apply_update(args.kind, RecordId(args.id), patch)?;

    println!("updated: {} {}", merged.kind, merged.id);
    println!("status: {}", merged.status);
    match merged.last_validated_at {
        Some(at) => println!("last_validated_at: {at}"),
        None => println!("last_validated_at: (cleared)"),
    }

    ws.into_dataset().save(data_path)
}
