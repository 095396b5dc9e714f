//! # Promote Subcommand
//!
//! Requests a gated lifecycle transition. A denied gate prints the
//! blocking issue counts and exits non-zero without touching the record.

use std::path::Path;

use clap::Args;
use uuid::Uuid;

use mdr_core::{RecordId, RecordKind, RecordStatus};
use mdr_lifecycle::PromotionError;

use crate::dataset::{Dataset, Workspace};

/// Arguments for the promote subcommand.
#[derive(Args, Debug)]
pub struct PromoteArgs {
    /// Record kind, e.g. DEVICE_MODEL.
    #[arg(long)]
    pub kind: RecordKind,

    /// Record id (UUID).
    #[arg(long)]
    pub id: Uuid,

    /// Target status, e.g. READY.
    #[arg(long)]
    pub to: RecordStatus,
}

/// Run the promotion and persist the resulting state.
pub fn run(args: &PromoteArgs, data_path: &Path) -> anyhow::Result<()> {
    let ws = Workspace::wire(Dataset::load(data_path)?);

    match ws.service.promote(args.kind, RecordId(args.id), args.to) {
        Ok(promotion) => {
            println!("promoted: {} -> {}", promotion.from, promotion.to);
            if let Some(run_id) = promotion.run_id {
                println!("gating run: {run_id}");
            }
            println!("ledger event: {}", promotion.event_hash);
            ws.into_dataset().save(data_path)
        }
        Err(PromotionError::ValidationBlocked { critical_issues, total_issues }) => {
            // The denied gate still recorded its validation run.
            ws.into_dataset().save(data_path)?;
            anyhow::bail!(
                "promotion blocked: {critical_issues} critical of {total_issues} issues \
                 (run `mdr validate` for details)"
            )
        }
        Err(other) => Err(other.into()),
    }
}
