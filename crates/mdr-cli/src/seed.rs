//! # Seed Subcommand
//!
//! Writes a demonstration dataset: a complete economic operator with a
//! linked device model, identifier, and certificate, plus an incomplete
//! device model that exercises the promotion gate's failure path.

use std::path::Path;

use clap::Args;
use serde_json::{Map, Value};

use mdr_core::{RecordKind, TenantId, Timestamp};
use mdr_store::Record;

use crate::dataset::Dataset;

/// Arguments for the seed subcommand.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Tenant slug for the seeded records.
    #[arg(long, default_value = "demo-tenant")]
    pub tenant: String,

    /// Overwrite an existing dataset file.
    #[arg(long)]
    pub force: bool,
}

fn fields(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
        .collect()
}

/// Write the demonstration dataset.
pub fn run(args: &SeedArgs, data_path: &Path) -> anyhow::Result<()> {
    if data_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            data_path.display()
        );
    }

    let tenant = TenantId::new(args.tenant.clone());
    let now = Timestamp::now();
    let created_by = "seed@mdr-stack";

    let operator = Record::new(
        RecordKind::EconomicOperator,
        tenant.clone(),
        created_by,
        now,
        fields(&[
            ("legal_name", "Helix Medizintechnik GmbH"),
            ("country", "DE"),
            ("srn", "DE-MF-000012345"),
            ("contact_email", "compliance@helix-med.example"),
        ]),
    );

    let device = Record::new(
        RecordKind::DeviceModel,
        tenant.clone(),
        created_by,
        now,
        fields(&[
            ("name", "HX-300 Infusion Pump"),
            ("risk_class", "IIb"),
            ("description", "Volumetric infusion pump for hospital use"),
            ("manufacturer_ref", &operator.id.as_uuid().to_string()),
        ]),
    );

    let identifier = Record::new(
        RecordKind::DeviceIdentifier,
        tenant.clone(),
        created_by,
        now,
        fields(&[
            ("issuing_agency", "GS1"),
            ("identifier_value", "04012345000017"),
            ("device_ref", &device.id.as_uuid().to_string()),
        ]),
    );

    let certificate = Record::new(
        RecordKind::Certificate,
        tenant.clone(),
        created_by,
        now,
        fields(&[
            ("certificate_number", "CE-2026-004711"),
            ("issuing_authority_ref", &operator.id.as_uuid().to_string()),
            ("expiry_date", "2031-05-31T00:00:00Z"),
            ("scope", "Class IIb active therapeutic devices"),
        ]),
    );

    let case = Record::new(
        RecordKind::SurveillanceCase,
        tenant.clone(),
        created_by,
        now,
        fields(&[
            ("device_ref", &device.id.as_uuid().to_string()),
            ("incident_date", "2026-02-14T00:00:00Z"),
            ("summary", "Occlusion alarm failed to trigger during bench testing"),
        ]),
    );

    // Incomplete on purpose: no manufacturer reference, no identifier.
    let orphan_device = Record::new(
        RecordKind::DeviceModel,
        tenant,
        created_by,
        now,
        fields(&[("name", "HX-900 Prototype"), ("risk_class", "III")]),
    );

    let dataset = Dataset {
        records: vec![operator, device, identifier, certificate, case, orphan_device],
        ledger_events: Vec::new(),
        validation_runs: Vec::new(),
    };
    dataset.save(data_path)?;

    println!("seeded {} records into {}", dataset.records.len(), data_path.display());
    for record in &dataset.records {
        println!("  {} {} ({})", record.kind, record.id.as_uuid(), record.status);
    }
    Ok(())
}
