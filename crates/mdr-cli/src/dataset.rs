//! # Dataset Loading and Wiring
//!
//! The CLI's persistence is a single JSON file holding records, ledger
//! events, and validation runs. Each invocation loads the file into the
//! in-memory collaborators, runs one operation, and writes the stores
//! back out.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use mdr_ledger::{InMemoryLedgerStore, Ledger, LedgerEvent};
use mdr_lifecycle::PromotionService;
use mdr_rules::{InMemoryRunStore, ValidationRun, Validator};
use mdr_store::{InMemoryRecordStore, Record, StaticIdentity, SystemClock};

/// The on-disk dataset.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// All regulatory records.
    #[serde(default)]
    pub records: Vec<Record>,
    /// All ledger events across all chains.
    #[serde(default)]
    pub ledger_events: Vec<LedgerEvent>,
    /// All persisted validation runs.
    #[serde(default)]
    pub validation_runs: Vec<ValidationRun>,
}

impl Dataset {
    /// Load a dataset from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read dataset {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("dataset {} is not valid JSON", path.display()))
    }

    /// Write a dataset to disk, pretty-printed for diffability.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("cannot write dataset {}", path.display()))
    }
}

/// The dataset loaded into live collaborators.
pub struct Workspace {
    /// Record store shared by every component.
    pub records: Arc<InMemoryRecordStore>,
    /// Validation run store.
    pub runs: Arc<InMemoryRunStore>,
    /// Ledger event store.
    pub events: Arc<InMemoryLedgerStore>,
    /// The validation engine.
    pub validator: Validator,
    /// The ledger surface.
    pub ledger: Ledger,
    /// The gated promotion service.
    pub service: PromotionService,
}

impl Workspace {
    /// Wire a dataset into in-memory collaborators.
    ///
    /// The acting identity comes from `MDR_ACTOR`, defaulting to
    /// `cli@local`; the clock is the system clock.
    pub fn wire(dataset: Dataset) -> Self {
        tracing::debug!(
            records = dataset.records.len(),
            events = dataset.ledger_events.len(),
            runs = dataset.validation_runs.len(),
            "dataset loaded"
        );
        let records = Arc::new(InMemoryRecordStore::with_records(dataset.records));
        let runs = Arc::new(InMemoryRunStore::with_runs(dataset.validation_runs));
        let events = Arc::new(InMemoryLedgerStore::with_events(dataset.ledger_events));

        let actor = std::env::var("MDR_ACTOR").unwrap_or_else(|_| "cli@local".to_string());
        let identity: Arc<StaticIdentity> = Arc::new(StaticIdentity::named(actor));
        let clock: Arc<SystemClock> = Arc::new(SystemClock);

        let validator = Validator::new(
            records.clone(),
            runs.clone(),
            identity.clone(),
            clock.clone(),
        );
        let ledger = Ledger::new(
            events.clone(),
            identity.clone(),
            clock.clone(),
        );
        // The service needs its own validator and ledger instances over
        // the same shared stores.
        let service_validator = Validator::new(
            records.clone(),
            runs.clone(),
            identity.clone(),
            clock.clone(),
        );
        let service_ledger = Ledger::new(
            events.clone(),
            identity.clone(),
            clock.clone(),
        );
        let service = PromotionService::new(
            records.clone(),
            service_validator,
            service_ledger,
            clock.clone(),
        );

        Self { records, runs, events, validator, ledger, service }
    }

    /// Snapshot the live stores back into a dataset.
    pub fn into_dataset(self) -> Dataset {
        Dataset {
            records: self.records.snapshot(),
            ledger_events: self.events.snapshot(),
            validation_runs: self.runs.snapshot(),
        }
    }
}
