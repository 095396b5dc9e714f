//! # Domain Enums
//!
//! The record kinds tracked by the registry, the compliance modules that
//! group their rule sets, the lifecycle status with its legal-transition
//! table, and the severity/outcome vocabulary of validation.
//!
//! ## Design
//!
//! One enum per concept, exhaustive `match` everywhere. Adding a record
//! kind forces every consumer (rule registry, context builder, store
//! dispatch) to handle it at compile time. There are no string-typed kinds
//! or statuses anywhere in the workspace; strings appear only at the serde
//! and CLI boundaries.

use serde::{Deserialize, Serialize};

// ─── Record Kind ─────────────────────────────────────────────────────

/// The kinds of regulatory record tracked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    /// A manufacturer, authorised representative, importer, or notified
    /// body participating in the supply chain.
    EconomicOperator,
    /// A device model registered by an economic operator.
    DeviceModel,
    /// A device identifier (UDI-DI style) assigned to a device model by an
    /// issuing agency.
    DeviceIdentifier,
    /// A conformity certificate covering one or more device models.
    Certificate,
    /// A post-market surveillance case opened against a device.
    SurveillanceCase,
}

impl RecordKind {
    /// The compliance module whose rule set applies to this kind.
    pub fn module(&self) -> ComplianceModule {
        match self {
            Self::EconomicOperator => ComplianceModule::Actors,
            Self::DeviceModel | Self::DeviceIdentifier => ComplianceModule::Devices,
            Self::Certificate => ComplianceModule::Certificates,
            Self::SurveillanceCase => ComplianceModule::Vigilance,
        }
    }

    /// All record kinds, in registry order.
    pub const ALL: [RecordKind; 5] = [
        Self::EconomicOperator,
        Self::DeviceModel,
        Self::DeviceIdentifier,
        Self::Certificate,
        Self::SurveillanceCase,
    ];
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::EconomicOperator => "ECONOMIC_OPERATOR",
            Self::DeviceModel => "DEVICE_MODEL",
            Self::DeviceIdentifier => "DEVICE_IDENTIFIER",
            Self::Certificate => "CERTIFICATE",
            Self::SurveillanceCase => "SURVEILLANCE_CASE",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "ECONOMIC_OPERATOR" => Ok(Self::EconomicOperator),
            "DEVICE_MODEL" => Ok(Self::DeviceModel),
            "DEVICE_IDENTIFIER" => Ok(Self::DeviceIdentifier),
            "CERTIFICATE" => Ok(Self::Certificate),
            "SURVEILLANCE_CASE" => Ok(Self::SurveillanceCase),
            other => Err(format!("unknown record kind: {other}")),
        }
    }
}

// ─── Compliance Module ───────────────────────────────────────────────

/// The modules that group validation rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceModule {
    /// Economic operator registration.
    Actors,
    /// Device models and their identifiers.
    Devices,
    /// Conformity certificates.
    Certificates,
    /// Post-market surveillance.
    Vigilance,
}

impl std::fmt::Display for ComplianceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Actors => "ACTORS",
            Self::Devices => "DEVICES",
            Self::Certificates => "CERTIFICATES",
            Self::Vigilance => "VIGILANCE",
        };
        f.write_str(s)
    }
}

// ─── Record Status ───────────────────────────────────────────────────

/// The lifecycle status of a record.
///
/// ```text
/// Draft ──▶ Validated ──▶ Ready ──▶ Exported ──▶ Archived (terminal)
///   ▲           │  ▲         │
///   └───────────┘  └─────────┘
/// ```
///
/// The legal transitions are data on this enum; the gating (validation
/// before Ready, ledger append on commit) lives in `mdr-lifecycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// Being drafted; not yet checked.
    Draft,
    /// Passed through at least one validation run.
    Validated,
    /// Cleared for export; the promotion gate has been satisfied.
    Ready,
    /// Submitted to the regulatory endpoint.
    Exported,
    /// Retired (terminal).
    Archived,
}

impl RecordStatus {
    /// Whether the transition `self -> to` is in the legal table.
    pub fn may_transition_to(&self, to: RecordStatus) -> bool {
        use RecordStatus::*;
        matches!(
            (self, to),
            (Draft, Validated)
                | (Validated, Ready)
                | (Validated, Draft)
                | (Ready, Exported)
                | (Ready, Validated)
                | (Exported, Archived)
        )
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Validated => "VALIDATED",
            Self::Ready => "READY",
            Self::Exported => "EXPORTED",
            Self::Archived => "ARCHIVED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "VALIDATED" => Ok(Self::Validated),
            "READY" => Ok(Self::Ready),
            "EXPORTED" => Ok(Self::Exported),
            "ARCHIVED" => Ok(Self::Archived),
            other => Err(format!("unknown record status: {other}")),
        }
    }
}

// ─── Severity ────────────────────────────────────────────────────────

/// Classification of a validation issue. Ordering is ascending by weight,
/// so `Severity::Critical` is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Advisory only.
    Info,
    /// Cosmetic or best-practice deviation.
    Minor,
    /// Should be fixed before export; does not block promotion.
    Major,
    /// Blocks promotion to Ready.
    Critical,
}

impl Severity {
    /// Whether an issue of this severity blocks promotion.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

// ─── Outcome ─────────────────────────────────────────────────────────

/// The outcome of a validation run. A pure function of the issue set:
/// Fail iff any critical issue exists, Warning iff any issue exists,
/// Pass otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// No issues.
    Pass,
    /// Non-critical issues only.
    Warning,
    /// At least one critical issue; promotion is blocked.
    Fail,
}

impl Outcome {
    /// Derive the outcome from issue counts.
    pub fn from_issue_counts(critical: usize, total: usize) -> Self {
        if critical > 0 {
            Self::Fail
        } else if total > 0 {
            Self::Warning
        } else {
            Self::Pass
        }
    }

    /// Whether this outcome permits promotion to Ready.
    pub fn permits_promotion(&self) -> bool {
        !matches!(self, Self::Fail)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pass => "PASS",
            Self::Warning => "WARNING",
            Self::Fail => "FAIL",
        };
        f.write_str(s)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
