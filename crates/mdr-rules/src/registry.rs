//! # The Rule Registry
//!
//! The static table of every registered validation rule, grouped by
//! (compliance module, record kind). Rule ids are stable and appear in
//! validation issues, ledger-adjacent audit output, and operator-facing
//! remediation text; renaming one is a breaking change for downstream
//! consumers.
//!
//! Predicates are ordinary named functions. They read the record and the
//! pre-built [`RuleContext`] and nothing else.

use mdr_core::{ComplianceModule, RecordKind, Severity};
use mdr_store::Record;

use crate::context::RuleContext;
use crate::rule::{PredicateFault, Rule};

/// UDI issuing entities accepted by the registry.
const RECOGNIZED_AGENCIES: [&str; 4] = ["GS1", "HIBCC", "ICCBBA", "IFA"];

/// Device risk classes accepted by the registry.
const RISK_CLASSES: [&str; 4] = ["I", "IIa", "IIb", "III"];

/// All registered rules, in evaluation order.
pub static RULES: &[Rule] = &[
    // ── Actors / EconomicOperator ────────────────────────────────────
    Rule {
        id: "ACT-001",
        module: ComplianceModule::Actors,
        kind: RecordKind::EconomicOperator,
        severity: Severity::Critical,
        field: "legal_name",
        message: "economic operator must have a legal name",
        suggested_fix: Some("enter the registered legal name of the organisation"),
        predicate: operator_legal_name_present,
    },
    Rule {
        id: "ACT-002",
        module: ComplianceModule::Actors,
        kind: RecordKind::EconomicOperator,
        severity: Severity::Critical,
        field: "country",
        message: "economic operator must declare a country of establishment",
        suggested_fix: Some("set the ISO 3166-1 alpha-2 country code"),
        predicate: operator_country_present,
    },
    Rule {
        id: "ACT-003",
        module: ComplianceModule::Actors,
        kind: RecordKind::EconomicOperator,
        severity: Severity::Major,
        field: "srn",
        message: "single registration number must match CC-RR-NNNNNNNNN",
        suggested_fix: Some("use the SRN issued at actor registration, e.g. DE-MF-000012345"),
        predicate: operator_srn_well_formed,
    },
    Rule {
        id: "ACT-004",
        module: ComplianceModule::Actors,
        kind: RecordKind::EconomicOperator,
        severity: Severity::Minor,
        field: "contact_email",
        message: "a compliance contact email should be on file",
        suggested_fix: None,
        predicate: operator_contact_email_present,
    },
    // ── Devices / DeviceModel ────────────────────────────────────────
    Rule {
        id: "DEV-001",
        module: ComplianceModule::Devices,
        kind: RecordKind::DeviceModel,
        severity: Severity::Critical,
        field: "manufacturer_ref",
        message: "device model must reference a registered manufacturer",
        suggested_fix: Some("link the model to its manufacturer's operator record"),
        predicate: device_manufacturer_resolves,
    },
    Rule {
        id: "DEV-002",
        module: ComplianceModule::Devices,
        kind: RecordKind::DeviceModel,
        severity: Severity::Critical,
        field: "risk_class",
        message: "risk class must be one of I, IIa, IIb, III",
        suggested_fix: None,
        predicate: device_risk_class_valid,
    },
    Rule {
        id: "DEV-003",
        module: ComplianceModule::Devices,
        kind: RecordKind::DeviceModel,
        severity: Severity::Critical,
        field: "identifiers",
        message: "device model must have at least one registered identifier",
        suggested_fix: Some("register a device identifier for this model"),
        predicate: device_has_identifier,
    },
    Rule {
        id: "DEV-004",
        module: ComplianceModule::Devices,
        kind: RecordKind::DeviceModel,
        severity: Severity::Info,
        field: "description",
        message: "a model description helps reviewers triage surveillance cases",
        suggested_fix: None,
        predicate: device_description_present,
    },
    // ── Devices / DeviceIdentifier ───────────────────────────────────
    Rule {
        id: "UDI-001",
        module: ComplianceModule::Devices,
        kind: RecordKind::DeviceIdentifier,
        severity: Severity::Critical,
        field: "identifier_value",
        message: "identifier value must be present",
        suggested_fix: None,
        predicate: identifier_value_present,
    },
    Rule {
        id: "UDI-002",
        module: ComplianceModule::Devices,
        kind: RecordKind::DeviceIdentifier,
        severity: Severity::Critical,
        field: "identifier_value",
        message: "identifier value must be unique per tenant and issuing agency",
        suggested_fix: Some("another identifier with this value exists in the same scope"),
        predicate: identifier_value_unique,
    },
    Rule {
        id: "UDI-003",
        module: ComplianceModule::Devices,
        kind: RecordKind::DeviceIdentifier,
        severity: Severity::Major,
        field: "issuing_agency",
        message: "issuing agency is not a recognized UDI issuing entity",
        suggested_fix: Some("use one of GS1, HIBCC, ICCBBA, IFA"),
        predicate: identifier_agency_recognized,
    },
    Rule {
        id: "UDI-004",
        module: ComplianceModule::Devices,
        kind: RecordKind::DeviceIdentifier,
        severity: Severity::Critical,
        field: "device_ref",
        message: "identifier must reference a registered device model",
        suggested_fix: Some("link the identifier to its device model record"),
        predicate: identifier_parent_resolves,
    },
    // ── Certificates / Certificate ───────────────────────────────────
    Rule {
        id: "CRT-001",
        module: ComplianceModule::Certificates,
        kind: RecordKind::Certificate,
        severity: Severity::Critical,
        field: "certificate_number",
        message: "certificate number must be present",
        suggested_fix: None,
        predicate: certificate_number_present,
    },
    Rule {
        id: "CRT-002",
        module: ComplianceModule::Certificates,
        kind: RecordKind::Certificate,
        severity: Severity::Critical,
        field: "issuing_authority_ref",
        message: "certificate must reference a registered issuing authority",
        suggested_fix: Some("link the certificate to the notified body's operator record"),
        predicate: certificate_authority_resolves,
    },
    Rule {
        id: "CRT-003",
        module: ComplianceModule::Certificates,
        kind: RecordKind::Certificate,
        severity: Severity::Major,
        field: "expiry_date",
        message: "certificate must carry a parseable expiry date in the future",
        suggested_fix: Some("renew the certificate or correct the expiry date"),
        predicate: certificate_not_expired,
    },
    Rule {
        id: "CRT-004",
        module: ComplianceModule::Certificates,
        kind: RecordKind::Certificate,
        severity: Severity::Minor,
        field: "scope",
        message: "the certificate scope description should be on file",
        suggested_fix: None,
        predicate: certificate_scope_present,
    },
    // ── Vigilance / SurveillanceCase ─────────────────────────────────
    Rule {
        id: "VIG-001",
        module: ComplianceModule::Vigilance,
        kind: RecordKind::SurveillanceCase,
        severity: Severity::Critical,
        field: "device_ref",
        message: "surveillance case must reference a registered device model",
        suggested_fix: Some("link the case to the affected device model record"),
        predicate: case_device_resolves,
    },
    Rule {
        id: "VIG-002",
        module: ComplianceModule::Vigilance,
        kind: RecordKind::SurveillanceCase,
        severity: Severity::Major,
        field: "incident_date",
        message: "incident date must be present",
        suggested_fix: None,
        predicate: case_incident_date_present,
    },
    Rule {
        id: "VIG-003",
        module: ComplianceModule::Vigilance,
        kind: RecordKind::SurveillanceCase,
        severity: Severity::Minor,
        field: "summary",
        message: "case summary should describe the incident in at least 30 characters",
        suggested_fix: None,
        predicate: case_summary_substantive,
    },
];

/// The rules registered for a (module, kind) pairing, in evaluation order.
///
/// Returns `None` for pairings with no registered rule set; the validator
/// reports those as configuration errors rather than silently passing.
pub fn rules_for(module: ComplianceModule, kind: RecordKind) -> Option<Vec<&'static Rule>> {
    let selected: Vec<&'static Rule> = RULES
        .iter()
        .filter(|r| r.module == module && r.kind == kind)
        .collect();
    if selected.is_empty() {
        None
    } else {
        Some(selected)
    }
}

// ─── Actors predicates ───────────────────────────────────────────────

fn operator_legal_name_present(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.has_field("legal_name"))
}

fn operator_country_present(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.has_field("country"))
}

/// SRN format: 2-letter country, 2-letter role, 9 digits, dash separated.
fn operator_srn_well_formed(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    let Some(srn) = r.field_str("srn") else {
        return Ok(false);
    };
    let parts: Vec<&str> = srn.split('-').collect();
    let [country, role, number] = parts.as_slice() else {
        return Ok(false);
    };
    Ok(country.len() == 2
        && country.chars().all(|c| c.is_ascii_uppercase())
        && role.len() == 2
        && role.chars().all(|c| c.is_ascii_uppercase())
        && number.len() == 9
        && number.chars().all(|c| c.is_ascii_digit()))
}

fn operator_contact_email_present(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.field_str("contact_email").is_some_and(|s| s.contains('@')))
}

// ─── Devices predicates ──────────────────────────────────────────────

fn device_manufacturer_resolves(_: &Record, ctx: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(ctx.manufacturer.is_resolved())
}

fn device_risk_class_valid(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.field_str("risk_class")
        .is_some_and(|c| RISK_CLASSES.contains(&c)))
}

fn device_has_identifier(_: &Record, ctx: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(ctx.registered_identifier_count > 0)
}

fn device_description_present(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.has_field("description"))
}

fn identifier_value_present(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.has_field("identifier_value"))
}

fn identifier_value_unique(r: &Record, ctx: &RuleContext) -> Result<bool, PredicateFault> {
    let Some(value) = r.field_str("identifier_value") else {
        // Presence is UDI-001's concern; an absent value cannot collide.
        return Ok(true);
    };
    Ok(!ctx.sibling_identifier_values.iter().any(|v| v == value))
}

fn identifier_agency_recognized(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.field_str("issuing_agency")
        .is_some_and(|a| RECOGNIZED_AGENCIES.contains(&a)))
}

fn identifier_parent_resolves(_: &Record, ctx: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(ctx.parent_device.is_resolved())
}

// ─── Certificates predicates ─────────────────────────────────────────

fn certificate_number_present(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.has_field("certificate_number"))
}

fn certificate_authority_resolves(_: &Record, ctx: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(ctx.issuing_authority.is_resolved())
}

fn certificate_not_expired(r: &Record, ctx: &RuleContext) -> Result<bool, PredicateFault> {
    let Some(raw) = r.field_str("expiry_date") else {
        return Ok(false);
    };
    match mdr_core::Timestamp::parse(raw) {
        Ok(expiry) => Ok(expiry > ctx.now),
        Err(_) => Ok(false),
    }
}

fn certificate_scope_present(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.has_field("scope"))
}

// ─── Vigilance predicates ────────────────────────────────────────────

fn case_device_resolves(_: &Record, ctx: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(ctx.device.is_resolved())
}

fn case_incident_date_present(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.has_field("incident_date"))
}

fn case_summary_substantive(r: &Record, _: &RuleContext) -> Result<bool, PredicateFault> {
    Ok(r.field_str("summary").is_some_and(|s| s.trim().len() >= 30))
}
