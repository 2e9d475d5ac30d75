//! Billing group must follow the business unit's policy.

use crate::checks::{CheckKind, DeviationReport, REASON};
use crate::config::schema::RuleConfig;
use crate::contract::require_columns;
use crate::error::AvtalskollError;
use crate::model::{Dataset, Deviation};
use crate::parsing::normalize::normalize_label;

pub const REQUIRED_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnummer",
    "Avtalsnummer",
    "Debiteringsgrupp",
    "Prislista",
    "Avtalsstatus",
];

const OUTPUT_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnummer",
    "Avtalsnummer",
    "Debiteringsgrupp",
    "Prislista",
    "Avtalsstatus",
    REASON,
];

/// Check every row against the configured billing policies.
///
/// Rows in an ignored billing group, rows whose business unit has no policy,
/// and price lists the policy does not know all pass.
pub fn check(dataset: &Dataset, config: &RuleConfig) -> Result<DeviationReport, AvtalskollError> {
    require_columns(dataset, REQUIRED_COLUMNS)?;

    let mut report = DeviationReport::new(CheckKind::BillingGroup, OUTPUT_COLUMNS);

    for row in dataset.rows() {
        let billing_group = row.text("Debiteringsgrupp");
        if config.billing.is_ignored(&billing_group) {
            continue;
        }

        let Some(policy) = config.billing.policy_for(&row.text("Affärsenhet")) else {
            continue;
        };

        let price_list = row.text("Prislista");
        let Some(expected) = policy.expected_for(&price_list) else {
            continue;
        };

        if normalize_label(expected) == normalize_label(&billing_group) {
            continue;
        }

        let reason = if policy.expected.is_some() {
            format!(
                "Affärsenhet {} förväntar Debiteringsgrupp '{}', hittade '{}'",
                policy.label, expected, billing_group
            )
        } else {
            format!(
                "Affärsenhet {} med Prislista '{}' förväntar Debiteringsgrupp '{}', hittade '{}'",
                policy.label, price_list, expected, billing_group
            )
        };

        report.push(
            Deviation::new()
                .with("Affärsenhet", row.get("Affärsenhet"))
                .with("Kundnummer", row.get("Kundnummer"))
                .with("Avtalsnummer", row.get("Avtalsnummer"))
                .with("Debiteringsgrupp", row.get("Debiteringsgrupp"))
                .with("Prislista", row.get("Prislista"))
                .with("Avtalsstatus", row.get("Avtalsstatus"))
                .with(REASON, reason),
        );
    }

    Ok(report)
}
