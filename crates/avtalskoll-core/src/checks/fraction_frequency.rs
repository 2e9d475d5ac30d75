//! Food waste must not be collected more often than residual waste at the
//! same location.

use rust_decimal::Decimal;
use std::collections::BTreeSet;

use crate::checks::{
    distinct_sorted, group_by, CheckKind, DeviationReport, FractionVariant, REASON,
};
use crate::config::schema::RuleConfig;
use crate::contract::require_columns;
use crate::error::AvtalskollError;
use crate::model::{Dataset, Deviation, Row};
use crate::parsing::normalize::per_week;

pub const REQUIRED_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnummer",
    "Flexplats",
    "Flexplatsadress",
    "Fraktion",
    "Hämtfrekvens",
    "Flextjänst",
];

const PRIMARY_FREQUENCIES: &str = "Matavfall hämtfrekvenser";
const SECONDARY_FREQUENCIES: &str = "Restavfall hämtfrekvenser";
const PRIMARY_SERVICES: &str = "Matavfall flextjänster";
const SECONDARY_SERVICES: &str = "Restavfall flextjänster";

const OUTPUT_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnummer",
    "Flexplats",
    "Flexplatsadress",
    PRIMARY_FREQUENCIES,
    SECONDARY_FREQUENCIES,
    PRIMARY_SERVICES,
    SECONDARY_SERVICES,
    REASON,
];

pub fn check(
    dataset: &Dataset,
    config: &RuleConfig,
    variant: FractionVariant,
) -> Result<DeviationReport, AvtalskollError> {
    require_columns(dataset, REQUIRED_COLUMNS)?;

    let table = config.weekly_table();
    let primary_label = config.fractions.canonical(&config.fractions.primary);
    let secondary_label = config.fractions.canonical(&config.fractions.secondary);

    let mut report = DeviationReport::new(CheckKind::FractionFrequency(variant), OUTPUT_COLUMNS);

    for group in group_by(dataset, "Flexplats") {
        let mut primary: Vec<Row<'_>> = Vec::new();
        let mut secondary: Vec<Row<'_>> = Vec::new();
        for row in &group.rows {
            let label = config.fractions.canonical(&row.text("Fraktion"));
            if label == primary_label {
                primary.push(*row);
            } else if label == secondary_label {
                secondary.push(*row);
            }
        }

        if primary.is_empty() || secondary.is_empty() {
            continue;
        }

        let known = |rows: &[Row<'_>]| -> BTreeSet<Decimal> {
            rows.iter()
                .filter_map(|r| per_week(&r.text("Hämtfrekvens"), &table))
                .collect()
        };
        let primary_values = known(&primary);
        let secondary_values = known(&secondary);

        let (Some(primary_max), Some(secondary_max)) =
            (primary_values.last(), secondary_values.last())
        else {
            tracing::debug!(flexplats = %group.key, "no interpretable frequency, skipped");
            continue;
        };

        let reason = match variant {
            FractionVariant::MaxExceeds if primary_max > secondary_max => format!(
                "{} hämtas tätare ({} ggr/vecka) än {} ({} ggr/vecka)",
                config.fractions.primary,
                primary_max.normalize(),
                config.fractions.secondary,
                secondary_max.normalize()
            ),
            FractionVariant::DistinctSet if primary_values != secondary_values => format!(
                "{} och {} har olika hämtfrekvenser",
                config.fractions.primary, config.fractions.secondary
            ),
            _ => continue,
        };

        let first = group.first();
        report.push(
            Deviation::new()
                .with("Affärsenhet", first.get("Affärsenhet"))
                .with("Kundnummer", first.get("Kundnummer"))
                .with("Flexplats", group.key)
                .with("Flexplatsadress", first.get("Flexplatsadress"))
                .with(PRIMARY_FREQUENCIES, listed(&primary, "Hämtfrekvens"))
                .with(SECONDARY_FREQUENCIES, listed(&secondary, "Hämtfrekvens"))
                .with(PRIMARY_SERVICES, listed(&primary, "Flextjänst"))
                .with(SECONDARY_SERVICES, listed(&secondary, "Flextjänst"))
                .with(REASON, reason),
        );
    }

    Ok(report)
}

fn listed(rows: &[Row<'_>], column: &str) -> String {
    distinct_sorted(rows, column).join(", ")
}
