//! The collection frequency must be named in the contract's price component.

use crate::checks::{CheckKind, DeviationReport, REASON};
use crate::contract::require_columns;
use crate::error::AvtalskollError;
use crate::model::{Dataset, Deviation};
use crate::parsing::normalize::normalize_label;

pub const REQUIRED_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnummer",
    "Avtalsnummer",
    "Flexplatsadress",
    "Flextjänst",
    "Hämtfrekvens",
    "Prisdel",
    "Status flextjänst",
];

const FREQUENCY: &str = "Hämtfrekvens";
const PRICE_COMPONENT: &str = "Prisdel";

/// Identifiers preferred in the output, in order.
const PREFERRED_IDENTIFIERS: &[&str] = &[
    "Affärsenhet",
    "Kundnummer",
    "Avtalsnummer",
    "Flexplatsadress",
];

pub fn check(dataset: &Dataset) -> Result<DeviationReport, AvtalskollError> {
    require_columns(dataset, REQUIRED_COLUMNS)?;

    let identifiers = identifier_columns(dataset);
    let mut columns: Vec<&str> = identifiers.iter().map(String::as_str).collect();
    columns.extend([FREQUENCY, PRICE_COMPONENT, REASON]);
    let mut report = DeviationReport::new(CheckKind::PriceComponent, &columns);

    for row in dataset.rows() {
        let frequency = row.text(FREQUENCY);
        let reason = if frequency.is_empty() {
            "Hämtfrekvens saknas på flextjänsten".to_string()
        } else if row.norm(PRICE_COMPONENT).contains(&frequency.to_lowercase()) {
            continue;
        } else {
            format!("Hämtfrekvens '{frequency}' finns inte i prisdelen på avtalet")
        };

        let mut deviation = Deviation::new();
        for column in &identifiers {
            deviation = deviation.with(column, row.get(column));
        }
        report.push(
            deviation
                .with(FREQUENCY, row.get(FREQUENCY))
                .with(PRICE_COMPONENT, row.get(PRICE_COMPONENT))
                .with(REASON, reason),
        );
    }

    Ok(report)
}

/// Output identifier columns, spelled as in the dataset.
///
/// Falls back to the first three columns when no preferred identifier exists.
fn identifier_columns(dataset: &Dataset) -> Vec<String> {
    let found: Vec<String> = PREFERRED_IDENTIFIERS
        .iter()
        .filter_map(|wanted| {
            dataset
                .columns()
                .iter()
                .find(|c| normalize_label(c) == normalize_label(wanted))
                .cloned()
        })
        .collect();

    if found.is_empty() {
        dataset.columns().iter().take(3).cloned().collect()
    } else {
        found
    }
}
