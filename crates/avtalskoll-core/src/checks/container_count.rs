//! The container count on a service must equal its number of active
//! individuals (distinct external references).

use std::collections::BTreeSet;

use crate::checks::{group_by, CheckKind, DeviationReport, REASON};
use crate::contract::require_columns;
use crate::error::AvtalskollError;
use crate::model::{Dataset, Deviation};
use crate::parsing::values::parse_count;

pub const REQUIRED_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Status",
    "Flexplatsadress",
    "Flextjänstnr",
    "Fraktion",
    "Flextyp",
    "Extern referens",
    "Antal kärl",
];

const EXPECTED: &str = "Antal på flextjänsten";
const ACTUAL: &str = "Antal aktiva individer";

const OUTPUT_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Status",
    "Flexplatsadress",
    "Flextjänstnr",
    "Flextyp",
    EXPECTED,
    ACTUAL,
    REASON,
];

pub fn check(dataset: &Dataset) -> Result<DeviationReport, AvtalskollError> {
    require_columns(dataset, REQUIRED_COLUMNS)?;

    let mut report = DeviationReport::new(CheckKind::ContainerCount, OUTPUT_COLUMNS);

    for group in group_by(dataset, "Flextjänstnr") {
        let expected_values: BTreeSet<i64> = group
            .rows
            .iter()
            .filter_map(|r| parse_count(r.get("Antal kärl")))
            .collect();
        let references: BTreeSet<String> = group
            .rows
            .iter()
            .map(|r| r.text("Extern referens"))
            .filter(|s| !s.is_empty())
            .collect();
        let actual = references.len();
        let expected = expected_values.first().copied();

        let reason = if expected_values.len() > 1 {
            let listed: Vec<String> = expected_values.iter().map(|v| v.to_string()).collect();
            format!(
                "Olika antal kärl inom flextjänsten ({}), {} aktiva individer",
                listed.join(", "),
                actual
            )
        } else {
            match expected {
                None => format!("Antal kärl saknas, {actual} aktiva individer"),
                Some(n) if n != actual as i64 => {
                    format!("Antal kärl är {n} men {actual} aktiva individer")
                }
                Some(_) => continue,
            }
        };

        let first = group.first();
        report.push(
            Deviation::new()
                .with("Affärsenhet", first.get("Affärsenhet"))
                .with("Status", first.get("Status"))
                .with("Flexplatsadress", first.get("Flexplatsadress"))
                .with("Flextjänstnr", group.key)
                .with("Flextyp", first.get("Flextyp"))
                .with(EXPECTED, expected)
                .with(ACTUAL, actual)
                .with(REASON, reason),
        );
    }

    Ok(report)
}
