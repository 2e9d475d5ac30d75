//! Route and frequency consistency for sludge facilities (slamanläggningar).
//!
//! Two passes share one report: structural checks per row, then a count check
//! per service number where the number of rows must equal the yearly visit
//! count implied by the frequency. A row can appear in both passes.

use std::collections::BTreeSet;

use crate::checks::{group_by, CheckKind, DeviationReport, Group, REASON};
use crate::contract::require_columns;
use crate::error::AvtalskollError;
use crate::model::{CellValue, Dataset, Deviation, Row};
use crate::parsing::normalize::{expected_yearly_count, week_tokens};

pub const REQUIRED_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnr",
    "Flexplatsadress",
    "Flextjänstnr",
    "Flexgrupp namn",
    "Flextyp",
    "Utförandeområde flextjänst",
    "Utförandeområde flexplats",
    "Hämtfrekvens",
    "Ind. körtursplan",
    "Körtursnamn",
];

const SERVICE_AREA: &str = "Utförandeområde flextjänst";
const LOCATION_AREA: &str = "Utförandeområde flexplats";
const FREQUENCY: &str = "Hämtfrekvens";
const ROUTE_PLAN: &str = "Ind. körtursplan";
const ROUTE_NAME: &str = "Körtursnamn";

const OUTPUT_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnr",
    "Flexplatsadress",
    "Flextjänstnr",
    "Flexgrupp namn",
    "Flextyp",
    SERVICE_AREA,
    LOCATION_AREA,
    FREQUENCY,
    ROUTE_PLAN,
    ROUTE_NAME,
    REASON,
];

pub fn check(dataset: &Dataset) -> Result<DeviationReport, AvtalskollError> {
    require_columns(dataset, REQUIRED_COLUMNS)?;

    let mut report = DeviationReport::new(CheckKind::SludgeFacility, OUTPUT_COLUMNS);

    for row in dataset.rows() {
        let reasons = row_reasons(&row);
        if !reasons.is_empty() {
            report.push(describe(&row, row.get(FREQUENCY)).with(REASON, reasons.join("; ")));
        }
    }

    for group in group_by(dataset, "Flextjänstnr") {
        if let Some(deviation) = count_deviation(&group) {
            report.push(deviation);
        }
    }

    Ok(report)
}

/// Structural problems with a single row, in a fixed order.
fn row_reasons(row: &Row<'_>) -> Vec<String> {
    let mut reasons = Vec::new();

    let service_area_blank = row.is_blank(SERVICE_AREA);
    let location_area_blank = row.is_blank(LOCATION_AREA);
    if service_area_blank {
        reasons.push("Saknar Utförandeområde flextjänst".to_string());
    }
    if location_area_blank {
        reasons.push("Saknar Utförandeområde flexplats".to_string());
    }
    if !service_area_blank
        && !location_area_blank
        && row.norm(SERVICE_AREA) != row.norm(LOCATION_AREA)
    {
        reasons.push("Utförandeområde flextjänst ≠ Utförandeområde flexplats".to_string());
    }

    let plan_blank = row.is_blank(ROUTE_PLAN);
    if plan_blank {
        reasons.push("Saknar Ind. körtursplan".to_string());
    }
    if row.is_blank(ROUTE_NAME) {
        reasons.push("Saknar Körtursnamn".to_string());
    }

    let frequency = row.norm(FREQUENCY);
    let plan = row.norm(ROUTE_PLAN);
    let name = row.norm(ROUTE_NAME);

    let odd_or_even = plan.contains("udda år") || plan.contains("jämna år");
    if frequency.contains("vartannat år") && !odd_or_even {
        reasons.push(
            "Hämtfrekvens 'Vartannat år' kräver 'udda år' eller 'jämna år' i Ind. körtursplan"
                .to_string(),
        );
    }

    if !plan_blank {
        for token in week_tokens(&plan) {
            if !name.contains(&token) {
                reasons.push(format!(
                    "Ind. körtursplan innehåller '{token}' men Körtursnamn innehåller inte '{token}'"
                ));
            }
        }
    }

    let freq_bud = frequency.contains("bud");
    let plan_bud = plan.contains("bud");
    let name_bud = name.contains("bud");
    if freq_bud {
        if !plan.contains("budning") {
            reasons.push("Hämtfrekvens 'Bud' kräver 'Budning' i Ind. körtursplan".to_string());
        }
        if !name_bud {
            reasons.push("Hämtfrekvens 'Bud' kräver 'bud' i Körtursnamn".to_string());
        }
    }
    if plan_bud {
        if !freq_bud {
            reasons.push("Ind. körtursplan 'Budning' kräver Hämtfrekvens 'Bud'".to_string());
        }
        if !name_bud {
            reasons.push("Ind. körtursplan 'Budning' kräver 'bud' i Körtursnamn".to_string());
        }
    }
    if name_bud && !freq_bud && !plan_bud {
        reasons.push(
            "Körtursnamn innehåller 'bud' men saknar Bud i Hämtfrekvens/Ind. körtursplan"
                .to_string(),
        );
    }

    if frequency.is_empty() {
        reasons.push("Saknar Hämtfrekvens".to_string());
    }

    reasons
}

/// Compare a service's row count with the yearly count its frequency implies.
fn count_deviation(group: &Group<'_>) -> Option<Deviation> {
    let mut frequencies: Vec<String> = Vec::new();
    for row in &group.rows {
        let text = row.text(FREQUENCY);
        if !text.is_empty() && !frequencies.contains(&text) {
            frequencies.push(text);
        }
    }

    let expected: BTreeSet<u32> = frequencies
        .iter()
        .filter_map(|f| expected_yearly_count(f))
        .collect();
    let actual = group.rows.len();
    let representative = group.first();

    match expected.len() {
        0 => None,
        1 => {
            let expected = *expected.first()?;
            if actual == expected as usize {
                return None;
            }
            Some(
                describe(&representative, representative.get(FREQUENCY)).with(
                    REASON,
                    format!(
                        "Flextjänstnr förekommer {actual} gånger men förväntat {expected} enligt Hämtfrekvens"
                    ),
                ),
            )
        }
        _ => {
            let listed: Vec<String> = expected.iter().map(|n| n.to_string()).collect();
            tracing::debug!(
                flextjanstnr = %group.key,
                expected = ?listed,
                "inconsistent frequencies"
            );
            Some(
                describe(&representative, frequencies.join(", ")).with(
                    REASON,
                    format!(
                        "Inkonsekventa Hämtfrekvenser inom flextjänst (ger förväntningar {})",
                        listed.join(", ")
                    ),
                ),
            )
        }
    }
}

/// Every output column but the reason, in report order, with `frequency`
/// shown in the frequency column.
fn describe(row: &Row<'_>, frequency: impl Into<CellValue>) -> Deviation {
    Deviation::new()
        .with("Affärsenhet", row.get("Affärsenhet"))
        .with("Kundnr", row.get("Kundnr"))
        .with("Flexplatsadress", row.get("Flexplatsadress"))
        .with("Flextjänstnr", row.get("Flextjänstnr"))
        .with("Flexgrupp namn", row.get("Flexgrupp namn"))
        .with("Flextyp", row.get("Flextyp"))
        .with(SERVICE_AREA, row.get(SERVICE_AREA))
        .with(LOCATION_AREA, row.get(LOCATION_AREA))
        .with(FREQUENCY, frequency)
        .with(ROUTE_PLAN, row.get(ROUTE_PLAN))
        .with(ROUTE_NAME, row.get(ROUTE_NAME))
}
