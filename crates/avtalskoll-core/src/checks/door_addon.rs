//! Door addons (dörrtillägg) must be collected as often as the densest
//! container at the same location.

use rust_decimal::Decimal;

use crate::checks::{group_by, CheckKind, DeviationReport, REASON};
use crate::config::schema::{FlexCategory, RuleConfig};
use crate::contract::require_columns;
use crate::error::AvtalskollError;
use crate::model::{Dataset, Deviation, Row};
use crate::parsing::normalize::per_week;

pub const REQUIRED_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnummer",
    "Flexplats",
    "Flexplatsadress",
    "Flextjänst",
    "Flexgrupp",
    "Flextyp",
    "Hämtfrekvens",
];

const CONTAINER_MAX: &str = "Kärlens tätaste hämtfrekvens";

const OUTPUT_COLUMNS: &[&str] = &[
    "Affärsenhet",
    "Kundnummer",
    "Flexplats",
    "Flexplatsadress",
    "Flextjänst",
    "Flextyp",
    "Hämtfrekvens",
    CONTAINER_MAX,
    REASON,
];

const ONLY_ADDONS: &str = "Endast flextjänst för dörrtillägg finns på flexplatsen";

pub fn check(dataset: &Dataset, config: &RuleConfig) -> Result<DeviationReport, AvtalskollError> {
    require_columns(dataset, REQUIRED_COLUMNS)?;

    let table = config.weekly_table();
    let mut report = DeviationReport::new(CheckKind::DoorAddon, OUTPUT_COLUMNS);

    for group in group_by(dataset, "Flexplats") {
        let mut containers: Vec<Row<'_>> = Vec::new();
        let mut addons: Vec<Row<'_>> = Vec::new();
        for row in &group.rows {
            match config.flex_groups.categorize(&row.text("Flexgrupp")) {
                FlexCategory::Container => containers.push(*row),
                FlexCategory::Addon => addons.push(*row),
                FlexCategory::Other => {}
            }
        }

        if addons.is_empty() {
            continue;
        }

        if containers.is_empty() {
            tracing::debug!(
                flexplats = %group.key,
                addons = addons.len(),
                "addons without containers"
            );
            for row in &addons {
                report.push(base(row).with(REASON, ONLY_ADDONS));
            }
            continue;
        }

        // Densest container; the first row wins a tie, which only affects the
        // text shown in the report.
        let mut densest: Option<(Decimal, Row<'_>)> = None;
        for row in &containers {
            if let Some(value) = per_week(&row.text("Hämtfrekvens"), &table) {
                if densest.map_or(true, |(best, _)| value > best) {
                    densest = Some((value, *row));
                }
            }
        }

        let Some((max_value, max_row)) = densest else {
            for row in &addons {
                report.push(base(row).with(
                    REASON,
                    "Ingen av kärlens hämtfrekvenser kunde tolkas, dörrtillägget kan inte jämföras",
                ));
            }
            continue;
        };
        let expected_text = max_row.text("Hämtfrekvens");

        for row in &addons {
            let addon_text = row.text("Hämtfrekvens");
            if per_week(&addon_text, &table) == Some(max_value) {
                continue;
            }
            report.push(
                base(row)
                    .with(CONTAINER_MAX, expected_text.as_str())
                    .with(
                        REASON,
                        format!(
                            "Dörrtilläggets hämtfrekvens '{addon_text}' avviker från kärlens tätaste '{expected_text}'"
                        ),
                    ),
            );
        }
    }

    Ok(report)
}

fn base(row: &Row<'_>) -> Deviation {
    Deviation::new()
        .with("Affärsenhet", row.get("Affärsenhet"))
        .with("Kundnummer", row.get("Kundnummer"))
        .with("Flexplats", row.get("Flexplats"))
        .with("Flexplatsadress", row.get("Flexplatsadress"))
        .with("Flextjänst", row.get("Flextjänst"))
        .with("Flextyp", row.get("Flextyp"))
        .with("Hämtfrekvens", row.get("Hämtfrekvens"))
}
