pub mod billing_group;
pub mod container_count;
pub mod door_addon;
pub mod fraction_frequency;
pub mod outcome;
pub mod price_component;
pub mod sludge_facility;

pub use outcome::{CheckKind, CheckOutcome, DeviationReport, FractionVariant, REASON};

use crate::config::schema::RuleConfig;
use crate::error::AvtalskollError;
use crate::model::{CellValue, Dataset, Row};
use std::collections::HashMap;

/// Run one check against a dataset.
pub fn run(
    kind: CheckKind,
    dataset: &Dataset,
    config: &RuleConfig,
) -> Result<DeviationReport, AvtalskollError> {
    tracing::debug!(check = %kind, rows = dataset.len(), "running check");
    let report = match kind {
        CheckKind::FractionFrequency(variant) => {
            fraction_frequency::check(dataset, config, variant)?
        }
        CheckKind::BillingGroup => billing_group::check(dataset, config)?,
        CheckKind::ContainerCount => container_count::check(dataset)?,
        CheckKind::DoorAddon => door_addon::check(dataset, config)?,
        CheckKind::PriceComponent => price_component::check(dataset)?,
        CheckKind::SludgeFacility => sludge_facility::check(dataset)?,
    };
    tracing::info!(check = %kind, deviations = report.len(), "check finished");
    Ok(report)
}

/// Columns a check requires in its input.
pub fn required_columns(kind: CheckKind) -> &'static [&'static str] {
    match kind {
        CheckKind::FractionFrequency(_) => fraction_frequency::REQUIRED_COLUMNS,
        CheckKind::BillingGroup => billing_group::REQUIRED_COLUMNS,
        CheckKind::ContainerCount => container_count::REQUIRED_COLUMNS,
        CheckKind::DoorAddon => door_addon::REQUIRED_COLUMNS,
        CheckKind::PriceComponent => price_component::REQUIRED_COLUMNS,
        CheckKind::SludgeFacility => sludge_facility::REQUIRED_COLUMNS,
    }
}

/// Rows sharing a key value.
pub(crate) struct Group<'a> {
    pub key: &'a CellValue,
    pub rows: Vec<Row<'a>>,
}

impl<'a> Group<'a> {
    /// First row of the group in source order.
    pub fn first(&self) -> Row<'a> {
        self.rows[0]
    }
}

/// Group rows by `column`, in order of first appearance.
///
/// Rows with a blank key belong to no group.
pub(crate) fn group_by<'a>(dataset: &'a Dataset, column: &str) -> Vec<Group<'a>> {
    let mut slots: HashMap<&'a CellValue, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for row in dataset.rows() {
        let key = row.get(column);
        if key.is_blank() {
            continue;
        }
        match slots.get(key) {
            Some(&i) => groups[i].rows.push(row),
            None => {
                slots.insert(key, groups.len());
                groups.push(Group {
                    key,
                    rows: vec![row],
                });
            }
        }
    }

    groups
}

/// Distinct non-blank display texts of `column` across `rows`, sorted.
pub(crate) fn distinct_sorted(rows: &[Row<'_>], column: &str) -> Vec<String> {
    let mut values: Vec<String> = rows
        .iter()
        .map(|r| r.text(column))
        .filter(|s| !s.is_empty())
        .collect();
    values.sort();
    values.dedup();
    values
}
