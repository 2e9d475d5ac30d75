pub mod checks;
pub mod config;
pub mod contract;
pub mod error;
pub mod input;
pub mod model;
pub mod parsing;
pub mod report;
pub mod storage;

use checks::{CheckKind, CheckOutcome};
use config::schema::RuleConfig;
use error::AvtalskollError;
use input::TableReader;
use model::Dataset;

/// Main API entry point: run one check against workbook bytes.
///
/// The workbook is loaded through `reader`, then handed to [`check_dataset`].
pub fn check_workbook(
    bytes: &[u8],
    reader: &dyn TableReader,
    kind: CheckKind,
    config: &RuleConfig,
) -> Result<CheckOutcome, AvtalskollError> {
    let dataset = reader.read(bytes)?;
    tracing::debug!(
        backend = reader.backend_name(),
        rows = dataset.len(),
        "dataset loaded"
    );
    check_dataset(&dataset, kind, config)
}

/// Run one check against an already loaded dataset.
pub fn check_dataset(
    dataset: &Dataset,
    kind: CheckKind,
    config: &RuleConfig,
) -> Result<CheckOutcome, AvtalskollError> {
    let report = checks::run(kind, dataset, config)?;
    Ok(CheckOutcome::from(report))
}
