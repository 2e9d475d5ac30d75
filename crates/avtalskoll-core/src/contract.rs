use crate::error::AvtalskollError;
use crate::model::Dataset;

/// Fail with every missing column when `dataset` lacks any of `required`.
///
/// Missing names are reported in the order `required` lists them.
pub fn require_columns(dataset: &Dataset, required: &[&str]) -> Result<(), AvtalskollError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !dataset.has_column(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AvtalskollError::Schema { missing })
    }
}
