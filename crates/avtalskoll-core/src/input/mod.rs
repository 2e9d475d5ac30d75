pub mod xlsx;

use crate::error::AvtalskollError;
use crate::model::Dataset;

pub use xlsx::XlsxReader;

/// Trait for workbook loading backends.
pub trait TableReader: Send + Sync {
    /// Read workbook bytes into a dataset, header row first.
    fn read(&self, bytes: &[u8]) -> Result<Dataset, AvtalskollError>;

    /// Name of this loading backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
