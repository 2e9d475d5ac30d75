use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AvtalskollError {
    #[error("missing columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("failed to read workbook: {0}")]
    ParseError(String),

    #[error("failed to load rule configuration from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid rule configuration: {0}")]
    ConfigInvalid(String),

    #[error("unsupported input: {0}. Only Excel files (.xlsx) are accepted.")]
    UnsupportedInput(String),

    #[error("input is {size} bytes, maximum allowed is {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("path rejected: {0}")]
    PathRejected(String),

    #[error("failed to write report: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rust_xlsxwriter::XlsxError> for AvtalskollError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        AvtalskollError::Report(e.to_string())
    }
}
