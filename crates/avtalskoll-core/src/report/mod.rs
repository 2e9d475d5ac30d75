pub mod xlsx;

pub use xlsx::{write_report_file, write_report_to_buffer, SHEET_NAME};
