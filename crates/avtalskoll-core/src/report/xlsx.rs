//! Deviation workbook output.

use std::io::Write;
use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use crate::checks::DeviationReport;
use crate::error::AvtalskollError;
use crate::model::CellValue;

pub const SHEET_NAME: &str = "Avvikelser";

/// Render a report as a one-sheet xlsx workbook.
pub fn write_report_to_buffer(report: &DeviationReport) -> Result<Vec<u8>, AvtalskollError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    fill_sheet(sheet, report)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write the report workbook to `path`.
///
/// The file is written to a temporary name in the same directory and renamed
/// into place, so `path` never holds a partial workbook.
pub fn write_report_file(report: &DeviationReport, path: &Path) -> Result<(), AvtalskollError> {
    let bytes = write_report_to_buffer(report)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.persist(path).map_err(|e| AvtalskollError::Io(e.error))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "report written");
    Ok(())
}

fn fill_sheet(sheet: &mut Worksheet, report: &DeviationReport) -> Result<(), AvtalskollError> {
    let header = Format::new().set_bold().set_align(FormatAlign::Left);
    let cell = Format::new().set_align(FormatAlign::Left);
    let width = report.check.column_width();

    for (col, name) in report.columns.iter().enumerate() {
        let col = column_number(col)?;
        sheet.set_column_width(col, width)?;
        sheet.write_string_with_format(0, col, name, &header)?;
    }

    for (index, deviation) in report.deviations.iter().enumerate() {
        let row = u32::try_from(index + 1)
            .map_err(|_| AvtalskollError::Report("too many deviations for one sheet".into()))?;
        for (col, name) in report.columns.iter().enumerate() {
            let col = column_number(col)?;
            match deviation.get(name) {
                Some(CellValue::Number(d)) => match d.to_f64() {
                    Some(n) => sheet.write_number_with_format(row, col, n, &cell)?,
                    None => sheet.write_string_with_format(row, col, d.to_string(), &cell)?,
                },
                Some(CellValue::Text(s)) => sheet.write_string_with_format(row, col, s, &cell)?,
                Some(CellValue::Empty) | None => sheet.write_blank(row, col, &cell)?,
            };
        }
    }

    Ok(())
}

fn column_number(index: usize) -> Result<u16, AvtalskollError> {
    u16::try_from(index).map_err(|_| AvtalskollError::Report("too many columns".into()))
}
