use std::collections::HashSet;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_decimal::Decimal;

use crate::error::AvtalskollError;
use crate::input::TableReader;
use crate::model::{CellValue, Dataset};

/// Reads the first worksheet of an xlsx workbook with `calamine`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxReader;

impl XlsxReader {
    pub fn new() -> Self {
        XlsxReader
    }
}

impl TableReader for XlsxReader {
    fn read(&self, bytes: &[u8]) -> Result<Dataset, AvtalskollError> {
        let cursor = Cursor::new(bytes);
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
            .map_err(|e| AvtalskollError::ParseError(format!("failed to open xlsx: {e}")))?;

        let sheet = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AvtalskollError::ParseError("workbook has no worksheets".into()))?
            .map_err(|e| AvtalskollError::ParseError(format!("failed to read first sheet: {e}")))?;

        // The used range may not start in column A; pad so positions match
        // the sheet's own columns.
        let left_pad = sheet.start().map_or(0, |(_, col)| col as usize);
        let mut rows = sheet.rows();

        let Some(header_cells) = rows.next() else {
            return Err(AvtalskollError::ParseError("first sheet is empty".into()));
        };
        let mut raw_headers: Vec<CellValue> = vec![CellValue::Empty; left_pad];
        raw_headers.extend(header_cells.iter().map(to_cell_value));
        let columns = header_names(&raw_headers);
        let width = columns.len();

        let mut dataset = Dataset::new(columns);
        for (offset, cells) in rows.enumerate() {
            let mut row: Vec<CellValue> = vec![CellValue::Empty; left_pad];
            row.extend(cells.iter().map(to_cell_value));
            row.resize(width, CellValue::Empty);

            if row.iter().all(CellValue::is_blank) {
                // Sheet row numbers are 1-based and the header is row 1.
                tracing::warn!(row = offset + 2, "skipping blank row");
                continue;
            }
            dataset.push_row(row)?;
        }

        tracing::debug!(
            backend = self.backend_name(),
            columns = width,
            rows = dataset.len(),
            "workbook loaded"
        );
        Ok(dataset)
    }

    fn backend_name(&self) -> &str {
        "calamine-xlsx"
    }
}

/// Column names from the header row.
///
/// Blank headers become `Unnamed: N` (N is the zero-based position) and
/// repeated names get `.1`, `.2`, ... suffixes in order of appearance.
fn header_names(cells: &[CellValue]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(cells.len());

    for (position, cell) in cells.iter().enumerate() {
        let base = if cell.is_blank() {
            tracing::warn!(column = position, "blank header");
            format!("Unnamed: {position}")
        } else {
            cell.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(Decimal::from(*i)),
        Data::Float(f) => CellValue::Number(f64_to_decimal(*f)),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Bool(b) => CellValue::Text(if *b { "True" } else { "False" }.into()),
        Data::DateTime(dt) => CellValue::Text(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Convert f64 to Decimal via its shortest display form.
///
/// Avoids artifacts such as 0.0035_f64 becoming 0.00349999...
fn f64_to_decimal(f: f64) -> Decimal {
    format!("{f}")
        .parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use rust_xlsxwriter::Workbook;

    fn workbook(build: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut wb = Workbook::new();
        build(wb.add_worksheet());
        wb.save_to_buffer().unwrap()
    }

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.0035), dec!(0.0035));
        assert_eq!(f64_to_decimal(68.0), dec!(68));
        assert_eq!(f64_to_decimal(0.125), dec!(0.125));
    }

    #[test]
    fn test_header_names_blank_and_duplicates() {
        let cells = vec![
            CellValue::text("Flexplats"),
            CellValue::Empty,
            CellValue::text("Flexplats"),
            CellValue::text("Flexplats"),
        ];
        assert_eq!(
            header_names(&cells),
            vec!["Flexplats", "Unnamed: 1", "Flexplats.1", "Flexplats.2"]
        );
    }

    #[test]
    fn test_reads_typed_cells() {
        let bytes = workbook(|ws| {
            ws.write_string(0, 0, "Flextjänstnr").unwrap();
            ws.write_string(0, 1, "Antal kärl").unwrap();
            ws.write_string(0, 2, "Aktiv").unwrap();
            ws.write_string(1, 0, "X1").unwrap();
            ws.write_number(1, 1, 4.0).unwrap();
            ws.write_boolean(1, 2, true).unwrap();
            ws.write_string(2, 0, "X2").unwrap();
            ws.write_string(2, 1, "   ").unwrap();
        });

        let ds = XlsxReader::new().read(&bytes).unwrap();
        assert_eq!(ds.columns(), &["Flextjänstnr", "Antal kärl", "Aktiv"]);
        assert_eq!(ds.len(), 2);

        let first = ds.row(0).unwrap();
        assert_eq!(first.get("Antal kärl"), &CellValue::Number(dec!(4)));
        assert_eq!(first.get("Aktiv"), &CellValue::text("True"));

        let second = ds.row(1).unwrap();
        assert_eq!(second.get("Antal kärl"), &CellValue::Empty);
        assert_eq!(second.get("Aktiv"), &CellValue::Empty);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let bytes = workbook(|ws| {
            ws.write_string(0, 0, "Kundnummer").unwrap();
            ws.write_string(1, 0, "K1").unwrap();
            ws.write_string(3, 0, "K2").unwrap();
        });

        let ds = XlsxReader::new().read(&bytes).unwrap();
        let keys: Vec<String> = ds.rows().map(|r| r.text("Kundnummer")).collect();
        assert_eq!(keys, vec!["K1", "K2"]);
    }

    #[test]
    fn test_used_range_not_starting_in_column_a() {
        let bytes = workbook(|ws| {
            ws.write_string(0, 1, "Kundnummer").unwrap();
            ws.write_string(1, 1, "K1").unwrap();
        });

        let ds = XlsxReader::new().read(&bytes).unwrap();
        assert_eq!(ds.columns(), &["Unnamed: 0", "Kundnummer"]);
        assert_eq!(ds.row(0).unwrap().text("Kundnummer"), "K1");
    }

    #[test]
    fn test_garbage_bytes_are_parse_error() {
        match XlsxReader::new().read(b"not a workbook") {
            Err(AvtalskollError::ParseError(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
