use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::error::AvtalskollError;

/// A single spreadsheet cell after type coercion at load time.
///
/// Numeric and text cells never compare equal to each other, so grouping on a
/// key column keeps `4` and `"4"` apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(Decimal),
    Text(String),
    Empty,
}

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    pub fn text(s: impl Into<String>) -> CellValue {
        CellValue::Text(s.into())
    }

    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(d) => write!(f, "{}", d.normalize()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&CellValue> for CellValue {
    fn from(v: &CellValue) -> Self {
        v.clone()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<Decimal> for CellValue {
    fn from(d: Decimal) -> Self {
        CellValue::Number(d)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(Decimal::from(n))
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(Decimal::from(n))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// An in-memory table with an ordered column schema.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Dataset {
            columns,
            index,
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must have exactly one cell per column.
    pub fn push_row(&mut self, cells: Vec<CellValue>) -> Result<(), AvtalskollError> {
        if cells.len() != self.columns.len() {
            return Err(AvtalskollError::InvalidValue(format!(
                "row {} has {} cells, expected {}",
                self.rows.len() + 1,
                cells.len(),
                self.columns.len()
            )));
        }
        self.rows.push(cells);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |cells| Row {
            dataset: self,
            cells,
        })
    }

    pub fn row(&self, position: usize) -> Option<Row<'_>> {
        self.rows.get(position).map(|cells| Row {
            dataset: self,
            cells,
        })
    }
}

/// Borrowed view of one dataset row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    dataset: &'a Dataset,
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell for `column`, or `Empty` when the dataset has no such column.
    pub fn get(&self, column: &str) -> &'a CellValue {
        match self.dataset.index.get(column) {
            Some(&i) => &self.cells[i],
            None => &EMPTY,
        }
    }

    pub fn is_blank(&self, column: &str) -> bool {
        self.get(column).is_blank()
    }

    /// Display text of the cell, trimmed.
    pub fn text(&self, column: &str) -> String {
        self.get(column).to_string().trim().to_string()
    }

    /// Trimmed, lower-cased display text of the cell.
    pub fn norm(&self, column: &str) -> String {
        self.text(column).to_lowercase()
    }
}

/// One detected inconsistency: ordered named fields, reason included.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deviation {
    fields: Vec<(String, CellValue)>,
}

impl Deviation {
    pub fn new() -> Self {
        Deviation::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.fields.push((column.to_string(), value.into()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }
}

impl Serialize for Deviation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Dataset {
        let mut ds = Dataset::new(["Flexplats", "Hämtfrekvens"]);
        ds.push_row(vec![CellValue::Number(dec!(12.0)), "  1 gång i veckan ".into()])
            .unwrap();
        ds.push_row(vec![CellValue::Empty, CellValue::Empty]).unwrap();
        ds
    }

    #[test]
    fn test_row_accessors() {
        let ds = sample();
        let row = ds.row(0).unwrap();
        assert_eq!(row.text("Flexplats"), "12");
        assert_eq!(row.norm("Hämtfrekvens"), "1 gång i veckan");
        assert!(ds.row(1).unwrap().is_blank("Flexplats"));
    }

    #[test]
    fn test_unknown_column_reads_empty() {
        let ds = sample();
        assert_eq!(ds.row(0).unwrap().get("Nope"), &CellValue::Empty);
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut ds = Dataset::new(["A", "B"]);
        assert!(ds.push_row(vec!["x".into()]).is_err());
    }

    #[test]
    fn test_number_and_text_keys_differ() {
        assert_ne!(CellValue::Number(dec!(4)), CellValue::text("4"));
        assert_eq!(CellValue::Number(dec!(4.0)), CellValue::Number(dec!(4)));
    }

    #[test]
    fn test_whitespace_text_is_blank() {
        assert!(CellValue::text("   ").is_blank());
        assert!(!CellValue::Number(dec!(0)).is_blank());
    }

    #[test]
    fn test_deviation_serializes_in_field_order() {
        let d = Deviation::new().with("B", "x").with("A", 3usize);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"B":"x","A":"3"}"#);
    }
}
