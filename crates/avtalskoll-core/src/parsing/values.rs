use crate::model::CellValue;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a container count from a cell.
///
/// Handles formats like:
/// - 4 (numeric cell) -> Some(4)
/// - "4" / " 4.0 " -> Some(4)
/// - "3,0" -> Some(3) (Swedish decimal comma)
/// - 2.7 -> Some(2) (truncated)
/// - blank or non-numeric text -> None
pub fn parse_count(value: &CellValue) -> Option<i64> {
    let decimal = match value {
        CellValue::Number(d) => *d,
        CellValue::Text(s) => parse_decimal(s)?,
        CellValue::Empty => return None,
    };
    decimal.trunc().to_i64()
}

/// Parse a decimal value, handling Swedish comma notation.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let normalized = s.replace(',', ".");
    Decimal::from_str(&normalized).ok()
}
