use regex::Regex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("static regex"));

static WEEK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vecka\s*\d{1,2}").expect("static regex"));

const BIENNIAL_PHRASES: &[&str] = &["vartannat år", "vartannat-år"];

/// Lower-case and trim a free-text label for table lookups.
pub fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Map a frequency description to collections per week.
///
/// The vocabulary is closed: anything not in `table` is unknown and returns
/// `None`. Keys of `table` are expected to be normalized already.
pub fn per_week(text: &str, table: &BTreeMap<String, Decimal>) -> Option<Decimal> {
    table.get(&normalize_label(text)).copied()
}

/// Expected yearly visit count for a frequency description.
///
/// "Vartannat år" counts as one visit. Otherwise the first number in the text
/// is used when it lies in 1..=12.
pub fn expected_yearly_count(text: &str) -> Option<u32> {
    let s = normalize_label(text);
    if s.is_empty() {
        return None;
    }
    if BIENNIAL_PHRASES.iter().any(|p| s.contains(p)) {
        return Some(1);
    }
    let digits = FIRST_NUMBER.captures(&s)?.get(1)?.as_str();
    match digits.parse::<u32>() {
        Ok(n) if (1..=12).contains(&n) => Some(n),
        _ => None,
    }
}

/// All "vecka N" tokens in `text`, lower-cased, in order of appearance,
/// without repeats.
pub fn week_tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tokens: Vec<String> = Vec::new();
    for m in WEEK_TOKEN.find_iter(&lower) {
        let token = m.as_str().trim().to_string();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
