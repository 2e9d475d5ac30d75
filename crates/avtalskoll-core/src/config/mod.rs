pub mod builtin;
pub mod schema;

use crate::error::AvtalskollError;
use crate::parsing::normalize::normalize_label;
use rust_decimal::Decimal;
use schema::RuleConfig;
use std::collections::HashSet;
use std::path::Path;

/// Load a rule configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<RuleConfig, AvtalskollError> {
    let content = std::fs::read_to_string(path).map_err(|e| AvtalskollError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a rule configuration from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<RuleConfig, AvtalskollError> {
    let config: RuleConfig =
        serde_json::from_str(json).map_err(|e| AvtalskollError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a rule configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<RuleConfig, AvtalskollError> {
    let config: RuleConfig = serde_json::from_str(json).map_err(AvtalskollError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a rule configuration is well-formed.
pub fn validate_config(config: &RuleConfig) -> Result<(), AvtalskollError> {
    if config.weekly_frequencies.is_empty() {
        return Err(AvtalskollError::ConfigInvalid(
            "weekly_frequencies must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for (text, value) in &config.weekly_frequencies {
        let key = normalize_label(text);
        if key.is_empty() {
            return Err(AvtalskollError::ConfigInvalid(
                "frequency text must not be empty".into(),
            ));
        }
        if *value <= Decimal::ZERO {
            return Err(AvtalskollError::ConfigInvalid(format!(
                "frequency '{}' must map to a positive value, got {}",
                text, value
            )));
        }
        if !seen.insert(key) {
            return Err(AvtalskollError::ConfigInvalid(format!(
                "frequency '{}' is listed more than once (case-insensitive)",
                text
            )));
        }
    }

    let fractions = &config.fractions;
    let primary = normalize_label(&fractions.primary);
    let secondary = normalize_label(&fractions.secondary);
    if primary.is_empty() || secondary.is_empty() {
        return Err(AvtalskollError::ConfigInvalid(
            "fraction labels must not be empty".into(),
        ));
    }
    if primary == secondary {
        return Err(AvtalskollError::ConfigInvalid(format!(
            "primary and secondary fraction are both '{}'",
            fractions.primary
        )));
    }

    for policy in &config.billing.policies {
        if normalize_label(&policy.prefix).is_empty() {
            return Err(AvtalskollError::ConfigInvalid(format!(
                "billing policy '{}' has an empty prefix",
                policy.label
            )));
        }
        match (&policy.expected, policy.by_price_list.is_empty()) {
            (Some(_), false) => {
                return Err(AvtalskollError::ConfigInvalid(format!(
                    "billing policy '{}' sets both 'expected' and 'by_price_list'",
                    policy.label
                )));
            }
            (None, true) => {
                return Err(AvtalskollError::ConfigInvalid(format!(
                    "billing policy '{}' needs 'expected' or 'by_price_list'",
                    policy.label
                )));
            }
            _ => {}
        }
    }

    let groups = &config.flex_groups;
    if groups.containers.is_empty() || groups.addons.is_empty() {
        return Err(AvtalskollError::ConfigInvalid(
            "flex_groups needs at least one container and one addon label".into(),
        ));
    }
    let containers: HashSet<String> = groups
        .containers
        .iter()
        .map(|c| normalize_label(c))
        .collect();
    if let Some(both) = groups
        .addons
        .iter()
        .find(|a| containers.contains(&normalize_label(a)))
    {
        return Err(AvtalskollError::ConfigInvalid(format!(
            "flex group '{}' is listed as both container and addon",
            both
        )));
    }

    Ok(())
}
