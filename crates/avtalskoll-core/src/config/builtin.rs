use crate::config::parse_config_str;
use crate::config::schema::RuleConfig;
use crate::error::AvtalskollError;

const DEFAULT_JSON: &str = include_str!("../../../../rules/default.json");

/// Load the compiled-in rule configuration.
pub fn load_default() -> Result<RuleConfig, AvtalskollError> {
    parse_config_str(DEFAULT_JSON)
}

/// The compiled-in configuration as shipped JSON text.
pub fn default_json() -> &'static str {
    DEFAULT_JSON
}

#[cfg(test)]
pub(crate) fn default_config() -> RuleConfig {
    load_default().unwrap()
}
