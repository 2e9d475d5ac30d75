use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::parsing::normalize::normalize_label;

/// Data-driven business tables shared by the checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Frequency text -> collections per week (as string for exact decimal).
    pub weekly_frequencies: BTreeMap<String, Decimal>,
    pub fractions: FractionLabels,
    pub billing: BillingRules,
    pub flex_groups: FlexGroups,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractionLabels {
    /// Fraction that must not be collected more often than `secondary`.
    pub primary: String,
    pub secondary: String,
    /// Label variant -> canonical label.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRules {
    /// Billing groups exempt from every policy.
    #[serde(default)]
    pub ignored_groups: Vec<String>,
    /// Evaluated in order; the first matching prefix wins.
    pub policies: Vec<BillingPolicy>,
}

/// Billing policy for business units whose name starts with `prefix`.
///
/// Exactly one of `expected` and `by_price_list` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingPolicy {
    pub prefix: String,
    /// Display name used in deviation reasons.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_price_list: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlexGroups {
    pub containers: Vec<String>,
    pub addons: Vec<String>,
}

impl RuleConfig {
    /// Frequency table keyed by normalized text.
    pub fn weekly_table(&self) -> BTreeMap<String, Decimal> {
        self.weekly_frequencies
            .iter()
            .map(|(k, v)| (normalize_label(k), *v))
            .collect()
    }
}

impl FractionLabels {
    /// Canonical, normalized fraction label for a raw cell text.
    pub fn canonical(&self, raw: &str) -> String {
        let key = normalize_label(raw);
        self.aliases
            .iter()
            .find(|(alias, _)| normalize_label(alias) == key)
            .map(|(_, canonical)| normalize_label(canonical))
            .unwrap_or(key)
    }
}

impl BillingRules {
    pub fn is_ignored(&self, billing_group: &str) -> bool {
        let key = normalize_label(billing_group);
        self.ignored_groups.iter().any(|g| normalize_label(g) == key)
    }

    /// First policy whose prefix matches the business unit.
    pub fn policy_for(&self, business_unit: &str) -> Option<&BillingPolicy> {
        let unit = normalize_label(business_unit);
        self.policies
            .iter()
            .find(|p| unit.starts_with(&normalize_label(&p.prefix)))
    }
}

impl BillingPolicy {
    /// Expected billing group for a price list, as written in the configuration.
    ///
    /// `None` means the policy asserts nothing for this row.
    pub fn expected_for(&self, price_list: &str) -> Option<&str> {
        if let Some(ref expected) = self.expected {
            return Some(expected.as_str());
        }
        let key = normalize_label(price_list);
        self.by_price_list
            .iter()
            .find(|(list, _)| normalize_label(list) == key)
            .map(|(_, group)| group.as_str())
    }
}

/// Category of a flex group label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexCategory {
    Container,
    Addon,
    Other,
}

impl FlexGroups {
    pub fn categorize(&self, raw: &str) -> FlexCategory {
        let key = normalize_label(raw);
        if self.containers.iter().any(|c| normalize_label(c) == key) {
            FlexCategory::Container
        } else if self.addons.iter().any(|a| normalize_label(a) == key) {
            FlexCategory::Addon
        } else {
            FlexCategory::Other
        }
    }
}
