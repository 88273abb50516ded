use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A single scalar option value attached to a rule.
///
/// Option keys are rule-specific and carry no cross-rule meaning; the model
/// only preserves them faithfully for the external analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(n) => write!(f, "{}", n),
            OptionValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Per-rule settings: the enable flag plus rule-specific scalar options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleSetting {
    pub enable: bool,
    pub options: BTreeMap<String, OptionValue>,
}

/// A fully loaded rule-settings document.
///
/// Authored once, read wholesale by the external analyzer, never mutated at
/// runtime. Identifiers in `excluded_rules` are disabled globally regardless
/// of their own `enable` flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleConfiguration {
    pub excluded_rules: BTreeSet<String>,
    pub rules: BTreeMap<String, RuleSetting>,
}

static NO_OPTIONS: BTreeMap<String, OptionValue> = BTreeMap::new();

impl RuleConfiguration {
    pub fn is_excluded(&self, rule_id: &str) -> bool {
        self.excluded_rules.contains(rule_id)
    }

    /// Effective enablement for a rule.
    ///
    /// Exclusion takes precedence over the rule's own flag. Rules absent from
    /// the document fall back to the caller-supplied `default` — the external
    /// analyzer's defaults are its own business.
    pub fn is_enabled(&self, rule_id: &str, default: bool) -> bool {
        if self.is_excluded(rule_id) {
            return false;
        }
        self.rules.get(rule_id).map(|s| s.enable).unwrap_or(default)
    }

    /// Options configured for a rule, or an empty map when the rule is absent.
    pub fn options_for(&self, rule_id: &str) -> &BTreeMap<String, OptionValue> {
        self.rules
            .get(rule_id)
            .map(|s| &s.options)
            .unwrap_or(&NO_OPTIONS)
    }

    pub fn setting(&self, rule_id: &str) -> Option<&RuleSetting> {
        self.rules.get(rule_id)
    }

    /// Full effective state of one rule, for the `query` command.
    pub fn query(&self, rule_id: &str, default: bool) -> QueryReport {
        QueryReport {
            rule_id: rule_id.to_string(),
            excluded: self.is_excluded(rule_id),
            listed: self.rules.contains_key(rule_id),
            enabled: self.is_enabled(rule_id, default),
            options: self.options_for(rule_id).clone(),
        }
    }
}

/// Resolved state of a single rule identifier against a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryReport {
    pub rule_id: String,
    pub excluded: bool,
    pub listed: bool,
    pub enabled: bool,
    pub options: BTreeMap<String, OptionValue>,
}
