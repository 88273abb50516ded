use crate::config::{OptionValue, RuleConfiguration, RuleSetting};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Failure to turn a settings file into a model. All-or-nothing: a failed
/// parse never yields a partially populated configuration.
#[derive(Debug)]
pub enum ParseError {
    Read(std::io::Error),
    Syntax(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Read(e) => write!(f, "failed to read settings file: {}", e),
            ParseError::Syntax(e) => write!(f, "malformed settings document: {}", e),
            ParseError::Serialize(e) => write!(f, "failed to serialize settings: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

/// On-disk form of a settings document.
///
/// Key casing follows the external analyzer's settings schema exactly:
/// `ExcludeRules`, `Rules`, `Enable`, `Options`. `Rules` is required;
/// `ExcludeRules` defaults to empty. The raw form keeps duplicate exclusion
/// entries so the lint layer can see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "ExcludeRules", default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_rules: Vec<String>,
    #[serde(rename = "Rules")]
    pub rules: BTreeMap<String, RuleEntry>,
}

/// A single entry under `Rules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(rename = "Enable")]
    pub enable: bool,
    #[serde(rename = "Options", skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, OptionValue>>,
}

impl Document {
    /// Collapse the on-disk form into the query model.
    pub fn into_config(self) -> RuleConfiguration {
        RuleConfiguration {
            excluded_rules: self.exclude_rules.into_iter().collect(),
            rules: self
                .rules
                .into_iter()
                .map(|(id, entry)| {
                    (
                        id,
                        RuleSetting {
                            enable: entry.enable,
                            options: entry.options.unwrap_or_default(),
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn from_config(config: &RuleConfiguration) -> Document {
        Document {
            exclude_rules: config.excluded_rules.iter().cloned().collect(),
            rules: config
                .rules
                .iter()
                .map(|(id, setting)| {
                    (
                        id.clone(),
                        RuleEntry {
                            enable: setting.enable,
                            options: if setting.options.is_empty() {
                                None
                            } else {
                                Some(setting.options.clone())
                            },
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Parse a settings document, keeping the raw on-disk form.
pub fn parse_str(text: &str) -> Result<Document, ParseError> {
    toml::from_str(text).map_err(ParseError::Syntax)
}

/// Parse a settings document into the query model.
pub fn load_str(text: &str) -> Result<RuleConfiguration, ParseError> {
    parse_str(text).map(Document::into_config)
}

/// Read and parse a settings file into the query model.
pub fn load_file(path: &Path) -> Result<RuleConfiguration, ParseError> {
    let text = fs::read_to_string(path).map_err(ParseError::Read)?;
    load_str(&text)
}

/// Serialize a configuration back to document form.
pub fn to_toml(config: &RuleConfiguration) -> Result<String, ParseError> {
    toml::to_string_pretty(&Document::from_config(config)).map_err(ParseError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;

    const SAMPLE: &str = r#"
ExcludeRules = ["PSAvoidUsingWriteHost"]

[Rules.PSAvoidUsingWriteHost]
Enable = false

[Rules.PSAvoidLongLines]
Enable = true

[Rules.PSAvoidLongLines.Options]
MaximumLineLength = 120

[Rules.PSProvideCommentHelp]
Enable = true

[Rules.PSProvideCommentHelp.Options]
Required = "ExportedOnly"
"#;

    #[test]
    fn parses_full_document() {
        let config = load_str(SAMPLE).unwrap();
        assert!(config.is_excluded("PSAvoidUsingWriteHost"));
        assert!(!config.is_enabled("PSAvoidUsingWriteHost", true));
        assert!(config.is_enabled("PSAvoidLongLines", false));
        assert_eq!(
            config.options_for("PSAvoidLongLines").get("MaximumLineLength"),
            Some(&OptionValue::Int(120))
        );
        assert_eq!(
            config
                .options_for("PSProvideCommentHelp")
                .get("Required")
                .and_then(|v| v.as_str()),
            Some("ExportedOnly")
        );
    }

    #[test]
    fn exclude_rules_defaults_to_empty() {
        let config = load_str("[Rules.PSUseApprovedVerbs]\nEnable = true\n").unwrap();
        assert!(config.excluded_rules.is_empty());
        assert!(config.is_enabled("PSUseApprovedVerbs", false));
    }

    #[test]
    fn missing_rules_table_is_an_error() {
        let err = load_str("ExcludeRules = [\"PSAvoidUsingWriteHost\"]\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn string_enable_is_an_error() {
        let err = load_str("[Rules.PSAvoidLongLines]\nEnable = \"true\"\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn non_scalar_option_is_an_error() {
        let text = "[Rules.PSAvoidLongLines]\nEnable = true\n\n[Rules.PSAvoidLongLines.Options]\nMaximumLineLength = [120]\n";
        let err = load_str(text).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn duplicate_rule_identifier_is_an_error() {
        let text = "[Rules.PSAvoidLongLines]\nEnable = true\n\n[Rules.PSAvoidLongLines]\nEnable = false\n";
        let err = load_str(text).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn unbalanced_structure_is_an_error() {
        let err = load_str("[Rules.PSAvoidLongLines\nEnable = true\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn round_trip_preserves_model() {
        let config = load_str(SAMPLE).unwrap();
        let rendered = to_toml(&config).unwrap();
        let reparsed = load_str(&rendered).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn round_trip_preserves_scalar_kinds() {
        let mut config = RuleConfiguration::default();
        let mut options = BTreeMap::new();
        options.insert("MaximumLineLength".to_string(), OptionValue::Int(120));
        options.insert("CheckPipe".to_string(), OptionValue::Bool(true));
        options.insert("Required".to_string(), OptionValue::Str("ReadOnly".into()));
        config.rules.insert(
            "PSAlignAssignmentStatement".to_string(),
            RuleSetting {
                enable: true,
                options,
            },
        );

        let reparsed = load_str(&to_toml(&config).unwrap()).unwrap();
        let options = reparsed.options_for("PSAlignAssignmentStatement");
        assert_eq!(options.get("MaximumLineLength"), Some(&OptionValue::Int(120)));
        assert_eq!(options.get("CheckPipe"), Some(&OptionValue::Bool(true)));
        assert_eq!(
            options.get("Required"),
            Some(&OptionValue::Str("ReadOnly".into()))
        );
    }

    #[test]
    fn raw_form_keeps_duplicate_exclusions() {
        let text = "ExcludeRules = [\"PSAvoidUsingWriteHost\", \"PSAvoidUsingWriteHost\"]\n\n[Rules.PSAvoidLongLines]\nEnable = true\n";
        let doc = parse_str(text).unwrap();
        assert_eq!(doc.exclude_rules.len(), 2);
        // The query model deduplicates.
        assert_eq!(doc.into_config().excluded_rules.len(), 1);
    }

    #[test]
    fn load_file_reports_read_failure() {
        let err = load_file(Path::new("does/not/exist.ruleset.toml")).unwrap_err();
        assert!(matches!(err, ParseError::Read(_)));
    }

    #[test]
    fn load_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = load_file(file.path()).unwrap();
        assert!(config.is_enabled("PSAvoidLongLines", false));
    }
}
