use crate::document::Document;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Severity level for a settings diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single consistency finding against a settings document.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Stable check name, e.g. `excluded-but-enabled`.
    pub check: &'static str,
    pub severity: Severity,
    /// The rule identifier the finding is about, when there is one.
    pub rule_id: Option<String>,
    pub message: String,
    pub suggest: Option<String>,
}

impl Diagnostic {
    fn warning(check: &'static str, rule_id: &str, message: String) -> Diagnostic {
        Diagnostic {
            check,
            severity: Severity::Warning,
            rule_id: Some(rule_id.to_string()),
            message,
            suggest: None,
        }
    }

    fn with_suggest(mut self, suggest: &str) -> Diagnostic {
        self.suggest = Some(suggest.to_string());
        self
    }
}

/// Shape of a rule identifier as the external analyzer spells them
/// (e.g. `PSAvoidUsingCmdletAliases`).
fn identifier_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[A-Za-z][A-Za-z0-9]*$").expect("static pattern"))
}

/// Run all consistency checks on a parsed document.
///
/// Operates on the raw on-disk form rather than the query model so that
/// duplicate `ExcludeRules` entries are still visible. Findings are ordered:
/// exclusion-list checks first, then per-rule checks in identifier order.
pub fn check_document(doc: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    check_exclusions(doc, &mut diagnostics);
    check_rules(doc, &mut diagnostics);

    diagnostics
}

fn check_exclusions(doc: &Document, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for id in &doc.exclude_rules {
        *seen.entry(id.as_str()).or_insert(0) += 1;
    }

    for (id, count) in &seen {
        if !identifier_pattern().is_match(id) {
            diagnostics.push(Diagnostic {
                check: "malformed-identifier",
                severity: Severity::Error,
                rule_id: Some(id.to_string()),
                message: format!("'{}' is not a valid rule identifier", id),
                suggest: None,
            });
        }

        if *count > 1 {
            diagnostics.push(
                Diagnostic::warning(
                    "duplicate-exclusion",
                    id,
                    format!("'{}' is listed {} times in ExcludeRules", id, count),
                )
                .with_suggest("keep a single entry"),
            );
        }

        match doc.rules.get(*id) {
            Some(entry) if entry.enable => {
                diagnostics.push(
                    Diagnostic::warning(
                        "excluded-but-enabled",
                        id,
                        format!(
                            "'{}' is excluded but configured with Enable = true; exclusion wins",
                            id
                        ),
                    )
                    .with_suggest("remove the exclusion or drop the Enable = true entry"),
                );
            }
            Some(_) => {
                diagnostics.push(
                    Diagnostic::warning(
                        "redundant-exclusion",
                        id,
                        format!("'{}' is excluded and already has Enable = false", id),
                    )
                    .with_suggest("drop one of the two"),
                );
            }
            None => {}
        }
    }
}

fn check_rules(doc: &Document, diagnostics: &mut Vec<Diagnostic>) {
    for (id, entry) in &doc.rules {
        if !identifier_pattern().is_match(id) {
            diagnostics.push(Diagnostic {
                check: "malformed-identifier",
                severity: Severity::Error,
                rule_id: Some(id.clone()),
                message: format!("'{}' is not a valid rule identifier", id),
                suggest: None,
            });
        }

        if let Some(options) = &entry.options {
            if options.is_empty() {
                diagnostics.push(
                    Diagnostic::warning(
                        "empty-options",
                        id,
                        format!("'{}' has an Options table with no entries", id),
                    )
                    .with_suggest("remove the empty Options table"),
                );
            }
            if !entry.enable {
                diagnostics.push(
                    Diagnostic::warning(
                        "options-on-disabled",
                        id,
                        format!("'{}' is disabled but still carries Options", id),
                    )
                    .with_suggest("enable the rule or remove its Options"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;

    fn checks(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
        diagnostics.iter().map(|d| d.check).collect()
    }

    #[test]
    fn clean_document_has_no_findings() {
        let doc = parse_str(
            "ExcludeRules = [\"PSAvoidUsingWriteHost\"]\n\n[Rules.PSAvoidLongLines]\nEnable = true\n\n[Rules.PSAvoidLongLines.Options]\nMaximumLineLength = 120\n",
        )
        .unwrap();
        assert!(check_document(&doc).is_empty());
    }

    #[test]
    fn excluded_but_enabled_is_flagged() {
        let doc = parse_str(
            "ExcludeRules = [\"PSAvoidUsingWriteHost\"]\n\n[Rules.PSAvoidUsingWriteHost]\nEnable = true\n",
        )
        .unwrap();
        let diagnostics = check_document(&doc);
        assert_eq!(checks(&diagnostics), vec!["excluded-but-enabled"]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(
            diagnostics[0].rule_id.as_deref(),
            Some("PSAvoidUsingWriteHost")
        );
        assert!(diagnostics[0].suggest.is_some());
    }

    #[test]
    fn redundant_exclusion_is_flagged() {
        let doc = parse_str(
            "ExcludeRules = [\"PSAvoidUsingWriteHost\"]\n\n[Rules.PSAvoidUsingWriteHost]\nEnable = false\n",
        )
        .unwrap();
        assert_eq!(checks(&check_document(&doc)), vec!["redundant-exclusion"]);
    }

    #[test]
    fn duplicate_exclusion_is_flagged_once() {
        let doc = parse_str(
            "ExcludeRules = [\"PSAvoidUsingWriteHost\", \"PSAvoidUsingWriteHost\"]\n\n[Rules.PSAvoidLongLines]\nEnable = true\n",
        )
        .unwrap();
        let diagnostics = check_document(&doc);
        assert_eq!(checks(&diagnostics), vec!["duplicate-exclusion"]);
        assert!(diagnostics[0].message.contains("2 times"));
    }

    #[test]
    fn malformed_identifier_is_an_error() {
        let doc = parse_str("[Rules.\"PS Avoid-Long Lines!\"]\nEnable = true\n").unwrap();
        let diagnostics = check_document(&doc);
        assert_eq!(checks(&diagnostics), vec!["malformed-identifier"]);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn malformed_excluded_identifier_is_an_error() {
        let doc = parse_str(
            "ExcludeRules = [\"not a rule\"]\n\n[Rules.PSAvoidLongLines]\nEnable = true\n",
        )
        .unwrap();
        assert_eq!(checks(&check_document(&doc)), vec!["malformed-identifier"]);
    }

    #[test]
    fn options_on_disabled_rule_is_flagged() {
        let doc = parse_str(
            "[Rules.PSAvoidLongLines]\nEnable = false\n\n[Rules.PSAvoidLongLines.Options]\nMaximumLineLength = 120\n",
        )
        .unwrap();
        assert_eq!(checks(&check_document(&doc)), vec!["options-on-disabled"]);
    }

    #[test]
    fn empty_options_table_is_flagged() {
        let doc =
            parse_str("[Rules.PSAvoidLongLines]\nEnable = true\nOptions = {}\n").unwrap();
        assert_eq!(checks(&check_document(&doc)), vec!["empty-options"]);
    }

    #[test]
    fn disabled_rule_with_empty_options_gets_both_findings() {
        let doc =
            parse_str("[Rules.PSAvoidLongLines]\nEnable = false\nOptions = {}\n").unwrap();
        assert_eq!(
            checks(&check_document(&doc)),
            vec!["empty-options", "options-on-disabled"]
        );
    }

    #[test]
    fn absent_options_key_is_not_flagged() {
        let doc = parse_str("[Rules.PSAvoidLongLines]\nEnable = false\n").unwrap();
        assert!(check_document(&doc).is_empty());
    }

    #[test]
    fn findings_accumulate_across_checks() {
        let doc = parse_str(
            "ExcludeRules = [\"PSAvoidUsingWriteHost\", \"PSAvoidUsingWriteHost\"]\n\n[Rules.PSAvoidUsingWriteHost]\nEnable = true\n\n[Rules.PSAvoidLongLines]\nEnable = false\n\n[Rules.PSAvoidLongLines.Options]\nMaximumLineLength = 120\n",
        )
        .unwrap();
        let diagnostics = check_document(&doc);
        assert_eq!(
            checks(&diagnostics),
            vec![
                "duplicate-exclusion",
                "excluded-but-enabled",
                "options-on-disabled"
            ]
        );
    }
}
