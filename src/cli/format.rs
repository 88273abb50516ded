use crate::check::CheckResult;
use crate::config::QueryReport;
use crate::lint::Severity;
use serde_json::json;

/// Print diagnostics grouped by file with ANSI colors.
pub fn print_pretty(result: &CheckResult) {
    let total: usize = result.files.iter().map(|f| f.diagnostics.len()).sum();
    if total == 0 {
        println!(
            "\x1b[32m✓\x1b[0m No problems found ({} files checked, {} rules configured)",
            result.files_checked, result.rules_configured
        );
        return;
    }

    for report in &result.files {
        if report.diagnostics.is_empty() {
            continue;
        }

        println!("\n\x1b[4m{}\x1b[0m", report.path.display());
        for d in &report.diagnostics {
            let severity_str = match d.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarn \x1b[0m",
            };

            println!(
                "  {} \x1b[90m{:<22}\x1b[0m {}",
                severity_str, d.check, d.message
            );

            if let Some(ref suggest) = d.suggest {
                println!("        \x1b[90m└─\x1b[0m \x1b[36m{}\x1b[0m", suggest);
            }
        }
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    println!();
    print!("\x1b[1m");
    if errors > 0 {
        print!(
            "\x1b[31m{} error{}\x1b[0m\x1b[1m",
            errors,
            if errors == 1 { "" } else { "s" }
        );
    }
    if errors > 0 && warnings > 0 {
        print!(", ");
    }
    if warnings > 0 {
        print!(
            "\x1b[33m{} warning{}\x1b[0m\x1b[1m",
            warnings,
            if warnings == 1 { "" } else { "s" }
        );
    }
    println!(
        " ({} files checked, {} rules configured)\x1b[0m",
        result.files_checked, result.rules_configured
    );
}

/// Print diagnostics as structured JSON.
pub fn print_json(result: &CheckResult) {
    let files: Vec<_> = result
        .files
        .iter()
        .map(|report| {
            let diagnostics: Vec<_> = report
                .diagnostics
                .iter()
                .map(|d| {
                    json!({
                        "check": d.check,
                        "severity": match d.severity {
                            Severity::Error => "error",
                            Severity::Warning => "warning",
                        },
                        "rule_id": d.rule_id,
                        "message": d.message,
                        "suggest": d.suggest,
                    })
                })
                .collect();

            json!({
                "file": report.path.display().to_string(),
                "rules_configured": report.rules_configured,
                "diagnostics": diagnostics,
            })
        })
        .collect();

    let output = json!({
        "files": files,
        "summary": {
            "errors": result.count(Severity::Error),
            "warnings": result.count(Severity::Warning),
            "files_checked": result.files_checked,
            "rules_configured": result.rules_configured,
        },
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

/// Print the effective state of one rule.
pub fn print_query_pretty(report: &QueryReport) {
    let state = if report.excluded {
        "\x1b[31mdisabled\x1b[0m (excluded)"
    } else if !report.listed {
        if report.enabled {
            "\x1b[32menabled\x1b[0m (not listed, caller default)"
        } else {
            "\x1b[31mdisabled\x1b[0m (not listed, caller default)"
        }
    } else if report.enabled {
        "\x1b[32menabled\x1b[0m"
    } else {
        "\x1b[31mdisabled\x1b[0m"
    };

    println!("\x1b[1m{}\x1b[0m: {}", report.rule_id, state);
    for (key, value) in &report.options {
        println!("  \x1b[90m{}\x1b[0m = {}", key, value);
    }
}

pub fn print_query_json(report: &QueryReport) {
    let output = json!({
        "rule_id": report.rule_id,
        "enabled": report.enabled,
        "excluded": report.excluded,
        "listed": report.listed,
        "options": report.options,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
