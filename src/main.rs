use clap::Parser;
use rulefile::check::{self, CheckResult};
use rulefile::cli::format;
use rulefile::cli::{Cli, Commands, OutputFormat};
use rulefile::config::{OptionValue, RuleConfiguration, RuleSetting};
use rulefile::document;
use std::path::Path;
use std::process;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            paths,
            patterns,
            format: output_format,
        } => {
            let result = match check::run_check(&paths, &patterns) {
                Ok(r) => r,
                Err(e) => fail(&e),
            };
            report_and_exit(&result, output_format);
        }

        Commands::Query {
            file,
            rule_id,
            default_enabled,
            format: output_format,
        } => {
            let config = match document::load_file(&file) {
                Ok(c) => c,
                Err(e) => fail(&e),
            };

            let report = config.query(&rule_id, default_enabled);
            match output_format {
                OutputFormat::Pretty => format::print_query_pretty(&report),
                OutputFormat::Json => format::print_query_json(&report),
            }
        }

        Commands::Hook {
            patterns,
            format: output_format,
        } => {
            let result = match check::run_staged_check(&patterns) {
                Ok(r) => r,
                Err(e) => fail(&e),
            };
            report_and_exit(&result, output_format);
        }

        Commands::Init { path } => {
            if let Err(e) = write_starter(&path) {
                fail(&e);
            }
            println!("\x1b[32m✓\x1b[0m Wrote {}", path.display());
        }
    }
}

fn report_and_exit(result: &CheckResult, output_format: OutputFormat) -> ! {
    match output_format {
        OutputFormat::Pretty => format::print_pretty(result),
        OutputFormat::Json => format::print_json(result),
    }
    process::exit(if result.has_errors() { 1 } else { 0 });
}

fn fail(error: &dyn std::error::Error) -> ! {
    eprintln!("\x1b[31merror\x1b[0m: {}", error);
    process::exit(2);
}

#[derive(Debug)]
enum InitError {
    AlreadyExists(String),
    Parse(document::ParseError),
    Write(std::io::Error),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::AlreadyExists(p) => {
                write!(f, "'{}' already exists, refusing to overwrite", p)
            }
            InitError::Parse(e) => write!(f, "{}", e),
            InitError::Write(e) => write!(f, "failed to write settings file: {}", e),
        }
    }
}

impl std::error::Error for InitError {}

/// Write a starter settings document built through the model, so `init`
/// output always round-trips.
fn write_starter(path: &Path) -> Result<(), InitError> {
    if path.exists() {
        return Err(InitError::AlreadyExists(path.display().to_string()));
    }

    let text = document::to_toml(&starter_config()).map_err(InitError::Parse)?;
    std::fs::write(path, text).map_err(InitError::Write)
}

fn starter_config() -> RuleConfiguration {
    let mut config = RuleConfiguration::default();
    config
        .excluded_rules
        .insert("PSAvoidUsingWriteHost".to_string());

    config.rules.insert(
        "PSAvoidUsingCmdletAliases".to_string(),
        RuleSetting {
            enable: true,
            options: Default::default(),
        },
    );

    let mut long_lines = RuleSetting {
        enable: true,
        options: Default::default(),
    };
    long_lines
        .options
        .insert("MaximumLineLength".to_string(), OptionValue::Int(120));
    config
        .rules
        .insert("PSAvoidLongLines".to_string(), long_lines);

    let mut comment_help = RuleSetting {
        enable: true,
        options: Default::default(),
    };
    comment_help
        .options
        .insert("Required".to_string(), OptionValue::Str("ExportedOnly".into()));
    config
        .rules
        .insert("PSProvideCommentHelp".to_string(), comment_help);

    config
}
