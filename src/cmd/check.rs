//! `proxy-from-env check`: explain problems in a rule list.
//!
//! Parses the rule list, reports every rule the transformer would skip and
//! every rule that looks suspicious, in human-readable text or
//! machine-readable JSON format.

use crate::cli::{CheckArgs, CheckFormat};
use crate::error::{ProxyEnvError, RuleIssue};
use crate::proxy::{parse_rule_list, validation};

fn issue_json(issue: &RuleIssue) -> serde_json::Value {
    serde_json::json!({
        "rule": issue.rule,
        "field": issue.field,
        "severity": issue.severity.as_str(),
        "message": issue.message,
        "suggestion": issue.suggestion,
    })
}

pub fn execute(args: &CheckArgs) -> Result<(), ProxyEnvError> {
    let transformer = super::build_transformer(args.config.as_deref())?;
    let (text, source) = super::read_input(&args.input)?;

    let list = match parse_rule_list(&text) {
        Ok(list) => list,
        Err(error) => {
            match args.format {
                CheckFormat::Text => {
                    eprintln!("\u{2717} {source} could not be parsed\n  {error}");
                }
                CheckFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "valid": false, "error": error.to_string() })
                ),
            }
            return Err(error);
        }
    };

    let issues = validation::check_rules(&list);
    let failed = validation::has_errors(&issues);

    match args.format {
        CheckFormat::Text => {
            if !issues.is_empty() {
                let mark = if failed { "\u{2717}" } else { "!" };
                eprintln!("{mark} {source} has {} issue(s)\n", issues.len());
                for issue in &issues {
                    eprintln!("{issue}");
                }
                eprintln!();
            }
        }
        CheckFormat::Json => {
            let proxies = transformer.transform(list.clone());
            println!(
                "{}",
                serde_json::json!({
                    "valid": !failed,
                    "rules": list.len(),
                    "proxies": proxies.len(),
                    "issues": issues.iter().map(issue_json).collect::<Vec<_>>(),
                })
            );
        }
    }

    if failed {
        return Err(ProxyEnvError::RuleCheck { issues });
    }

    if matches!(args.format, CheckFormat::Text) {
        let proxies = transformer.transform(list.clone());
        println!(
            "\u{2713} {}",
            validation::format_check_report(&source, &list, &proxies)
        );
    }
    Ok(())
}
