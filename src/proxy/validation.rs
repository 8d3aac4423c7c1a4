//! Rule-list checking with detailed issue reporting.
//!
//! The transformer skips bad rules silently. [`check_rules`] explains what
//! it would skip and why, and flags rules that are kept but look wrong:
//! empty prefixes, targets that are not http(s) URLs, ignored option
//! values, overridden reserved keys and duplicate prefixes.

use std::collections::HashMap;

use url::Url;

use super::options::RESERVED_KEYS;
use super::rewrite::PathRewrite;
use super::ProxyMap;
use crate::error::{RuleIssue, Severity};
use crate::literal::Literal;

/// Validate a target URL. Returns `Ok(())` or a human-readable error.
pub fn validate_target_url(target: &str) -> Result<(), String> {
    match Url::parse(target) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme == "http" || scheme == "https" || scheme == "ws" || scheme == "wss" {
                Ok(())
            } else {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http, https, ws or wss)"
                ))
            }
        }
        Err(_) => Err(format!("'{target}' is not a valid URL")),
    }
}

fn issue(rule: &str, field: &str, severity: Severity, message: String) -> RuleIssue {
    RuleIssue {
        rule: rule.to_string(),
        field: field.into(),
        message,
        suggestion: None,
        severity,
    }
}

#[must_use]
pub fn check_rules(list: &[Literal]) -> Vec<RuleIssue> {
    let mut issues = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (i, item) in list.iter().enumerate() {
        let index_id = format!("rules[{i}]");

        let Some(items) = item.as_array() else {
            issues.push(issue(
                &index_id,
                "rule",
                Severity::Error,
                format!("expected a [prefix, target, rewrite?, options?] list, got {}", item.kind()),
            ));
            continue;
        };

        if items.len() < 2 {
            let mut e = issue(
                &index_id,
                "rule",
                Severity::Error,
                format!("has {} element(s), at least prefix and target are required", items.len()),
            );
            if let Some(prefix) = items.first().and_then(Literal::as_str) {
                e.suggestion = Some(format!("did you mean ['{prefix}', 'http://localhost:3000']?"));
            }
            issues.push(e);
            continue;
        }

        let prefix = items[0].as_str();
        let target = items[1].as_str();
        let rule_id = prefix.map_or_else(|| index_id.clone(), |p| format!("{index_id} '{p}'"));

        if prefix.is_none() {
            issues.push(issue(
                &rule_id,
                "prefix",
                Severity::Error,
                format!("must be a string, got {}", items[0].kind()),
            ));
        }
        if target.is_none() {
            issues.push(issue(
                &rule_id,
                "target",
                Severity::Error,
                format!("must be a string, got {}", items[1].kind()),
            ));
        }
        let (Some(prefix), Some(target)) = (prefix, target) else {
            continue;
        };

        if prefix.is_empty() {
            issues.push(issue(
                &rule_id,
                "prefix",
                Severity::Warning,
                "empty prefix matches every request".into(),
            ));
        }

        if let Err(msg) = validate_target_url(target) {
            let mut w = issue(&rule_id, "target", Severity::Warning, msg);
            if !target.contains("://") {
                w.suggestion = Some(format!("did you mean 'http://{target}'?"));
            }
            issues.push(w);
        }

        match items.get(2) {
            Some(Literal::String(replacement)) => {
                if let Err(e) = PathRewrite::new(prefix, replacement.as_str()) {
                    issues.push(issue(
                        &rule_id,
                        "prefix",
                        Severity::Error,
                        format!("not a valid pattern: {e}"),
                    ));
                }
            }
            Some(Literal::Undefined) | None => {}
            Some(other) => issues.push(issue(
                &rule_id,
                "rewrite",
                Severity::Warning,
                format!("{} is ignored, no rewrite will be applied", other.kind()),
            )),
        }

        match items.get(3) {
            Some(Literal::Object(entries)) => {
                for (key, _) in entries {
                    if RESERVED_KEYS.contains(&key.as_str()) {
                        issues.push(issue(
                            &rule_id,
                            &format!("options.{key}"),
                            Severity::Warning,
                            "is always set from the rule and will be overridden".into(),
                        ));
                    }
                }
            }
            Some(Literal::Undefined) | None => {}
            Some(other) => issues.push(issue(
                &rule_id,
                "options",
                Severity::Warning,
                format!("expected an object, {} is ignored", other.kind()),
            )),
        }

        if items.len() > 4 {
            issues.push(issue(
                &rule_id,
                "rule",
                Severity::Warning,
                format!("{} extra element(s) are ignored", items.len() - 4),
            ));
        }

        if let Some(first) = seen.insert(prefix, i) {
            let mut w = issue(
                &rule_id,
                "prefix",
                Severity::Warning,
                format!("duplicates rules[{first}], the later rule wins"),
            );
            w.suggestion = Some("remove one of the rules".into());
            issues.push(w);
        }
    }

    issues
}

#[must_use]
pub fn has_errors(issues: &[RuleIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

#[must_use]
pub fn format_check_report(source: &str, list: &[Literal], proxies: &ProxyMap) -> String {
    let mut lines = vec![format!(
        "  {} rules, {} proxies\n",
        list.len(),
        proxies.len()
    )];

    for (prefix, entry) in proxies {
        lines.push(format!(
            "  {}  -> {}",
            prefix,
            entry.target().unwrap_or("(none)")
        ));
        match entry.rewrite {
            Some(ref rw) => lines.push(format!("    rewrite: '{}'", rw.replacement())),
            None => lines.push("    rewrite: none".into()),
        }
        let flags: Vec<String> = entry
            .options
            .iter()
            .filter(|(k, _)| k.as_str() != "target")
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        lines.push(format!("    options: {}", flags.join(", ")));
    }

    format!("{} is valid\n{}", source, lines.join("\n"))
}
