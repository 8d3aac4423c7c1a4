//! The proxy configuration builder.
//!
//! [`ProxyTransformer`] turns a rule list into a [`ProxyMap`]: one
//! [`ProxyEntry`] per prefix, holding the layered options and an optional
//! [`PathRewrite`]. Options are layered lowest to highest as built-in
//! defaults, builder-wide base options, per-rule options, then `target`.
//!
//! - [`options`] -- Option maps, defaults, and shallow merging.
//! - [`rule`] -- The rule tuple and its shape validation.
//! - [`rewrite`] -- First-match path rewriting.
//! - [`diagnostics`] -- Where parse failures are reported.
//! - [`validation`] -- Explains why rules would be skipped.

pub mod diagnostics;
pub mod options;
pub mod rewrite;
pub mod rule;
pub mod validation;

use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::error::ProxyEnvError;
use crate::literal::{self, Literal};
use diagnostics::{Diagnostic, DiagnosticSink, StderrSink};
use options::{default_options, merge, BuilderOptions, ProxyOptions};
use rewrite::PathRewrite;
use rule::ProxyRule;

/// Prefix → entry, in rule order. A repeated prefix keeps its first
/// position and takes the last rule's entry.
pub type ProxyMap = IndexMap<String, ProxyEntry>;

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyEntry {
    /// Effective options, always including `target`.
    pub options: ProxyOptions,
    pub rewrite: Option<PathRewrite>,
}

impl ProxyEntry {
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.options.get("target").and_then(Value::as_str)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Apply the rewrite, or pass the path through when there is none.
    #[must_use]
    pub fn rewrite_path(&self, path: &str) -> String {
        self.rewrite
            .as_ref()
            .map_or_else(|| path.to_string(), |rw| rw.apply(path))
    }
}

impl Serialize for ProxyEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.rewrite.is_some());
        let mut map = serializer.serialize_map(Some(self.options.len() + extra))?;
        for (key, value) in &self.options {
            map.serialize_entry(key, value)?;
        }
        if let Some(ref rewrite) = self.rewrite {
            map.serialize_entry("rewrite", rewrite)?;
        }
        map.end()
    }
}

/// Everything [`ProxyTransformer::transform`] accepts.
#[derive(Debug, Clone)]
pub enum ProxyInput {
    /// A textual rule list, typically read from an environment variable.
    Text(String),
    /// An already-parsed but unchecked rule list.
    Literals(Vec<Literal>),
    /// Well-formed rules.
    Rules(Vec<ProxyRule>),
    /// Structured data that is not a list; always yields an empty map.
    Other(Literal),
}

impl From<&str> for ProxyInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ProxyInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for ProxyInput {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<Vec<Literal>> for ProxyInput {
    fn from(list: Vec<Literal>) -> Self {
        Self::Literals(list)
    }
}

impl From<Vec<ProxyRule>> for ProxyInput {
    fn from(rules: Vec<ProxyRule>) -> Self {
        Self::Rules(rules)
    }
}

impl From<&[ProxyRule]> for ProxyInput {
    fn from(rules: &[ProxyRule]) -> Self {
        Self::Rules(rules.to_vec())
    }
}

impl From<Value> for ProxyInput {
    fn from(value: Value) -> Self {
        match Literal::from(value) {
            Literal::Array(items) => Self::Literals(items),
            other => Self::Other(other),
        }
    }
}

/// Builds proxy maps from rule lists. Immutable once built, so one instance
/// can serve any number of callers and threads.
#[derive(Clone)]
pub struct ProxyTransformer {
    options: BuilderOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for ProxyTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyTransformer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for ProxyTransformer {
    fn default() -> Self {
        Self::new(BuilderOptions::default())
    }
}

impl ProxyTransformer {
    #[must_use]
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            options: options.sanitized(),
            sink: Arc::new(StderrSink),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Build the proxy map. Never fails: an unusable proxy string yields an
    /// empty map plus one diagnostic, and malformed rules are skipped.
    pub fn transform(&self, input: impl Into<ProxyInput>) -> ProxyMap {
        match input.into() {
            ProxyInput::Text(text) => match self.resolve_text(&text) {
                Some(list) => self.transform_literals(&list),
                None => ProxyMap::new(),
            },
            ProxyInput::Literals(list) => self.transform_literals(&list),
            ProxyInput::Rules(rules) => self.transform_rules(rules),
            ProxyInput::Other(value) => {
                let kind = value.kind();
                self.report(value.to_string(), ProxyEnvError::NotAList { kind });
                ProxyMap::new()
            }
        }
    }

    /// Transform the contents of environment variable `key`. An unset or
    /// non-Unicode variable counts as blank.
    pub fn transform_env(&self, key: &str) -> ProxyMap {
        match std::env::var(key) {
            Ok(text) => self.transform(text),
            Err(_) => {
                tracing::debug!(key, "proxy variable not set");
                ProxyMap::new()
            }
        }
    }

    fn resolve_text(&self, text: &str) -> Option<Vec<Literal>> {
        match parse_rule_list(text) {
            Ok(list) => Some(list),
            Err(error) => {
                self.report(text.to_string(), error);
                None
            }
        }
    }

    fn transform_literals(&self, list: &[Literal]) -> ProxyMap {
        let rules = list.iter().enumerate().filter_map(|(index, item)| {
            let rule = ProxyRule::from_literal(item);
            if rule.is_none() {
                tracing::debug!(index, kind = item.kind(), "skipping malformed proxy rule");
            }
            rule
        });
        self.transform_rules(rules)
    }

    fn transform_rules(&self, rules: impl IntoIterator<Item = ProxyRule>) -> ProxyMap {
        let mut proxies = ProxyMap::new();
        for rule in rules {
            if let Some(entry) = self.build_entry(&rule) {
                tracing::trace!(prefix = %rule.prefix, target = %rule.target, "proxy entry");
                proxies.insert(rule.prefix, entry);
            }
        }
        proxies
    }

    fn build_entry(&self, rule: &ProxyRule) -> Option<ProxyEntry> {
        let rewrite = match rule.rewrite {
            Some(ref replacement) => match PathRewrite::new(&rule.prefix, replacement.as_str()) {
                Ok(rw) => Some(rw),
                Err(source) => {
                    self.report(
                        rule.prefix.clone(),
                        ProxyEnvError::InvalidPattern {
                            prefix: rule.prefix.clone(),
                            source,
                        },
                    );
                    return None;
                }
            },
            None => None,
        };

        let mut options = merge(default_options(&rule.target), &self.options.base_proxy_options);
        options = merge(options, &rule.options);
        for key in &rule.unset {
            options.shift_remove(key);
        }
        options.shift_remove("rewrite");
        options.insert("target".into(), Value::String(rule.target.clone()));

        Some(ProxyEntry { options, rewrite })
    }

    fn report(&self, input: String, error: ProxyEnvError) {
        self.sink.report(&Diagnostic { input, error });
    }
}

/// Parse a proxy string into its unchecked rule list. Blank text is an
/// empty list.
pub fn parse_rule_list(text: &str) -> Result<Vec<Literal>, ProxyEnvError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    match literal::parse(text)? {
        Literal::Array(items) => Ok(items),
        other => Err(ProxyEnvError::NotAList { kind: other.kind() }),
    }
}

/// Functional form of [`ProxyTransformer::new`].
pub fn create_proxy_transformer(
    options: BuilderOptions,
) -> impl Fn(ProxyInput) -> ProxyMap + Send + Sync + Clone {
    let transformer = ProxyTransformer::new(options);
    move |input| transformer.transform(input)
}

static DEFAULT_TRANSFORMER: LazyLock<ProxyTransformer> = LazyLock::new(ProxyTransformer::default);

/// Shared transformer with no base options.
#[must_use]
pub fn default_transformer() -> &'static ProxyTransformer {
    &DEFAULT_TRANSFORMER
}

/// Transform with the [`default_transformer`].
pub fn transform(input: impl Into<ProxyInput>) -> ProxyMap {
    DEFAULT_TRANSFORMER.transform(input)
}
