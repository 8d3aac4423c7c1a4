//! Proxy rules: `[prefix, target, rewrite?, options?]` tuples.

use serde_json::Value;

use super::options::ProxyOptions;
use crate::literal::Literal;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyRule {
    pub prefix: String,
    pub target: String,
    pub rewrite: Option<String>,
    pub options: ProxyOptions,
    /// Option keys explicitly set to `undefined`; they are removed from the
    /// merged options.
    pub unset: Vec<String>,
}

impl ProxyRule {
    #[must_use]
    pub fn new(prefix: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.rewrite = Some(rewrite.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ProxyOptions) -> Self {
        self.options = options;
        self
    }

    /// Shape-check a loose rule. `None` means the rule is skipped: not a
    /// list, fewer than two elements, or a non-string prefix or target.
    ///
    /// A non-string third element means "no rewrite"; a non-object fourth
    /// element contributes no options.
    #[must_use]
    pub fn from_literal(item: &Literal) -> Option<Self> {
        let items = item.as_array()?;
        if items.len() < 2 {
            return None;
        }
        let prefix = items[0].as_str()?;
        let target = items[1].as_str()?;

        let mut rule = Self::new(prefix, target);
        rule.rewrite = items.get(2).and_then(Literal::as_str).map(str::to_string);

        if let Some(entries) = items.get(3).and_then(Literal::as_object) {
            for (key, value) in entries {
                match value.to_json() {
                    Some(json) => {
                        rule.unset.retain(|k| k != key);
                        rule.options.insert(key.clone(), json);
                    }
                    None => {
                        rule.options.shift_remove(key);
                        rule.unset.push(key.clone());
                    }
                }
            }
        }
        Some(rule)
    }

    /// Positional literal form, the inverse of [`from_literal`](Self::from_literal).
    #[must_use]
    pub fn to_literal(&self) -> Literal {
        let mut items = vec![
            Literal::String(self.prefix.clone()),
            Literal::String(self.target.clone()),
        ];
        let has_options = !self.options.is_empty() || !self.unset.is_empty();
        match &self.rewrite {
            Some(rewrite) => items.push(Literal::String(rewrite.clone())),
            None if has_options => items.push(Literal::Undefined),
            None => {}
        }
        if has_options {
            let mut entries: Vec<(String, Literal)> = self
                .options
                .iter()
                .map(|(k, v)| (k.clone(), Literal::from(v.clone())))
                .collect();
            entries.extend(self.unset.iter().map(|k| (k.clone(), Literal::Undefined)));
            items.push(Literal::Object(entries));
        }
        Literal::Array(items)
    }
}

/// Render rules as the textual list a `VITE_PROXY`-style variable holds.
#[must_use]
pub fn rules_to_literal(rules: &[ProxyRule]) -> String {
    Literal::Array(rules.iter().map(ProxyRule::to_literal).collect()).to_string()
}

impl From<(&str, &str)> for ProxyRule {
    fn from((prefix, target): (&str, &str)) -> Self {
        Self::new(prefix, target)
    }
}

impl From<(&str, &str, &str)> for ProxyRule {
    fn from((prefix, target, rewrite): (&str, &str, &str)) -> Self {
        Self::new(prefix, target).with_rewrite(rewrite)
    }
}

impl From<(&str, &str, Option<&str>, Value)> for ProxyRule {
    fn from((prefix, target, rewrite, options): (&str, &str, Option<&str>, Value)) -> Self {
        let mut rule = Self::new(prefix, target);
        rule.rewrite = rewrite.map(str::to_string);
        if let Value::Object(map) = options {
            rule.options = map;
        }
        rule
    }
}
