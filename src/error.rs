//! Unified error types for proxy-from-env.
//!
//! Defines [`LiteralError`] for failures of the restricted literal parser,
//! [`ProxyEnvError`] (the main crate error enum), and [`RuleIssue`] for
//! per-rule findings reported by `proxy-from-env check`. Error messages
//! include contextual hints to guide the user toward a fix.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The rule is dropped from the proxy map.
    Error,
    /// The rule is kept but probably not what was meant.
    Warning,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleIssue {
    pub rule: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
    pub severity: Severity,
}

impl std::fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  {} {}: {}: {}",
            self.severity.as_str(),
            self.rule,
            self.field,
            self.message
        )?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

fn format_issues(issues: &[RuleIssue]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, issue) in issues.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{issue}");
    }
    buf
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralErrorKind {
    UnexpectedChar(char),
    UnexpectedEnd { expected: &'static str },
    UnterminatedString,
    InvalidEscape,
    InvalidNumber(String),
    UnknownIdentifier(String),
    TemplateInterpolation,
    TooDeep { limit: usize },
    TrailingInput,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} at offset {offset}", describe(.kind))]
pub struct LiteralError {
    pub kind: LiteralErrorKind,
    pub offset: usize,
}

impl LiteralError {
    #[must_use]
    pub fn new(kind: LiteralErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

fn describe(kind: &LiteralErrorKind) -> String {
    match kind {
        LiteralErrorKind::UnexpectedChar(c) => format!("unexpected character {c:?}"),
        LiteralErrorKind::UnexpectedEnd { expected } => {
            format!("unexpected end of input, expected {expected}")
        }
        LiteralErrorKind::UnterminatedString => "unterminated string literal".into(),
        LiteralErrorKind::InvalidEscape => "invalid escape sequence".into(),
        LiteralErrorKind::InvalidNumber(text) => format!("invalid number literal '{text}'"),
        LiteralErrorKind::UnknownIdentifier(name) => format!(
            "'{name}' is not a literal (only true, false, null, undefined, Infinity and NaN are allowed)"
        ),
        LiteralErrorKind::TemplateInterpolation => {
            "template interpolation '${' is not supported".into()
        }
        LiteralErrorKind::TooDeep { limit } => {
            format!("literal is nested more than {limit} levels deep")
        }
        LiteralErrorKind::TrailingInput => "unexpected input after the literal".into(),
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProxyEnvError {
    #[error(transparent)]
    Literal(#[from] LiteralError),

    #[error("proxy string does not evaluate to a list (got {kind})")]
    NotAList { kind: &'static str },

    #[error("invalid prefix pattern '{prefix}': {source}")]
    InvalidPattern {
        prefix: String,
        #[source]
        source: regex::Error,
    },

    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Proxy rule check failed:\n{}", format_issues(.issues))]
    RuleCheck { issues: Vec<RuleIssue> },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
