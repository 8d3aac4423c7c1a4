//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (render, check, rewrite), and their associated argument
//! structs. Input and config flags have environment variable equivalents so
//! the tool reads the same variables a dev server would.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "proxy-from-env",
    version,
    about = "Build dev-server proxy configuration from an env-friendly rule list",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        VITE_PROXY=\"[['/api','http://localhost:3000','']]\" proxy-from-env render\n  \
        proxy-from-env check -i \"[['/api','http://localhost:3000']]\"\n  \
        proxy-from-env rewrite /api/users"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level
    #[arg(short, long, global = true, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, global = true, conflicts_with = "pretty")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the proxy map as JSON
    Render(RenderArgs),

    /// Explain which rules would be skipped and why
    Check(CheckArgs),

    /// Show how each proxy entry rewrites a request path
    Rewrite(RewriteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Rule list text (takes precedence over --env)
    #[arg(short, long, conflicts_with = "stdin")]
    pub input: Option<String>,

    /// Environment variable holding the rule list
    #[arg(short, long, env = "PROXY_FROM_ENV_VAR", default_value = "VITE_PROXY")]
    pub env: String,

    /// Read the rule list from standard input
    #[arg(long)]
    pub stdin: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Builder options file (.json, .yaml, .toml)
    #[arg(short, long, env = "PROXY_FROM_ENV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print compact JSON on one line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        proxy-from-env check                          Check $VITE_PROXY\n  \
        proxy-from-env check -e API_PROXY             Check another variable\n  \
        proxy-from-env check --format json < rules    Machine-readable, from stdin")]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Builder options file (.json, .yaml, .toml)
    #[arg(short, long, env = "PROXY_FROM_ENV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: CheckFormat,
}

#[derive(Args)]
pub struct RewriteArgs {
    /// Request path to rewrite
    pub path: String,

    #[command(flatten)]
    pub input: InputArgs,

    /// Builder options file (.json, .yaml, .toml)
    #[arg(short, long, env = "PROXY_FROM_ENV_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum CheckFormat {
    Text,
    Json,
}
