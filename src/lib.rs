//! proxy-from-env builds dev-server proxy configuration from a rule list.
//!
//! A rule list is a short literal such as
//! `[['/api','http://localhost:3000','/backend']]`, usually kept in an
//! environment variable. Each rule is `[prefix, target, rewrite?, options?]`.
//! The result is a map from prefix to effective proxy options plus an
//! optional path rewrite, ready for a host build tool's dev server.
//!
//! ```
//! use proxy_from_env::{BuilderOptions, ProxyTransformer};
//!
//! let transformer = ProxyTransformer::new(BuilderOptions::default());
//! let proxies = transformer.transform("[['/api','http://localhost:3000','/backend']]");
//!
//! let api = &proxies["/api"];
//! assert_eq!(api.target(), Some("http://localhost:3000"));
//! assert_eq!(api.rewrite_path("/api/users"), "/backend/users");
//! ```
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (render, check, rewrite).
//! - [`config`] -- Loading builder options from JSON, YAML or TOML files.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`literal`] -- Restricted literal-expression parser; nothing is evaluated.
//! - [`logging`] -- Structured tracing setup with JSON and pretty output.
//! - [`proxy`] -- The transformer: rule shape checks, option layering, path
//!   rewrites, diagnostics and rule-list checking.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML builder options files _(enabled by default)_ |
//! | `toml` | TOML builder options files |
//! | `file-backends` | All file formats |
//! | `full` | All features |

#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod literal;
pub mod logging;
pub mod proxy;

pub use error::{LiteralError, ProxyEnvError};
pub use literal::Literal;
pub use proxy::options::{BuilderOptions, ProxyOptions};
pub use proxy::rewrite::PathRewrite;
pub use proxy::rule::{rules_to_literal, ProxyRule};
pub use proxy::{
    create_proxy_transformer, default_transformer, transform, ProxyEntry, ProxyInput, ProxyMap,
    ProxyTransformer,
};
