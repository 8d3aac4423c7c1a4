//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`render`], [`check`], or [`rewrite`]. Each handler
//! lives in its own submodule.

pub mod check;
pub mod render;
pub mod rewrite;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::cli::{Cli, Commands, InputArgs};
use crate::config;
use crate::error::ProxyEnvError;
use crate::logging;
use crate::proxy::diagnostics::TracingSink;
use crate::proxy::ProxyTransformer;

pub fn dispatch(cli: Cli) -> Result<(), ProxyEnvError> {
    let Some(command) = cli.command else {
        print_welcome();
        return Ok(());
    };

    logging::init(&cli.log_level, logging::resolve_format(cli.pretty, cli.json));

    match command {
        Commands::Render(ref args) => render::execute(args),
        Commands::Check(ref args) => check::execute(args),
        Commands::Rewrite(ref args) => rewrite::execute(args),
    }
}

/// The rule list text and a label naming where it came from.
pub fn read_input(args: &InputArgs) -> Result<(String, String), ProxyEnvError> {
    if let Some(ref text) = args.input {
        return Ok((text.clone(), "--input".into()));
    }
    if args.stdin {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok((text, "stdin".into()));
    }
    let label = format!("${}", args.env);
    match std::env::var(&args.env) {
        Ok(text) => Ok((text, label)),
        Err(_) => {
            tracing::warn!(var = %args.env, "environment variable is not set, using an empty rule list");
            Ok((String::new(), label))
        }
    }
}

/// A transformer that reports through `tracing`, configured from `path`.
pub fn build_transformer(path: Option<&Path>) -> Result<ProxyTransformer, ProxyEnvError> {
    let options = config::resolve_builder_options(path)?;
    Ok(ProxyTransformer::new(options).with_sink(Arc::new(TracingSink)))
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  proxy-from-env v{version} - dev-server proxy config from env\n\n  \
         No command provided. To get started:\n\n    \
         proxy-from-env render                  Print the map built from $VITE_PROXY\n    \
         proxy-from-env check -i \"[...]\"        Explain problems in a rule list\n    \
         proxy-from-env rewrite /api/users      Show how a path is rewritten\n    \
         proxy-from-env --help                  See all commands and options\n"
    );
}
