//! `proxy-from-env render`: print the proxy map as JSON.

use crate::cli::RenderArgs;
use crate::error::ProxyEnvError;

pub fn execute(args: &RenderArgs) -> Result<(), ProxyEnvError> {
    let transformer = super::build_transformer(args.config.as_deref())?;
    let (text, source) = super::read_input(&args.input)?;

    let proxies = transformer.transform(text);
    tracing::info!(source = %source, proxies = proxies.len(), "rendered proxy map");

    let rendered = if args.compact {
        serde_json::to_string(&proxies)
    } else {
        serde_json::to_string_pretty(&proxies)
    }
    .map_err(|e| ProxyEnvError::Io(std::io::Error::other(e.to_string())))?;

    println!("{rendered}");
    Ok(())
}
