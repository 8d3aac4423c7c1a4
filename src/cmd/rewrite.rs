//! `proxy-from-env rewrite`: show how each entry rewrites a request path.

use crate::cli::RewriteArgs;
use crate::error::ProxyEnvError;

pub fn execute(args: &RewriteArgs) -> Result<(), ProxyEnvError> {
    let transformer = super::build_transformer(args.config.as_deref())?;
    let (text, _) = super::read_input(&args.input)?;
    let proxies = transformer.transform(text);

    if proxies.is_empty() {
        println!("no proxy entries");
        return Ok(());
    }

    for (prefix, entry) in &proxies {
        let target = entry.target().unwrap_or("(none)");
        let rewritten = entry.rewrite_path(&args.path);
        let note = match entry.rewrite {
            Some(_) if rewritten == args.path => " (no match)",
            Some(_) => "",
            None => " (no rewrite)",
        };
        println!("{prefix}  -> {target}{rewritten}{note}");
    }
    Ok(())
}
