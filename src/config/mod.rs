//! Loading [`BuilderOptions`] from a config file.
//!
//! The format is chosen by file extension: JSON is always available, YAML
//! and TOML behind the `yaml` and `toml` features. Files hold
//! `{"baseProxyOptions": {...}}`; unknown top-level fields are rejected.

use std::path::Path;

use crate::error::ProxyEnvError;
use crate::proxy::options::BuilderOptions;

/// Parse builder options based on file extension.
pub fn parse_builder_options(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<BuilderOptions, ProxyEnvError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| ProxyEnvError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        "json" => serde_json::from_str(content).map_err(|e| ProxyEnvError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| ProxyEnvError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(ProxyEnvError::UnsupportedFormat(other.to_string())),
    }
}

pub fn load_builder_options(path: &Path) -> Result<BuilderOptions, ProxyEnvError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProxyEnvError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProxyEnvError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let options = parse_builder_options(ext, &content, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        keys = options.base_proxy_options.len(),
        "loaded builder options"
    );
    Ok(options)
}

/// Options from `path` when given, defaults otherwise.
pub fn resolve_builder_options(path: Option<&Path>) -> Result<BuilderOptions, ProxyEnvError> {
    path.map_or_else(|| Ok(BuilderOptions::default()), load_builder_options)
}
