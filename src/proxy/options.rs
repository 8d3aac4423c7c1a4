//! Proxy option maps and their layering.
//!
//! Options are opaque key/value pairs owned by the host build tool. This
//! crate only sets `target`, injects the `changeOrigin`/`ws` defaults, and
//! adds `secure: false` for `https://` targets so self-signed development
//! certificates do not fail TLS verification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Proxy options in the host tool's key order.
pub type ProxyOptions = Map<String, Value>;

/// Keys the transformer always controls itself.
pub const RESERVED_KEYS: &[&str] = &["target", "rewrite"];

const HTTPS_PREFIX: &str = "https://";

/// Builder-wide configuration captured by a [`ProxyTransformer`](super::ProxyTransformer).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct BuilderOptions {
    /// Applied to every rule, above the built-in defaults and beneath
    /// per-rule options. `target` and `rewrite` are ignored.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub base_proxy_options: ProxyOptions,
}

impl BuilderOptions {
    #[must_use]
    pub fn new(base_proxy_options: ProxyOptions) -> Self {
        Self { base_proxy_options }
    }

    /// Base options with the reserved keys removed.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        for key in RESERVED_KEYS {
            self.base_proxy_options.shift_remove(*key);
        }
        self
    }
}

/// Built-in defaults for a rule pointing at `target`.
#[must_use]
pub fn default_options(target: &str) -> ProxyOptions {
    let mut options = ProxyOptions::new();
    options.insert("changeOrigin".into(), Value::Bool(true));
    options.insert("ws".into(), Value::Bool(true));
    if target.starts_with(HTTPS_PREFIX) {
        options.insert("secure".into(), Value::Bool(false));
    }
    options
}

/// Shallow merge: every top-level key of `overrides` replaces the same key
/// in `base`. Nested values are never merged.
#[must_use]
pub fn merge(mut base: ProxyOptions, overrides: &ProxyOptions) -> ProxyOptions {
    for (key, value) in overrides {
        base.insert(key.clone(), value.clone());
    }
    base
}
