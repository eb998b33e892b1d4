//! Typed gateway settings read from the merged config JSON.
//!
//! Every key is optional; absent keys take the defaults below. Present keys
//! with the wrong type or an unusable value fail with `CONFIG_INVALID`.

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use serde_json::Value;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/stable";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePaths {
    pub symbols: String,
    pub last_traded: String,
    pub historical: String,
    pub health: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            symbols: "/iex/symbols".to_string(),
            last_traded: "/iex/lastTradedPrice".to_string(),
            historical: "/iex/historicalPrice".to_string(),
            health: "/v1/health".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub addr: SocketAddr,
    pub upstream: UpstreamConfig,
    pub routes: RoutePaths,
}

impl GatewayConfig {
    pub fn from_config_json(config: &Value) -> Result<Self> {
        let addr_s = opt_str(config, "/server/addr")?.unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_s
            .parse()
            .with_context(|| format!("CONFIG_INVALID /server/addr: not a socket address: {addr_s}"))?;

        let base_url =
            opt_str(config, "/upstream/base_url")?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("CONFIG_INVALID /upstream/base_url: must start with http:// or https://");
        }

        let timeout_ms = match config.pointer("/upstream/timeout_ms") {
            None | Some(Value::Null) => DEFAULT_TIMEOUT_MS,
            Some(v) => match v.as_u64() {
                Some(n) if n > 0 => n,
                _ => bail!("CONFIG_INVALID /upstream/timeout_ms: must be a positive integer"),
            },
        };

        let defaults = RoutePaths::default();
        let routes = RoutePaths {
            symbols: route(config, "/routes/symbols", defaults.symbols)?,
            last_traded: route(config, "/routes/last_traded", defaults.last_traded)?,
            historical: route(config, "/routes/historical", defaults.historical)?,
            health: route(config, "/routes/health", defaults.health)?,
        };

        Ok(Self {
            addr,
            upstream: UpstreamConfig {
                base_url,
                timeout_ms,
            },
            routes,
        })
    }
}

/// `None` when absent or null, error when present but not a string.
fn opt_str(config: &Value, pointer: &str) -> Result<Option<String>> {
    match config.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => bail!("CONFIG_INVALID {pointer}: expected a string"),
    }
}

fn route(config: &Value, pointer: &str, default: String) -> Result<String> {
    let path = opt_str(config, pointer)?.unwrap_or(default);
    if !path.starts_with('/') || path.ends_with('/') {
        bail!("CONFIG_INVALID {pointer}: route path must start with '/' and not end with '/'");
    }
    Ok(path)
}
