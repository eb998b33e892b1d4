//! Runtime secret resolution.
//!
//! Config YAML stores only the env var NAME of the upstream token
//! (`upstream.token_env`, default `IEX_TOKEN`). [`resolve_secrets`] reads it
//! once at startup; the result is passed to the provider constructor.
//! Error messages name the variable, never its value.

use anyhow::{bail, Result};
use serde_json::Value;

pub const DEFAULT_TOKEN_ENV: &str = "IEX_TOKEN";

/// **Values are redacted in `Debug` output.**
#[derive(Clone, Default)]
pub struct ResolvedSecrets {
    /// Upstream API token. `None` only when anonymous access is allowed.
    pub iex_token: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("iex_token", &self.iex_token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

/// Non-blank string at `pointer`, trimmed.
fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve secrets from the process environment.
pub fn resolve_secrets(config_json: &Value) -> Result<ResolvedSecrets> {
    resolve_secrets_with(config_json, resolve_env)
}

/// Resolve secrets through `lookup` (env var name -> value).
///
/// Fails with `SECRETS_MISSING` when the token variable is unset or blank,
/// unless `upstream.allow_anonymous` is `true`.
pub fn resolve_secrets_with<F>(config_json: &Value, lookup: F) -> Result<ResolvedSecrets>
where
    F: Fn(&str) -> Option<String>,
{
    let token_var = read_str_at(config_json, "/upstream/token_env")
        .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
    let allow_anonymous = config_json
        .pointer("/upstream/allow_anonymous")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let iex_token = lookup(&token_var).filter(|v| !v.trim().is_empty());

    if iex_token.is_none() && !allow_anonymous {
        bail!(
            "SECRETS_MISSING: required env var '{}' (upstream token) is not set or empty; \
             set it or configure upstream.allow_anonymous: true",
            token_var,
        );
    }

    Ok(ResolvedSecrets { iex_token })
}
