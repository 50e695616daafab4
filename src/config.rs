//! API key resolution.

use crate::error::{ImageGenError, Result};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Resolves the API key from an explicit value or an environment value.
///
/// The explicit value takes precedence. An empty string counts as unset
/// for both sources.
pub fn resolve_api_key(explicit: Option<&str>, env_value: Option<&str>) -> Result<String> {
    explicit
        .filter(|k| !k.is_empty())
        .or_else(|| env_value.filter(|k| !k.is_empty()))
        .map(str::to_owned)
        .ok_or_else(|| {
            ImageGenError::Config(format!(
                "{API_KEY_ENV} env var not set and --key not provided"
            ))
        })
}

/// Reads `var` from the process environment and resolves against `explicit`.
pub fn resolve_api_key_from_env(explicit: Option<&str>, var: &str) -> Result<String> {
    let env_value = std::env::var(var).ok();
    resolve_api_key(explicit, env_value.as_deref())
}
