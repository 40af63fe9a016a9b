// Startup configuration.
//
// Everything the process needs is read from the environment exactly once (a
// `.env` file is loaded first if present) and frozen into `AppConfig`. The
// rest of the code receives values from here; nothing else calls
// `std::env::var`.

use std::time::Duration;

use crate::core::auth::{AuthError, SecretMaterial};
use crate::infra::google_docs::{authorized_user_material, service_account_material};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Immutable process configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub discord_token: String,
    /// Shared secret callers must present before the core runs.
    pub api_key: String,
    pub secrets: SecretMaterial,
    /// Deadline applied to every outbound HTTP call.
    pub http_timeout: Duration,
    /// Register commands in this guild only (instant) instead of globally.
    pub guild_id: Option<u64>,
    /// Override for the Docs API root, e.g. a local emulator.
    pub docs_api_base: Option<String>,
}

impl AppConfig {
    pub async fn from_env() -> anyhow::Result<Self> {
        let discord_token = required_var("DISCORD_TOKEN")?;
        let api_key = required_var("API_KEY")?;
        let secrets = load_secret_material().await?;

        let http_timeout = match non_empty_var("HIGHLIGHT_HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let guild_id = match non_empty_var("DISCORD_GUILD_ID") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|e| anyhow::anyhow!("DISCORD_GUILD_ID '{}' is invalid: {}", raw, e))?,
            ),
            None => None,
        };

        Ok(Self {
            discord_token,
            api_key,
            secrets,
            http_timeout,
            guild_id,
            docs_api_base: non_empty_var("GOOGLE_DOCS_API_BASE"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required_var(name: &str) -> anyhow::Result<String> {
    non_empty_var(name)
        .ok_or_else(|| anyhow::anyhow!("Missing {} environment variable!", name))
}

fn parse_timeout(raw: &str) -> anyhow::Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => anyhow::bail!(
            "HIGHLIGHT_HTTP_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
            raw
        ),
    }
}

/// Reads a secret given either inline (`inline_var`) or as a file path
/// (`file_var`). Inline wins when both are set.
async fn read_secret(inline_var: &str, file_var: &str) -> Result<Option<String>, AuthError> {
    if let Some(inline) = non_empty_var(inline_var) {
        return Ok(Some(inline));
    }

    match non_empty_var(file_var) {
        Some(path) => read_secret_file(&path).await.map(Some),
        None => Ok(None),
    }
}

async fn read_secret_file(path: &str) -> Result<String, AuthError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AuthError::Configuration(format!("cannot read secret file {}: {}", path, e)))
}

/// Authorized-user credentials take precedence; a service-account key is the
/// fallback.
async fn load_secret_material() -> Result<SecretMaterial, AuthError> {
    if let Some(token_json) = read_secret("GOOGLE_TOKEN_JSON", "GOOGLE_TOKEN_FILE").await? {
        let client_secrets =
            read_secret("GOOGLE_CREDENTIALS_JSON", "GOOGLE_CREDENTIALS_FILE").await?;
        tracing::info!("Using authorized-user Google credentials");
        return authorized_user_material(&token_json, client_secrets.as_deref());
    }

    if let Some(key_json) =
        read_secret("GOOGLE_SERVICE_ACCOUNT_JSON", "GOOGLE_SERVICE_ACCOUNT_KEY").await?
    {
        tracing::info!("Using service-account Google credentials");
        return service_account_material(&key_json);
    }

    Err(AuthError::Configuration(
        "set GOOGLE_TOKEN_JSON (or GOOGLE_TOKEN_FILE) or GOOGLE_SERVICE_ACCOUNT_JSON \
         (or GOOGLE_SERVICE_ACCOUNT_KEY)"
            .to_string(),
    ))
}
