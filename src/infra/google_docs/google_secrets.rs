// Parsing of the JSON secret formats Google tooling produces.
//
// Two shapes are accepted:
//
// - **Authorized user** (what `google-auth-oauthlib` writes to `token.json`):
//   `token`/`access_token`, `refresh_token`, `token_uri`, `client_id`,
//   `client_secret`, `scopes`, `expiry`. Missing client fields fall back to
//   the OAuth client-secrets file (`credentials.json`, under `installed` or
//   `web`).
// - **Service account** key files: `client_email`, `private_key`, `token_uri`.

use chrono::{DateTime, NaiveDateTime, Utc};
use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::core::auth::{
    AuthError, GrantSource, SecretMaterial, DEFAULT_TOKEN_URI, DOCUMENTS_SCOPE,
};

#[derive(Debug, Default, Deserialize)]
struct ClientSecrets {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

/// `credentials.json` as downloaded from the Cloud Console. Some tools flatten
/// it, so the top level is tried too.
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    #[serde(default)]
    installed: Option<ClientSecrets>,
    #[serde(default)]
    web: Option<ClientSecrets>,
    #[serde(flatten)]
    flat: ClientSecrets,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scopes {
    List(Vec<String>),
    SpaceSeparated(String),
}

#[derive(Debug, Deserialize)]
struct AuthorizedUserToken {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    scopes: Option<Scopes>,
    #[serde(default)]
    expiry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    #[serde(default)]
    client_email: Option<String>,
    #[serde(default)]
    private_key: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

/// Builds secret material from an authorized-user token JSON and, optionally,
/// the OAuth client-secrets JSON.
pub fn authorized_user_material(
    token_json: &str,
    client_secrets_json: Option<&str>,
) -> Result<SecretMaterial, AuthError> {
    let token: AuthorizedUserToken = serde_json::from_str(token_json)
        .map_err(|e| AuthError::Configuration(format!("token JSON is malformed: {}", e)))?;

    let client = match client_secrets_json {
        Some(json) => {
            let file: ClientSecretsFile = serde_json::from_str(json).map_err(|e| {
                AuthError::Configuration(format!("client secrets JSON is malformed: {}", e))
            })?;
            file.installed.or(file.web).unwrap_or(file.flat)
        }
        None => ClientSecrets::default(),
    };

    let expiry = token.expiry.as_deref().map(parse_expiry).transpose()?;

    let material = SecretMaterial {
        grant: GrantSource::RefreshToken {
            refresh_token: token.refresh_token.unwrap_or_default(),
            client_id: token.client_id.or(client.client_id).unwrap_or_default(),
            client_secret: token
                .client_secret
                .or(client.client_secret)
                .unwrap_or_default(),
        },
        token_endpoint: token
            .token_uri
            .or(client.token_uri)
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        scopes: scopes_or_default(token.scopes),
        access_token: token.token.or(token.access_token),
        expiry,
    };

    material.validate()?;
    Ok(material)
}

/// Builds secret material from a service-account key file.
pub fn service_account_material(key_json: &str) -> Result<SecretMaterial, AuthError> {
    let key: ServiceAccountKey = serde_json::from_str(key_json).map_err(|e| {
        AuthError::Configuration(format!("service account JSON is malformed: {}", e))
    })?;

    let private_key = key.private_key.unwrap_or_default();
    if !private_key.trim().is_empty() {
        // Fail at startup rather than on the first request
        EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
            AuthError::Configuration(format!("service account private_key is not valid PEM: {}", e))
        })?;
    }

    let material = SecretMaterial {
        grant: GrantSource::ServiceAccount {
            client_email: key.client_email.unwrap_or_default(),
            private_key,
        },
        token_endpoint: key
            .token_uri
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        scopes: BTreeSet::from([DOCUMENTS_SCOPE.to_string()]),
        access_token: None,
        expiry: None,
    };

    material.validate()?;
    Ok(material)
}

fn scopes_or_default(scopes: Option<Scopes>) -> BTreeSet<String> {
    let scopes: BTreeSet<String> = match scopes {
        Some(Scopes::List(list)) => list.into_iter().collect(),
        Some(Scopes::SpaceSeparated(s)) => s.split_whitespace().map(str::to_string).collect(),
        None => BTreeSet::new(),
    };

    if scopes.is_empty() {
        BTreeSet::from([DOCUMENTS_SCOPE.to_string()])
    } else {
        scopes
    }
}

/// Accepts RFC 3339 and the zone-less form Python's `isoformat()` writes.
fn parse_expiry(value: &str) -> Result<DateTime<Utc>, AuthError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| AuthError::Configuration(format!("expiry '{}' is not a timestamp: {}", value, e)))
}
