// Credential domain models.
//
// These types only describe *what* a Google credential is. Reading it from
// the environment and talking to the token endpoint both live in the infra
// layer, so nothing here knows about HTTP.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DOCUMENTS_SCOPE: &str = "https://www.googleapis.com/auth/documents";

/// Tokens expiring within this window are treated as already expired.
pub const EXPIRY_SKEW_SECS: i64 = 60;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Secret material is missing a field or a field is malformed.
    #[error("Invalid Google credential configuration: {0}")]
    Configuration(String),
    /// The token endpoint could not be reached or rejected the exchange.
    #[error("Token refresh failed: {0}")]
    Refresh(String),
}

// ============================================================================
// SECRET MATERIAL
// ============================================================================

/// How a fresh access token is obtained once the current one runs out.
#[derive(Clone, PartialEq, Eq)]
pub enum GrantSource {
    /// Authorized-user credentials: exchange a long-lived refresh token.
    RefreshToken {
        refresh_token: String,
        client_id: String,
        client_secret: String,
    },
    /// Service-account key: exchange a signed JWT assertion.
    ServiceAccount {
        client_email: String,
        private_key: String,
    },
}

// Never print secrets, not even at debug level.
impl fmt::Debug for GrantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantSource::RefreshToken { client_id, .. } => f
                .debug_struct("RefreshToken")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            GrantSource::ServiceAccount { client_email, .. } => f
                .debug_struct("ServiceAccount")
                .field("client_email", client_email)
                .finish_non_exhaustive(),
        }
    }
}

/// Everything needed to build a [`Credential`], as supplied by the operator.
///
/// This is constructed once at startup and handed to the credential manager;
/// no component reaches for the environment on its own.
#[derive(Clone)]
pub struct SecretMaterial {
    pub grant: GrantSource,
    pub token_endpoint: String,
    pub scopes: BTreeSet<String>,
    /// A previously issued access token, if the operator still has one.
    pub access_token: Option<String>,
    /// When `access_token` stops being valid. `None` means unknown.
    pub expiry: Option<DateTime<Utc>>,
}

impl fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretMaterial")
            .field("grant", &self.grant)
            .field("token_endpoint", &self.token_endpoint)
            .field("scopes", &self.scopes)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl SecretMaterial {
    /// Checks that every field a refresh would need is present and well formed.
    pub fn validate(&self) -> Result<(), AuthError> {
        match &self.grant {
            GrantSource::RefreshToken {
                refresh_token,
                client_id,
                client_secret,
            } => {
                require_non_empty("refresh_token", refresh_token)?;
                require_non_empty("client_id", client_id)?;
                require_non_empty("client_secret", client_secret)?;
            }
            GrantSource::ServiceAccount {
                client_email,
                private_key,
            } => {
                require_non_empty("client_email", client_email)?;
                require_non_empty("private_key", private_key)?;
            }
        }

        require_non_empty("token_uri", &self.token_endpoint)?;
        if !(self.token_endpoint.starts_with("https://")
            || self.token_endpoint.starts_with("http://"))
        {
            return Err(AuthError::Configuration(format!(
                "token_uri must be an http(s) URL, got '{}'",
                self.token_endpoint
            )));
        }

        if self.scopes.is_empty() {
            return Err(AuthError::Configuration(
                "at least one OAuth scope is required".to_string(),
            ));
        }

        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Configuration(format!(
            "'{}' is missing or empty",
            field
        )));
    }
    Ok(())
}

// ============================================================================
// CREDENTIAL
// ============================================================================

/// A bearer token ready to be put into an `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// What the token endpoint hands back after a successful exchange.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: AccessToken,
    /// Lifetime in seconds, when the endpoint reports one.
    pub expires_in: Option<i64>,
    /// Some providers rotate the refresh token on every exchange.
    pub refresh_token: Option<String>,
}

/// The live OAuth credential. Mutated in place by every successful refresh.
#[derive(Debug, Clone)]
pub struct Credential {
    access_token: Option<AccessToken>,
    expiry: Option<DateTime<Utc>>,
    grant: GrantSource,
    token_endpoint: String,
    scopes: BTreeSet<String>,
}

impl Credential {
    pub fn from_secret_material(material: SecretMaterial) -> Result<Self, AuthError> {
        material.validate()?;

        Ok(Self {
            access_token: material
                .access_token
                .filter(|t| !t.trim().is_empty())
                .map(AccessToken::new),
            expiry: material.expiry,
            grant: material.grant,
            token_endpoint: material.token_endpoint,
            scopes: material.scopes,
        })
    }

    pub fn grant(&self) -> &GrantSource {
        &self.grant
    }

    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Returns the access token if it can still be used at `now`.
    ///
    /// An unknown expiry counts as usable: the remote side will tell us
    /// otherwise.
    pub fn usable_token(&self, now: DateTime<Utc>) -> Option<AccessToken> {
        let token = self.access_token.as_ref()?;
        match self.expiry {
            None => Some(token.clone()),
            Some(expiry) if expiry > now + Duration::seconds(EXPIRY_SKEW_SECS) => {
                Some(token.clone())
            }
            Some(_) => None,
        }
    }

    /// Stores a freshly issued token.
    ///
    /// A lifetime that does not fit a timestamp leaves the expiry unknown.
    pub fn apply(&mut self, issued: IssuedToken, now: DateTime<Utc>) {
        self.expiry = issued
            .expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));
        self.access_token = Some(issued.access_token);

        if let Some(rotated) = issued.refresh_token.filter(|t| !t.is_empty()) {
            if let GrantSource::RefreshToken { refresh_token, .. } = &mut self.grant {
                *refresh_token = rotated;
            }
        }
    }
}
