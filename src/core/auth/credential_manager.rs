use super::auth_models::{AccessToken, AuthError, Credential, IssuedToken, SecretMaterial};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// Performs the actual token exchange against an OAuth token endpoint.
///
/// The infra layer implements this over HTTP; tests swap in a fake that
/// counts calls.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange(&self, credential: &Credential) -> Result<IssuedToken, AuthError>;
}

/// Owns the process-wide credential and hands out valid access tokens.
///
/// Reads are concurrent. The refresh path takes the write lock, so two
/// requests that both find an expired token only trigger one exchange.
pub struct CredentialManager<T: TokenExchanger> {
    exchanger: T,
    credential: RwLock<Credential>,
}

impl<T: TokenExchanger> CredentialManager<T> {
    pub fn new(material: SecretMaterial, exchanger: T) -> Result<Self, AuthError> {
        let credential = Credential::from_secret_material(material)?;
        Ok(Self {
            exchanger,
            credential: RwLock::new(credential),
        })
    }

    /// Returns a currently valid access token, refreshing first if needed.
    pub async fn obtain_valid_credential(&self) -> Result<AccessToken, AuthError> {
        // Fast path: the cached token is still good
        {
            let credential = self.credential.read().await;
            if let Some(token) = credential.usable_token(Utc::now()) {
                return Ok(token);
            }
        }

        let mut credential = self.credential.write().await;

        // Another request may have refreshed while we waited for the lock
        if let Some(token) = credential.usable_token(Utc::now()) {
            return Ok(token);
        }

        tracing::debug!(
            endpoint = credential.token_endpoint(),
            "Access token missing or expired, refreshing"
        );

        let issued = self.exchanger.exchange(&credential).await.map_err(|e| {
            tracing::error!("Credential refresh failed: {}", e);
            e
        })?;
        let token = issued.access_token.clone();
        credential.apply(issued, Utc::now());

        tracing::info!(
            expires_at = ?credential.expiry(),
            "Refreshed Google access token"
        );

        Ok(token)
    }
}
