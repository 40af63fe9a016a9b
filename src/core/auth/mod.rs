pub mod auth_models;
pub mod credential_manager;

pub use auth_models::{
    AccessToken, AuthError, Credential, GrantSource, IssuedToken, SecretMaterial,
    DEFAULT_TOKEN_URI, DOCUMENTS_SCOPE,
};
pub use credential_manager::{CredentialManager, TokenExchanger};
