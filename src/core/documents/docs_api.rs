use super::document_models::Document;
use super::style_propagator::{BatchUpdateRequest, BatchUpdateResponse};
use crate::core::auth::AccessToken;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while reading or editing a remote document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocsError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Document type not supported: {0}")]
    Unsupported(String),
    #[error("Google Docs API error: {0}")]
    Remote(String),
    #[error("Refusing to highlight an empty string")]
    EmptyMatchText,
}

/// The two calls we make against the document service.
///
/// Implementations perform exactly one request per call. No retries.
#[async_trait]
pub trait DocsApi: Send + Sync {
    async fn get_document(
        &self,
        token: &AccessToken,
        document_id: &str,
    ) -> Result<Document, DocsError>;

    async fn batch_update(
        &self,
        token: &AccessToken,
        document_id: &str,
        batch: &BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, DocsError>;
}
