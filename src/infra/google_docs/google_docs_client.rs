// =============================================================================
// GOOGLE DOCS REST CLIENT
// =============================================================================
//
// Implements the core `DocsApi` trait over the Google Docs v1 REST API:
//
// - `GET  /v1/documents/{id}`              -> the structured document tree
// - `POST /v1/documents/{id}:batchUpdate`  -> atomic list of edits
//
// Every call carries the bearer token handed in by the core and is bounded by
// the client-wide timeout. Status codes are translated into `DocsError`
// variants here so the core never sees HTTP types.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::core::auth::AccessToken;
use crate::core::documents::{
    BatchUpdateRequest, BatchUpdateResponse, DocsApi, DocsError, Document,
};

const DOCS_API_BASE: &str = "https://docs.googleapis.com/v1";

/// Google's standard JSON error envelope.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

pub struct GoogleDocsClient {
    client: Client,
    base_url: String,
}

impl GoogleDocsClient {
    pub fn new(timeout: Duration) -> Result<Self, DocsError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("RedTextHighlighter/0.1")
            .build()
            .map_err(|e| DocsError::Remote(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DOCS_API_BASE.to_string(),
        })
    }

    /// Points the client at a different API root (e.g. a local emulator).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn transport_error(document_id: &str, err: reqwest::Error) -> DocsError {
        if err.is_timeout() {
            DocsError::Remote(format!("request for document {} timed out", document_id))
        } else {
            DocsError::Remote(format!("request for document {} failed: {}", document_id, err))
        }
    }

    async fn error_from_response(document_id: &str, response: Response) -> DocsError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        classify_error(document_id, status, &body)
    }
}

/// Maps a non-success response onto the error taxonomy.
///
/// The remote message is kept verbatim so operators can see what Google said.
fn classify_error(document_id: &str, status: StatusCode, body: &str) -> DocsError {
    let (message, api_status) = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope
                .error
                .message
                .unwrap_or_else(|| status.to_string()),
            envelope.error.status,
        ),
        Err(_) if body.trim().is_empty() => (status.to_string(), None),
        Err(_) => (body.trim().to_string(), None),
    };

    match status {
        StatusCode::NOT_FOUND => DocsError::NotFound(format!("{} ({})", document_id, message)),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DocsError::AccessDenied(format!("{} ({})", document_id, message))
        }
        StatusCode::BAD_REQUEST if is_unsupported_document(&message, api_status.as_deref()) => {
            DocsError::Unsupported(format!("{} ({})", document_id, message))
        }
        _ => DocsError::Remote(format!("{} returned {}: {}", document_id, status, message)),
    }
}

/// Google answers 400 when a batch targets something that is not a native
/// Docs document (an uploaded .docx, a PDF...).
fn is_unsupported_document(message: &str, api_status: Option<&str>) -> bool {
    let message = message.to_lowercase();
    api_status == Some("FAILED_PRECONDITION")
        || message.contains("not supported for this document")
        || message.contains("operation is not supported")
}

#[async_trait]
impl DocsApi for GoogleDocsClient {
    async fn get_document(
        &self,
        token: &AccessToken,
        document_id: &str,
    ) -> Result<Document, DocsError> {
        let url = format!("{}/documents/{}", self.base_url, document_id);

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| Self::transport_error(document_id, e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(document_id, response).await);
        }

        response.json::<Document>().await.map_err(|e| {
            DocsError::Remote(format!("could not decode document {}: {}", document_id, e))
        })
    }

    async fn batch_update(
        &self,
        token: &AccessToken,
        document_id: &str,
        batch: &BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, DocsError> {
        let url = format!("{}/documents/{}:batchUpdate", self.base_url, document_id);

        tracing::debug!(requests = batch.requests.len(), "POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.secret())
            .json(batch)
            .send()
            .await
            .map_err(|e| Self::transport_error(document_id, e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(document_id, response).await);
        }

        response.json::<BatchUpdateResponse>().await.map_err(|e| {
            DocsError::Remote(format!(
                "could not decode batchUpdate reply for {}: {}",
                document_id, e
            ))
        })
    }
}
