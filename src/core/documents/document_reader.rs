use super::docs_api::{DocsApi, DocsError};
use super::document_models::Document;
use crate::core::auth::AccessToken;

/// Reads one document. A single deterministic fetch, nothing more.
pub async fn fetch_document<A: DocsApi + ?Sized>(
    api: &A,
    token: &AccessToken,
    document_id: &str,
) -> Result<Document, DocsError> {
    tracing::debug!(document_id, "Fetching source document");

    let document = api.get_document(token, document_id).await?;

    tracing::debug!(
        document_id,
        title = document.title.as_deref().unwrap_or("(untitled)"),
        runs = document.text_runs().count(),
        "Fetched source document"
    );

    Ok(document)
}
