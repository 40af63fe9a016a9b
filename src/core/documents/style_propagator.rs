// Style propagation: highlight every occurrence of a string in a document.
//
// The Docs API has no "style all matches" call, so we ask it to replace every
// case-exact occurrence of the text with itself while carrying a new
// background color. Running it again on an already highlighted document
// changes nothing.

use super::docs_api::{DocsApi, DocsError};
use super::document_models::{OptionalColor, RgbColor};
use crate::core::auth::AccessToken;
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST / RESPONSE SHAPES
// ============================================================================

/// Body of `documents.batchUpdate`. Applied atomically by the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    ReplaceAllText(ReplaceAllTextRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAllTextRequest {
    pub contains_text: SubstringMatchCriteria,
    pub replace_text: String,
    pub text_style: HighlightStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstringMatchCriteria {
    pub text: String,
    pub match_case: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightStyle {
    pub background_color: OptionalColor,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(default)]
    pub replace_all_text: Option<ReplaceAllTextResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAllTextResponse {
    #[serde(default)]
    pub occurrences_changed: Option<u32>,
}

impl BatchUpdateResponse {
    /// Total occurrences touched by every `replaceAllText` reply.
    pub fn occurrences_changed(&self) -> u32 {
        self.replies
            .iter()
            .filter_map(|r| r.replace_all_text.as_ref())
            .filter_map(|r| r.occurrences_changed)
            .sum()
    }
}

// ============================================================================
// STYLE REQUEST
// ============================================================================

/// One "highlight every occurrence of this text" edit.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRequest {
    pub document_id: String,
    pub match_text: String,
    pub match_case: bool,
    pub background: RgbColor,
}

impl StyleRequest {
    pub fn highlight(
        document_id: &str,
        text: &str,
        background: RgbColor,
    ) -> Result<Self, DocsError> {
        if text.is_empty() {
            return Err(DocsError::EmptyMatchText);
        }

        Ok(Self {
            document_id: document_id.to_string(),
            match_text: text.to_string(),
            match_case: true,
            background,
        })
    }

    pub fn to_batch_update(&self) -> BatchUpdateRequest {
        BatchUpdateRequest {
            requests: vec![Request::ReplaceAllText(ReplaceAllTextRequest {
                contains_text: SubstringMatchCriteria {
                    text: self.match_text.clone(),
                    match_case: self.match_case,
                },
                replace_text: self.match_text.clone(),
                text_style: HighlightStyle {
                    background_color: self.background.into(),
                },
            })],
        }
    }
}

/// Highlights every case-exact occurrence of `text` in `document_id`.
///
/// Returns how many occurrences the service reports as changed.
pub async fn highlight_occurrences<A: DocsApi + ?Sized>(
    api: &A,
    token: &AccessToken,
    document_id: &str,
    text: &str,
    background: RgbColor,
) -> Result<u32, DocsError> {
    let request = StyleRequest::highlight(document_id, text, background)?;

    tracing::debug!(
        document_id,
        chars = text.chars().count(),
        "Sending replaceAllText highlight batch"
    );

    let response = api
        .batch_update(token, &request.document_id, &request.to_batch_update())
        .await?;

    Ok(response.occurrences_changed())
}
