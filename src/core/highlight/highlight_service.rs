// This is the highlight workflow - the one operation the bot exposes.
//
// credentials -> read source -> extract red span -> highlight in destination
//
// Each step depends on the previous one's output, so they run strictly in
// sequence. Nothing is retried: the first failure ends the request and is
// reported with its kind and message.

use super::highlight_models::{
    HighlightConfig, HighlightError, HighlightOutcome, HighlightStage,
};
use crate::core::auth::{CredentialManager, TokenExchanger};
use crate::core::documents::{
    exact_color, extract_colored_span, extract_document_id, fetch_document,
    highlight_occurrences, DocsApi, DocsError,
};

/// Orchestrates a highlight request.
///
/// Generic over the document service and the token exchanger so tests can
/// run the full workflow against in-memory fakes.
pub struct HighlightService<A: DocsApi, T: TokenExchanger> {
    docs: A,
    credentials: CredentialManager<T>,
    config: HighlightConfig,
}

impl<A: DocsApi, T: TokenExchanger> HighlightService<A, T> {
    pub fn new(docs: A, credentials: CredentialManager<T>, config: HighlightConfig) -> Self {
        Self {
            docs,
            credentials,
            config,
        }
    }

    /// Copies the red text of `source` as a highlight into `destination`.
    ///
    /// Both arguments accept a bare document ID or a full Google Docs URL.
    pub async fn highlight(&self, source: &str, destination: &str) -> HighlightOutcome {
        let mut stage = HighlightStage::Idle;

        match self.run(source, destination, &mut stage).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(
                    kind = %err.kind(),
                    failed_after = ?stage,
                    "Highlight request failed: {}",
                    err
                );
                HighlightOutcome::Failed {
                    kind: err.kind(),
                    message: err.to_string(),
                    failed_after: stage,
                }
            }
        }
    }

    async fn run(
        &self,
        source: &str,
        destination: &str,
        stage: &mut HighlightStage,
    ) -> Result<HighlightOutcome, HighlightError> {
        let source_id = parse_document_id(source)?;
        let destination_id = parse_document_id(destination)?;

        tracing::info!(
            source = %source_id,
            destination = %destination_id,
            "Starting highlight request"
        );

        let token = self.credentials.obtain_valid_credential().await?;
        *stage = HighlightStage::CredentialAcquired;

        let document = fetch_document(&self.docs, &token, &source_id).await?;
        *stage = HighlightStage::SourceRead;

        let span = extract_colored_span(&document, exact_color(self.config.target_color));
        *stage = HighlightStage::SpanExtracted;

        let Some(text) = span else {
            *stage = HighlightStage::NoOpComplete;
            tracing::info!(source = %source_id, "No red text found, nothing to highlight");
            return Ok(HighlightOutcome::NoColoredTextFound);
        };

        let occurrences = highlight_occurrences(
            &self.docs,
            &token,
            &destination_id,
            &text,
            self.config.highlight_color,
        )
        .await?;
        *stage = HighlightStage::Propagated;

        tracing::info!(
            destination = %destination_id,
            occurrences,
            "Highlighted red text in destination document"
        );

        Ok(HighlightOutcome::Highlighted(text))
    }
}

fn parse_document_id(input: &str) -> Result<String, DocsError> {
    extract_document_id(input).ok_or_else(|| {
        DocsError::NotFound(format!("could not extract a document ID from '{}'", input))
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{
        AccessToken, AuthError, Credential, GrantSource, IssuedToken, SecretMaterial,
        DEFAULT_TOKEN_URI, DOCUMENTS_SCOPE,
    };
    use crate::core::documents::document_models::{
        Body, Document, OptionalColor, Paragraph, ParagraphElement, StructuralElement, TextRun,
        TextStyle,
    };
    use crate::core::documents::style_propagator::{
        ReplaceAllTextResponse, Reply, Request,
    };
    use crate::core::documents::{BatchUpdateRequest, BatchUpdateResponse, RgbColor};
    use crate::core::highlight::ErrorKind;
    use async_trait::async_trait;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::{Arc, Mutex};

    // ------------------------------------------------------------------
    // Fakes
    // ------------------------------------------------------------------

    struct StaticExchanger {
        fail: bool,
    }

    #[async_trait]
    impl TokenExchanger for StaticExchanger {
        async fn exchange(&self, _: &Credential) -> Result<IssuedToken, AuthError> {
            if self.fail {
                return Err(AuthError::Refresh("network unreachable".to_string()));
            }
            Ok(IssuedToken {
                access_token: AccessToken::new("ya29.fresh"),
                expires_in: Some(3600),
                refresh_token: None,
            })
        }
    }

    /// A destination document: plain text plus the set of highlighted
    /// character offsets.
    #[derive(Debug, Clone, PartialEq, Default)]
    struct FakeDestination {
        text: String,
        highlighted: BTreeSet<usize>,
    }

    #[derive(Default)]
    struct DocsState {
        sources: HashMap<String, Document>,
        destinations: HashMap<String, FakeDestination>,
        reads: usize,
        writes: usize,
        fail_writes_with: Option<DocsError>,
    }

    /// In-memory document service. Applies replaceAllText the way the real
    /// one would: every case-exact occurrence gets the new background.
    #[derive(Clone, Default)]
    struct FakeDocs {
        state: Arc<Mutex<DocsState>>,
    }

    impl FakeDocs {
        fn with_source(self, id: &str, doc: Document) -> Self {
            self.state.lock().unwrap().sources.insert(id.to_string(), doc);
            self
        }

        fn with_destination(self, id: &str, text: &str) -> Self {
            self.state.lock().unwrap().destinations.insert(
                id.to_string(),
                FakeDestination {
                    text: text.to_string(),
                    highlighted: BTreeSet::new(),
                },
            );
            self
        }

        fn reads(&self) -> usize {
            self.state.lock().unwrap().reads
        }

        fn writes(&self) -> usize {
            self.state.lock().unwrap().writes
        }

        fn destination(&self, id: &str) -> FakeDestination {
            self.state.lock().unwrap().destinations[id].clone()
        }
    }

    #[async_trait]
    impl DocsApi for FakeDocs {
        async fn get_document(
            &self,
            _: &AccessToken,
            document_id: &str,
        ) -> Result<Document, DocsError> {
            let mut state = self.state.lock().unwrap();
            state.reads += 1;
            state
                .sources
                .get(document_id)
                .cloned()
                .ok_or_else(|| DocsError::NotFound(document_id.to_string()))
        }

        async fn batch_update(
            &self,
            _: &AccessToken,
            document_id: &str,
            batch: &BatchUpdateRequest,
        ) -> Result<BatchUpdateResponse, DocsError> {
            let mut state = self.state.lock().unwrap();
            state.writes += 1;
            if let Some(err) = state.fail_writes_with.clone() {
                return Err(err);
            }

            let destination = state
                .destinations
                .get_mut(document_id)
                .ok_or_else(|| DocsError::NotFound(document_id.to_string()))?;

            let mut replies = Vec::new();
            for request in &batch.requests {
                let Request::ReplaceAllText(replace) = request;
                let needle = &replace.contains_text.text;
                let mut changed = 0;
                for (start, _) in destination.text.match_indices(needle.as_str()) {
                    destination.highlighted.extend(start..start + needle.len());
                    changed += 1;
                }
                replies.push(Reply {
                    replace_all_text: Some(ReplaceAllTextResponse {
                        occurrences_changed: Some(changed),
                    }),
                });
            }

            Ok(BatchUpdateResponse { replies })
        }
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    fn run(content: &str, color: Option<RgbColor>) -> ParagraphElement {
        ParagraphElement {
            text_run: Some(TextRun {
                content: Some(content.to_string()),
                text_style: Some(TextStyle {
                    foreground_color: color.map(OptionalColor::from),
                }),
            }),
        }
    }

    fn doc(elements: Vec<ParagraphElement>) -> Document {
        Document {
            body: Some(Body {
                content: vec![StructuralElement {
                    paragraph: Some(Paragraph { elements }),
                }],
            }),
            ..Default::default()
        }
    }

    fn material() -> SecretMaterial {
        SecretMaterial {
            grant: GrantSource::RefreshToken {
                refresh_token: "1//refresh".to_string(),
                client_id: "client-id".to_string(),
                client_secret: "client-secret".to_string(),
            },
            token_endpoint: DEFAULT_TOKEN_URI.to_string(),
            scopes: BTreeSet::from([DOCUMENTS_SCOPE.to_string()]),
            access_token: None,
            expiry: None,
        }
    }

    fn service(docs: FakeDocs, refresh_fails: bool) -> HighlightService<FakeDocs, StaticExchanger> {
        let credentials = CredentialManager::new(
            material(),
            StaticExchanger {
                fail: refresh_fails,
            },
        )
        .unwrap();
        HighlightService::new(docs, credentials, HighlightConfig::default())
    }

    // ------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_highlights_red_text_in_destination() {
        let docs = FakeDocs::default()
            .with_source(
                "src",
                doc(vec![
                    run("Hello ", None),
                    run("WORLD", Some(RgbColor::PURE_RED)),
                    run(" end\n", None),
                ]),
            )
            .with_destination("dst", "WORLD and world and WORLD");
        let service = service(docs.clone(), false);

        let outcome = service.highlight("src", "dst").await;

        assert_eq!(outcome, HighlightOutcome::Highlighted("WORLD".to_string()));
        let destination = docs.destination("dst");
        // Both case-exact occurrences, not the lowercase one
        let expected: BTreeSet<usize> = (0..5).chain(20..25).collect();
        assert_eq!(destination.highlighted, expected);
    }

    #[tokio::test]
    async fn test_no_red_text_never_writes() {
        let docs = FakeDocs::default()
            .with_source("src", doc(vec![run("all plain\n", None)]))
            .with_destination("dst", "all plain");
        let service = service(docs.clone(), false);

        let outcome = service.highlight("src", "dst").await;

        assert_eq!(outcome, HighlightOutcome::NoColoredTextFound);
        assert_eq!(docs.reads(), 1);
        assert_eq!(docs.writes(), 0);
    }

    #[tokio::test]
    async fn test_refresh_failure_stops_before_source_read() {
        let docs = FakeDocs::default()
            .with_source("src", doc(vec![run("x", Some(RgbColor::PURE_RED))]))
            .with_destination("dst", "x");
        let service = service(docs.clone(), true);

        let outcome = service.highlight("src", "dst").await;

        match outcome {
            HighlightOutcome::Failed {
                kind, failed_after, ..
            } => {
                assert_eq!(kind, ErrorKind::AuthRefresh);
                assert_eq!(failed_after, HighlightStage::Idle);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(docs.reads(), 0);
        assert_eq!(docs.writes(), 0);
    }

    #[tokio::test]
    async fn test_missing_source_reports_not_found() {
        let docs = FakeDocs::default().with_destination("dst", "x");
        let service = service(docs.clone(), false);

        let outcome = service.highlight("missing", "dst").await;

        assert!(matches!(
            outcome,
            HighlightOutcome::Failed {
                kind: ErrorKind::DocumentNotFound,
                failed_after: HighlightStage::CredentialAcquired,
                ..
            }
        ));
        assert_eq!(docs.writes(), 0);
    }

    #[tokio::test]
    async fn test_destination_failure_is_reported_verbatim() {
        let docs = FakeDocs::default()
            .with_source("src", doc(vec![run("x", Some(RgbColor::PURE_RED))]))
            .with_destination("dst", "x");
        docs.state.lock().unwrap().fail_writes_with = Some(DocsError::Unsupported(
            "This operation is not supported for this document".to_string(),
        ));
        let service = service(docs.clone(), false);

        let outcome = service.highlight("src", "dst").await;

        match outcome {
            HighlightOutcome::Failed {
                kind,
                message,
                failed_after,
            } => {
                assert_eq!(kind, ErrorKind::UnsupportedDocument);
                assert!(message.contains("not supported for this document"));
                assert_eq!(failed_after, HighlightStage::SpanExtracted);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(docs.writes(), 1);
    }

    #[tokio::test]
    async fn test_propagation_is_idempotent() {
        let docs = FakeDocs::default()
            .with_source("src", doc(vec![run("ABCD", Some(RgbColor::PURE_RED))]))
            .with_destination("dst", "xxABCDyyABCD");
        let service = service(docs.clone(), false);

        service.highlight("src", "dst").await;
        let after_first = docs.destination("dst");
        service.highlight("src", "dst").await;
        let after_second = docs.destination("dst");

        assert_eq!(after_first, after_second);
        assert_eq!(after_second.text, "xxABCDyyABCD");
    }

    #[tokio::test]
    async fn test_accepts_document_urls() {
        let docs = FakeDocs::default()
            .with_source("src123", doc(vec![run("hi", Some(RgbColor::PURE_RED))]))
            .with_destination("dst456", "hi there");
        let service = service(docs.clone(), false);

        let outcome = service
            .highlight(
                "https://docs.google.com/document/d/src123/edit",
                "https://docs.google.com/document/d/dst456/edit#heading=h.1",
            )
            .await;

        assert_eq!(outcome, HighlightOutcome::Highlighted("hi".to_string()));
    }

    #[tokio::test]
    async fn test_unparseable_id_fails_before_any_call() {
        let docs = FakeDocs::default();
        let service = service(docs.clone(), false);

        let outcome = service.highlight("two words", "dst").await;

        assert!(matches!(
            outcome,
            HighlightOutcome::Failed {
                kind: ErrorKind::DocumentNotFound,
                failed_after: HighlightStage::Idle,
                ..
            }
        ));
        assert_eq!(docs.reads(), 0);
    }
}
