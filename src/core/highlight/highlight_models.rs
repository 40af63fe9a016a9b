use crate::core::auth::AuthError;
use crate::core::documents::{DocsError, RgbColor};
use std::fmt;
use thiserror::Error;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Which color marks the text to copy, and which color it gets painted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightConfig {
    pub target_color: RgbColor,
    pub highlight_color: RgbColor,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            target_color: RgbColor::PURE_RED,
            highlight_color: RgbColor::YELLOW,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Flat error taxonomy reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthConfiguration,
    AuthRefresh,
    DocumentNotFound,
    DocumentAccessDenied,
    UnsupportedDocument,
    RemoteService,
    EmptyMatchText,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AuthConfiguration => "AuthConfigurationError",
            ErrorKind::AuthRefresh => "AuthRefreshError",
            ErrorKind::DocumentNotFound => "DocumentNotFound",
            ErrorKind::DocumentAccessDenied => "DocumentAccessDenied",
            ErrorKind::UnsupportedDocument => "UnsupportedDocumentError",
            ErrorKind::RemoteService => "RemoteServiceError",
            ErrorKind::EmptyMatchText => "EmptyMatchTextError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Docs(#[from] DocsError),
}

impl HighlightError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HighlightError::Auth(AuthError::Configuration(_)) => ErrorKind::AuthConfiguration,
            HighlightError::Auth(AuthError::Refresh(_)) => ErrorKind::AuthRefresh,
            HighlightError::Docs(DocsError::NotFound(_)) => ErrorKind::DocumentNotFound,
            HighlightError::Docs(DocsError::AccessDenied(_)) => ErrorKind::DocumentAccessDenied,
            HighlightError::Docs(DocsError::Unsupported(_)) => ErrorKind::UnsupportedDocument,
            HighlightError::Docs(DocsError::Remote(_)) => ErrorKind::RemoteService,
            HighlightError::Docs(DocsError::EmptyMatchText) => ErrorKind::EmptyMatchText,
        }
    }
}

// ============================================================================
// STATE MACHINE & OUTCOME
// ============================================================================

/// How far a single highlight request got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStage {
    Idle,
    CredentialAcquired,
    SourceRead,
    SpanExtracted,
    NoOpComplete,
    Propagated,
}

/// Result of one highlight request, as seen by the caller.
///
/// "Nothing to do" is its own variant so it can never be mistaken for an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightOutcome {
    Highlighted(String),
    NoColoredTextFound,
    Failed {
        kind: ErrorKind,
        message: String,
        /// Last stage reached before the failure.
        failed_after: HighlightStage,
    },
}

impl HighlightOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, HighlightOutcome::Failed { .. })
    }
}
