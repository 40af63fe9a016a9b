pub mod highlight_models;
pub mod highlight_service;

pub use highlight_models::{
    ErrorKind, HighlightConfig, HighlightError, HighlightOutcome, HighlightStage,
};
pub use highlight_service::HighlightService;
