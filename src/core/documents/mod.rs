pub mod docs_api;
pub mod document_models;
pub mod document_reader;
pub mod span_extractor;
pub mod style_propagator;

pub use docs_api::{DocsApi, DocsError};
pub use document_models::{extract_document_id, Document, RgbColor};
pub use document_reader::fetch_document;
pub use span_extractor::{exact_color, extract_colored_span};
pub use style_propagator::{highlight_occurrences, BatchUpdateRequest, BatchUpdateResponse};
