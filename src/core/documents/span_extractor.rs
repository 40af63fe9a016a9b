// Span extraction: pull the text of every run painted in a given color out
// of a document and glue it into one string.
//
// The colored phrase is often split across several runs (a bold word in the
// middle, a spell-check boundary...), so we accumulate in document order
// across the whole body rather than stopping at the first match.

use super::document_models::{Document, RgbColor};

/// Predicate that matches exactly one color, channel for channel.
///
/// No tolerance: `(1.0, 0.0001, 0.0)` is not pure red.
pub fn exact_color(target: RgbColor) -> impl Fn(Option<RgbColor>) -> bool {
    move |color| color == Some(target)
}

/// Concatenates the content of every run whose foreground color satisfies
/// `predicate`, then strips newlines.
///
/// Returns `None` when nothing matched (or only line breaks did).
pub fn extract_colored_span<P>(document: &Document, predicate: P) -> Option<String>
where
    P: Fn(Option<RgbColor>) -> bool,
{
    let mut span = String::new();

    for run in document.text_runs() {
        if predicate(run.foreground_rgb()) {
            if let Some(content) = &run.content {
                span.push_str(content);
            }
        }
    }

    let span = strip_newlines(&span);
    if span.is_empty() {
        None
    } else {
        Some(span)
    }
}

pub fn strip_newlines(text: &str) -> String {
    text.replace('\n', "")
}
