// =============================================================================
// GOOGLE DOCS DOCUMENT TREE
// =============================================================================
//
// Typed view of the `documents.get` response. Only the parts of the schema we
// walk are modelled; serde silently skips everything else (tables, section
// breaks, inline objects...). Every field is optional because the API omits
// fields that hold their default value, e.g. a zero color channel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default)]
    pub paragraph: Option<Paragraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default)]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub text_style: Option<TextStyle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default)]
    pub foreground_color: Option<OptionalColor>,
}

/// A color that may be unset. `{}` means "transparent"/automatic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalColor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb_color: Option<RgbColor>,
}

/// RGB channels in `[0, 1]`. Missing channels are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    #[serde(default)]
    pub red: f64,
    #[serde(default)]
    pub green: f64,
    #[serde(default)]
    pub blue: f64,
}

impl RgbColor {
    pub const PURE_RED: RgbColor = RgbColor::new(1.0, 0.0, 0.0);
    pub const YELLOW: RgbColor = RgbColor::new(1.0, 1.0, 0.0);

    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }
}

impl From<RgbColor> for OptionalColor {
    fn from(rgb: RgbColor) -> Self {
        OptionalColor {
            color: Some(Color {
                rgb_color: Some(rgb),
            }),
        }
    }
}

impl TextRun {
    /// The run's explicit foreground color, if it has one.
    pub fn foreground_rgb(&self) -> Option<RgbColor> {
        self.text_style
            .as_ref()?
            .foreground_color
            .as_ref()?
            .color
            .as_ref()?
            .rgb_color
    }
}

impl Document {
    /// Every text run of the body, in document order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.body
            .iter()
            .flat_map(|body| body.content.iter())
            .filter_map(|element| element.paragraph.as_ref())
            .flat_map(|paragraph| paragraph.elements.iter())
            .filter_map(|element| element.text_run.as_ref())
    }
}

/// Extracts the document ID from a Google Docs URL, or accepts a bare ID.
pub fn extract_document_id(url_or_id: &str) -> Option<String> {
    let url_or_id = url_or_id.trim();

    if url_or_id.contains("docs.google.com") {
        if let Some(start) = url_or_id.find("/document/d/") {
            let after_d = &url_or_id[start + "/document/d/".len()..];
            let end = after_d
                .find(|c: char| c == '/' || c == '?' || c == '#')
                .unwrap_or(after_d.len());
            let id = &after_d[..end];
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    } else if !url_or_id.is_empty()
        && !url_or_id.contains(|c: char| c == '/' || c == '?' || c == '#' || c.is_whitespace())
    {
        return Some(url_or_id.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_api_response_with_omitted_channels() {
        let json = serde_json::json!({
            "documentId": "doc-1",
            "title": "Script",
            "body": {
                "content": [
                    { "sectionBreak": {} },
                    { "paragraph": { "elements": [
                        { "textRun": { "content": "plain ", "textStyle": {} } },
                        { "textRun": {
                            "content": "red",
                            "textStyle": { "foregroundColor": { "color": { "rgbColor": { "red": 1 } } } }
                        } }
                    ] } },
                    { "table": { "rows": 1, "columns": 1, "tableRows": [] } }
                ]
            }
        });

        let doc: Document = serde_json::from_value(json).unwrap();
        let runs: Vec<&TextRun> = doc.text_runs().collect();

        assert_eq!(doc.title.as_deref(), Some("Script"));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].foreground_rgb(), None);
        assert_eq!(runs[1].foreground_rgb(), Some(RgbColor::PURE_RED));
    }

    #[test]
    fn test_transparent_foreground_has_no_rgb() {
        let run: TextRun = serde_json::from_value(serde_json::json!({
            "content": "x",
            "textStyle": { "foregroundColor": {} }
        }))
        .unwrap();

        assert_eq!(run.foreground_rgb(), None);
    }

    #[test]
    fn test_document_without_body_has_no_runs() {
        assert_eq!(Document::default().text_runs().count(), 0);
    }

    #[test]
    fn test_extract_document_id_from_url() {
        let url = "https://docs.google.com/document/d/1abc123xyz/edit?tab=t.0";
        assert_eq!(extract_document_id(url), Some("1abc123xyz".to_string()));
    }

    #[test]
    fn test_extract_document_id_from_id() {
        assert_eq!(
            extract_document_id(" 1abc123xyz "),
            Some("1abc123xyz".to_string())
        );
        assert_eq!(extract_document_id(""), None);
        assert_eq!(extract_document_id("not/an id"), None);
    }

    #[test]
    fn test_bare_id_with_query_or_fragment_is_rejected() {
        assert_eq!(extract_document_id("abc?x=1"), None);
        assert_eq!(extract_document_id("abc#heading"), None);
    }

    #[test]
    fn test_channels_keep_full_precision() {
        let color: RgbColor =
            serde_json::from_value(serde_json::json!({ "red": 0.99999999, "green": 1e-46 }))
                .unwrap();

        assert_ne!(color, RgbColor::PURE_RED);
        assert_eq!(color.red, 0.99999999);
    }
}
