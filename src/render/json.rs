//! JSON rendering for reconstructed documents.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::ResponseFormat;
    use crate::model::{BlockType, BoundingBox, Content, ContentElement};

    fn sample() -> Document {
        Document::with_elements(
            ResponseFormat::Textract,
            vec![ContentElement::new(
                2,
                &BlockType::LayoutTitle,
                &BoundingBox::new(0.0, 0.0, 0.5, 0.5),
                Content::text("Title\n"),
            )],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"category\": \"LAYOUT_TITLE\""));
        assert!(json.contains("\"format\": \"textract\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact_round_trips() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let doc: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.elements[0].id, 2);
        assert_eq!(doc.elements[0].coordinates.len(), 4);
    }
}
