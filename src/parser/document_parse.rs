//! Document Parse response ingestion.
//!
//! These responses already carry rendered elements and a document-level
//! rendering, so no reconstruction is needed.

use crate::detect::ResponseFormat;
use crate::error::Result;
use crate::model::{Content, ContentElement, Document};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    content: Content,
    #[serde(default)]
    elements: Vec<ContentElement>,
}

/// Read a Document Parse response from a parsed JSON value.
pub fn document_from_value(value: Value) -> Result<Document> {
    let response: RawResponse = serde_json::from_value(value)?;
    let mut document = Document::with_elements(ResponseFormat::DocumentParse, response.elements);
    document.content = response.content;
    Ok(document)
}
