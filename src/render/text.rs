//! Plain text rendering for reconstructed documents.

use crate::error::Result;
use crate::model::Document;

use super::{HtmlTable, RenderOptions};

/// Convert a document to plain text.
///
/// Tables become tab-separated rows; elements are separated by blank lines.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut blocks = Vec::new();

    for element in &doc.elements {
        if options.skip_page_furniture && super::markdown::is_page_furniture(&element.category) {
            continue;
        }
        let block = if element.is_table() && !element.content.html.is_empty() {
            HtmlTable::parse(&element.content.html).to_plain_text()
        } else {
            element.plain_text().trim_end().to_string()
        };
        if !block.is_empty() {
            blocks.push(block);
        }
    }

    Ok(blocks.join("\n\n"))
}
