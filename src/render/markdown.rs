//! Markdown rendering for reconstructed documents.

use crate::error::Result;
use crate::model::{ContentElement, Document};

use super::{HtmlTable, RenderOptions, TableMode};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        if self.options.prefer_vendor_markdown && !doc.content.markdown.trim().is_empty() {
            return Ok(doc.content.markdown.trim().to_string());
        }

        let mut output = String::new();
        for element in &doc.elements {
            if self.options.skip_page_furniture && is_page_furniture(&element.category) {
                continue;
            }
            if element.is_table() {
                self.render_table(&mut output, element);
            } else {
                self.render_text(&mut output, element);
            }
        }

        Ok(output.trim().to_string())
    }

    fn render_table(&self, output: &mut String, element: &ContentElement) {
        let html = element.content.html.trim();
        if html.is_empty() {
            // Vendor-rendered tables may only carry Markdown
            push_block(output, &element.content.markdown);
            return;
        }

        match self.options.table_mode {
            TableMode::Html => push_block(output, html),
            TableMode::Markdown => {
                let table = HtmlTable::parse(html);
                push_block(output, &table.to_markdown());
            }
        }
    }

    fn render_text(&self, output: &mut String, element: &ContentElement) {
        let text = if element.content.markdown.is_empty() {
            element.content.text.as_str()
        } else {
            element.content.markdown.as_str()
        };
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }

        match heading_level(&element.category).filter(|_| self.options.headings) {
            Some(level) => {
                let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
                push_block(output, &format!("{} {}", "#".repeat(level), line));
            }
            None => push_block(output, text),
        }
    }
}

fn push_block(output: &mut String, block: &str) {
    let block = block.trim_end();
    if block.is_empty() {
        return;
    }
    output.push_str(block);
    output.push_str("\n\n");
}

fn heading_level(category: &str) -> Option<usize> {
    match category {
        "LAYOUT_TITLE" => Some(1),
        "LAYOUT_SECTION_HEADER" => Some(2),
        _ => None,
    }
}

pub(super) fn is_page_furniture(category: &str) -> bool {
    matches!(
        category,
        "LAYOUT_HEADER" | "LAYOUT_FOOTER" | "LAYOUT_PAGE_NUMBER" | "header" | "footer"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::ResponseFormat;
    use crate::model::{BlockType, BoundingBox, Content};

    fn element(id: usize, block_type: BlockType, content: Content) -> ContentElement {
        ContentElement::new(id, &block_type, &BoundingBox::default(), content)
    }

    fn sample() -> Document {
        Document::with_elements(
            ResponseFormat::Textract,
            vec![
                element(0, BlockType::LayoutHeader, Content::text("ACME Corp\n")),
                element(1, BlockType::LayoutTitle, Content::text("Quarterly\nReport\n")),
                element(4, BlockType::LayoutText, Content::text("Revenue grew.\nCosts fell.\n")),
                element(
                    9,
                    BlockType::Table,
                    Content::html(
                        "<table><tr><td rowspan='1' colspan='1'>Q1</td><td rowspan='1' colspan='1'>10</td></tr></table>",
                    ),
                ),
            ],
        )
    }

    #[test]
    fn test_render_plain_narrative_and_markdown_table() {
        let markdown = to_markdown(&sample(), &RenderOptions::default()).unwrap();
        assert_eq!(
            markdown,
            "ACME Corp\n\nQuarterly\nReport\n\nRevenue grew.\nCosts fell.\n\n| Q1 | 10 |\n| --- | --- |"
        );
    }

    #[test]
    fn test_render_headings_and_skip_furniture() {
        let options = RenderOptions::new()
            .with_headings(true)
            .with_skip_page_furniture(true);
        let markdown = to_markdown(&sample(), &options).unwrap();

        assert!(markdown.starts_with("# Quarterly Report\n\n"));
        assert!(!markdown.contains("ACME"));
    }

    #[test]
    fn test_render_html_tables() {
        let options = RenderOptions::new().with_table_mode(TableMode::Html);
        let markdown = to_markdown(&sample(), &options).unwrap();
        assert!(markdown.ends_with("<td rowspan='1' colspan='1'>10</td></tr></table>"));
    }

    #[test]
    fn test_vendor_markdown_is_preferred() {
        let mut doc = sample();
        doc.content.markdown = "# From vendor\n".to_string();

        let markdown = to_markdown(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(markdown, "# From vendor");

        let options = RenderOptions::new().with_vendor_markdown(false);
        let markdown = to_markdown(&doc, &options).unwrap();
        assert!(markdown.starts_with("ACME Corp"));
    }

    #[test]
    fn test_empty_figure_text_is_skipped() {
        let doc = Document::with_elements(
            ResponseFormat::Textract,
            vec![
                element(0, BlockType::LayoutFigure, Content::default()),
                element(1, BlockType::LayoutText, Content::text("Caption\n")),
            ],
        );
        assert_eq!(to_markdown(&doc, &RenderOptions::default()).unwrap(), "Caption");
    }
}
