//! Rendering options and configuration.

/// Options for rendering documents.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How to render table elements
    pub table_mode: TableMode,

    /// Prefix titles and section headers with `#` / `##`
    pub headings: bool,

    /// Leave out page headers, footers and page numbers
    pub skip_page_furniture: bool,

    /// Use the vendor's document-level Markdown when the response has one
    pub prefer_vendor_markdown: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table mode.
    pub fn with_table_mode(mut self, mode: TableMode) -> Self {
        self.table_mode = mode;
        self
    }

    /// Enable or disable heading markers.
    pub fn with_headings(mut self, headings: bool) -> Self {
        self.headings = headings;
        self
    }

    /// Enable or disable page furniture removal.
    pub fn with_skip_page_furniture(mut self, skip: bool) -> Self {
        self.skip_page_furniture = skip;
        self
    }

    /// Enable or disable use of vendor-rendered Markdown.
    pub fn with_vendor_markdown(mut self, prefer: bool) -> Self {
        self.prefer_vendor_markdown = prefer;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            table_mode: TableMode::Markdown,
            headings: false,
            skip_page_furniture: false,
            prefer_vendor_markdown: true,
        }
    }
}

/// How to render tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    /// Convert to Markdown pipe tables
    #[default]
    Markdown,
    /// Keep the HTML markup
    Html,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_table_mode(TableMode::Html)
            .with_headings(true)
            .with_skip_page_furniture(true)
            .with_vendor_markdown(false);

        assert_eq!(options.table_mode, TableMode::Html);
        assert!(options.headings);
        assert!(options.skip_page_furniture);
        assert!(!options.prefer_vendor_markdown);
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.table_mode, TableMode::Markdown);
        assert!(!options.headings);
        assert!(options.prefer_vendor_markdown);
    }
}
