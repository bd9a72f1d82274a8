//! Parsing options and configuration.

use crate::detect::ResponseFormat;
use std::ops::RangeInclusive;

/// Options for parsing vendor responses.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode for per-element reconstruction failures
    pub error_mode: ErrorMode,

    /// Force a response format instead of detecting it
    pub format: Option<ResponseFormat>,

    /// Which pages to keep
    pub pages: PageSelection,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (drop failing tables instead of failing the document).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Force the response format.
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

/// Error handling mode during reconstruction.
///
/// Graph-level failures (duplicate ids, dangling references, schema
/// violations) always fail the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on the first element error
    #[default]
    Strict,
    /// Log and skip the failing element
    Lenient,
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Keep every page
    #[default]
    All,
    /// Keep an inclusive range
    Range(RangeInclusive<u32>),
    /// Keep the listed pages
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number is selected.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
        }
    }

    /// Parse a selection such as `"all"`, `"2-4"` or `"1,3,6-8"`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let mut pages = Vec::new();
        let mut parts = s.split(',').map(str::trim).peekable();
        while let Some(part) = parts.next() {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page(start)?;
                    let end = parse_page(end)?;
                    if start > end {
                        return Err(format!("Descending page range: {}", part));
                    }
                    // A lone range stays a range
                    if pages.is_empty() && parts.peek().is_none() {
                        return Ok(PageSelection::Range(start..=end));
                    }
                    pages.extend(start..=end);
                }
                None => pages.push(parse_page(part)?),
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("Invalid page number: {:?}", s.trim())),
        Ok(page) => Ok(page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .lenient()
            .with_format(ResponseFormat::Textract)
            .with_pages(PageSelection::Range(1..=2));

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.format, Some(ResponseFormat::Textract));
        assert!(!options.pages.includes(3));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.format, None);
        assert_eq!(options.pages, PageSelection::All);
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("2-4").unwrap(),
            PageSelection::Range(2..=4)
        );
        assert_eq!(
            PageSelection::parse("7, 1,3-4,3").unwrap(),
            PageSelection::Pages(vec![1, 3, 4, 7])
        );
        assert!(PageSelection::parse("0").is_err());
        assert!(PageSelection::parse("5-2").is_err());
        assert!(PageSelection::parse("x").is_err());
    }

    #[test]
    fn test_page_selection_includes() {
        let pages = PageSelection::Pages(vec![1, 3, 5]);
        assert!(pages.includes(3));
        assert!(!pages.includes(2));
        assert!(PageSelection::All.includes(99));
    }
}
