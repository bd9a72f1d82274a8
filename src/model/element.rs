//! Content element types.

use super::{BlockType, BoundingBox};
use serde::{Deserialize, Serialize};

/// A point in page-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (0.0 - 1.0)
    pub x: f64,
    /// Vertical position (0.0 - 1.0)
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendered content of an element.
///
/// At most one representation is populated per element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Plain text, lines joined by newlines
    pub text: String,
    /// HTML markup (tables)
    pub html: String,
    /// Markdown markup
    pub markdown: String,
}

impl Content {
    /// Create text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create HTML content.
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    /// Check if no representation is populated.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.html.is_empty() && self.markdown.is_empty()
    }
}

/// One unit of reconstructed output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentElement {
    /// Index of the originating block in input order
    pub id: usize,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Originating block type tag
    pub category: String,

    /// Bounding polygon, clockwise from top-left
    #[serde(default)]
    pub coordinates: Vec<Point>,

    /// Rendered content
    #[serde(default)]
    pub content: Content,
}

fn default_page() -> u32 {
    1
}

impl ContentElement {
    /// Create an element from a block's type and bounding box.
    pub fn new(id: usize, category: &BlockType, geometry: &BoundingBox, content: Content) -> Self {
        Self {
            id,
            page: 1,
            category: category.to_string(),
            coordinates: geometry.polygon().to_vec(),
            content,
        }
    }

    /// Set page and return self.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        !self.content.html.is_empty() || self.category.eq_ignore_ascii_case("table")
    }

    /// Get the best plain text for this element.
    pub fn plain_text(&self) -> &str {
        if !self.content.text.is_empty() {
            &self.content.text
        } else {
            &self.content.markdown
        }
    }
}
