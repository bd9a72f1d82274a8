//! Document-level types.

use super::{Content, ContentElement};
use crate::detect::ResponseFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reconstructed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Response format the document was read from
    pub format: ResponseFormat,

    /// Content elements in reading order
    pub elements: Vec<ContentElement>,

    /// Document-level content rendered by the vendor, if any
    #[serde(default)]
    pub content: Content,
}

impl Document {
    /// Create a new empty document.
    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            elements: Vec::new(),
            content: Content::default(),
        }
    }

    /// Create a document from elements.
    pub fn with_elements(format: ResponseFormat, elements: Vec<ContentElement>) -> Self {
        Self {
            format,
            elements,
            content: Content::default(),
        }
    }

    /// Add an element to the document.
    pub fn add_element(&mut self, element: ContentElement) {
        self.elements.push(element);
    }

    /// Get the number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of pages referenced by elements.
    pub fn page_count(&self) -> u32 {
        self.elements.iter().map(|e| e.page).max().unwrap_or(0)
    }

    /// Iterate over table elements.
    pub fn tables(&self) -> impl Iterator<Item = &ContentElement> {
        self.elements.iter().filter(|e| e.is_table())
    }

    /// Count elements per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for element in &self.elements {
            *counts.entry(element.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}
