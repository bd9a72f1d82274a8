//! Vendor response parsing module.

mod document_parse;
mod graph;
mod options;
mod textract;

pub use document_parse::document_from_value;
pub use graph::{BlockGraph, BlockHandle, Edge};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use textract::{blocks_from_value, read_blocks};

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::detect::{detect_format_from_value, ResponseFormat};
use crate::error::Result;
use crate::model::Document;
use crate::reconstruct::reconstruct_with_options;

/// Parser for a saved vendor response.
pub struct ResponseParser {
    value: Value,
    options: ParseOptions,
}

impl ResponseParser {
    /// Open a response file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a response file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a response from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a response from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let value = serde_json::from_slice(data)?;
        Ok(Self { value, options })
    }

    /// Parse a response from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Response format, forced by options or detected from the JSON shape.
    pub fn format(&self) -> Result<ResponseFormat> {
        match self.options.format {
            Some(format) => Ok(format),
            None => detect_format_from_value(&self.value),
        }
    }

    /// Parse the response into a document.
    pub fn parse(self) -> Result<Document> {
        let format = self.format()?;
        match format {
            ResponseFormat::Textract => {
                let blocks = blocks_from_value(self.value)?;
                let graph = BlockGraph::build(blocks)?;
                let elements = reconstruct_with_options(&graph, &self.options)?;
                Ok(Document::with_elements(format, elements))
            }
            ResponseFormat::DocumentParse => {
                let mut document = document_from_value(self.value)?;
                let pages = &self.options.pages;
                document.elements.retain(|e| pages.includes(e.page));
                Ok(document)
            }
        }
    }

    /// Parse a Textract response into its block graph without reconstructing.
    pub fn into_graph(self) -> Result<BlockGraph> {
        BlockGraph::build(blocks_from_value(self.value)?)
    }
}
