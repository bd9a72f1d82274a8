//! # docbench
//!
//! Document-understanding benchmark toolkit for Rust.
//!
//! This library turns saved document-analysis responses (Textract block
//! graphs or Document Parse element lists) into a flat list of content
//! elements, renders them as Markdown, plain text or JSON, and scores the
//! extracted content with a question-answering evaluation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docbench::{parse_file, render};
//!
//! fn main() -> docbench::Result<()> {
//!     // Parse a saved Textract response
//!     let doc = parse_file("invoice.json")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Block graph reconstruction**: layout regions become text elements
//! - **Tables with merged cells**: rendered as HTML with row and column spans
//! - **Multiple output formats**: Markdown, plain text, JSON
//! - **Batch extraction**: parallel over a directory using Rayon
//! - **QA evaluation**: pluggable chat model backend

pub mod batch;
pub mod detect;
pub mod error;
pub mod eval;
pub mod model;
pub mod parser;
pub mod reconstruct;
pub mod render;

// Re-export commonly used types
pub use batch::{run_batch, BatchOptions, BatchReport, BatchRunner, OutputFormat};
pub use detect::{detect_format_from_bytes, detect_format_from_path, ResponseFormat};
pub use error::{Error, Result};
pub use eval::{ChatModel, EvalOptions, EvalReport, Evaluator, QuestionSet, ScoreSummary};
pub use model::{
    Block, BlockType, BoundingBox, CellSpan, Content, ContentElement, Document, Point,
    RelationType, Relationship,
};
pub use parser::{BlockGraph, ErrorMode, PageSelection, ParseOptions, ResponseParser};
pub use reconstruct::{reconstruct, reconstruct_with_options, TableGrid};
pub use render::{JsonFormat, RenderOptions, TableMode};

use std::io::Read;
use std::path::Path;

/// Parse a saved response file and return a document.
///
/// # Example
///
/// ```no_run
/// use docbench::parse_file;
///
/// let doc = parse_file("invoice.json").unwrap();
/// println!("Elements: {}", doc.element_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    ResponseParser::open(path)?.parse()
}

/// Parse a saved response file with custom options.
///
/// # Example
///
/// ```no_run
/// use docbench::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient();
/// let doc = parse_file_with_options("invoice.json", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    ResponseParser::open_with_options(path, options)?.parse()
}

/// Parse a response from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    ResponseParser::from_bytes(data)?.parse()
}

/// Parse a response from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    ResponseParser::from_bytes_with_options(data, options)?.parse()
}

/// Parse a response from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    ResponseParser::from_reader_with_options(reader, ParseOptions::default())?.parse()
}

/// Convert a response file to Markdown.
///
/// # Example
///
/// ```no_run
/// let markdown = docbench::to_markdown("invoice.json").unwrap();
/// std::fs::write("invoice.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Convert a response file to plain text.
pub fn to_text<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, options)
}

/// Convert a response file to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for parsing and rendering responses.
///
/// # Example
///
/// ```no_run
/// use docbench::{Docbench, TableMode};
///
/// let markdown = Docbench::new()
///     .lenient()
///     .with_headings()
///     .with_table_mode(TableMode::Html)
///     .parse("invoice.json")?
///     .to_markdown()?;
/// # Ok::<(), docbench::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Docbench {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Docbench {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip failing elements instead of failing the document.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Force the response format instead of detecting it.
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.parse_options = self.parse_options.with_format(format);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set table mode.
    pub fn with_table_mode(mut self, mode: TableMode) -> Self {
        self.render_options = self.render_options.with_table_mode(mode);
        self
    }

    /// Render titles and section headers as Markdown headings.
    pub fn with_headings(mut self) -> Self {
        self.render_options = self.render_options.with_headings(true);
        self
    }

    /// Parse a response file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<DocbenchResult> {
        let document = parse_file_with_options(path, self.parse_options)?;
        Ok(DocbenchResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Parse a response from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<DocbenchResult> {
        let document = parse_bytes_with_options(data, self.parse_options)?;
        Ok(DocbenchResult {
            document,
            render_options: self.render_options,
        })
    }
}

/// A parsed document with the render options it was built with.
pub struct DocbenchResult {
    /// The parsed document
    pub document: Document,
    render_options: RenderOptions,
}

impl DocbenchResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
