//! Layout-service block types.
//!
//! A [`Block`] is one node of the flat graph a layout analysis returns:
//! pages, layout regions, tables and their cells, lines and words. Blocks
//! reference each other by id through typed [`Relationship`]s.

use super::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block type tag.
///
/// Tags outside the known set are kept verbatim in [`BlockType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    /// Page container
    Page,
    /// Line of text
    Line,
    /// Single word
    Word,
    /// Table structure
    Table,
    /// Table cell
    Cell,
    /// Merged table cell spanning several cells
    MergedCell,
    /// Narrative text region
    LayoutText,
    /// Document title
    LayoutTitle,
    /// Page header
    LayoutHeader,
    /// Page footer
    LayoutFooter,
    /// Section heading
    LayoutSectionHeader,
    /// Page number
    LayoutPageNumber,
    /// List container
    LayoutList,
    /// Figure or image region
    LayoutFigure,
    /// Table region
    LayoutTable,
    /// Key-value region
    LayoutKeyValue,
    /// Any other vendor tag
    Other(String),
}

impl BlockType {
    /// Get the wire tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Page => "PAGE",
            Self::Line => "LINE",
            Self::Word => "WORD",
            Self::Table => "TABLE",
            Self::Cell => "CELL",
            Self::MergedCell => "MERGED_CELL",
            Self::LayoutText => "LAYOUT_TEXT",
            Self::LayoutTitle => "LAYOUT_TITLE",
            Self::LayoutHeader => "LAYOUT_HEADER",
            Self::LayoutFooter => "LAYOUT_FOOTER",
            Self::LayoutSectionHeader => "LAYOUT_SECTION_HEADER",
            Self::LayoutPageNumber => "LAYOUT_PAGE_NUMBER",
            Self::LayoutList => "LAYOUT_LIST",
            Self::LayoutFigure => "LAYOUT_FIGURE",
            Self::LayoutTable => "LAYOUT_TABLE",
            Self::LayoutKeyValue => "LAYOUT_KEY_VALUE",
            Self::Other(tag) => tag,
        }
    }

    /// Check if this is a layout region type.
    pub fn is_layout(&self) -> bool {
        self.as_str().contains("LAYOUT")
    }

    /// Check if this type describes a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table | Self::LayoutTable)
    }

    /// Check if this type carries cell indices.
    pub fn is_cell(&self) -> bool {
        matches!(self, Self::Cell | Self::MergedCell)
    }

    /// Check if blocks of this type produce a content element.
    ///
    /// Lists and table regions are containers; their content comes from
    /// other blocks.
    pub fn emits_element(&self) -> bool {
        match self {
            Self::Table => true,
            Self::LayoutList | Self::LayoutTable => false,
            other => other.is_layout(),
        }
    }

    /// Check if this type carries text.
    pub fn has_text(&self) -> bool {
        matches!(self, Self::Line | Self::Word)
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        match tag {
            "PAGE" => Self::Page,
            "LINE" => Self::Line,
            "WORD" => Self::Word,
            "TABLE" => Self::Table,
            "CELL" => Self::Cell,
            "MERGED_CELL" => Self::MergedCell,
            "LAYOUT_TEXT" => Self::LayoutText,
            "LAYOUT_TITLE" => Self::LayoutTitle,
            "LAYOUT_HEADER" => Self::LayoutHeader,
            "LAYOUT_FOOTER" => Self::LayoutFooter,
            "LAYOUT_SECTION_HEADER" => Self::LayoutSectionHeader,
            "LAYOUT_PAGE_NUMBER" => Self::LayoutPageNumber,
            "LAYOUT_LIST" => Self::LayoutList,
            "LAYOUT_FIGURE" => Self::LayoutFigure,
            "LAYOUT_TABLE" => Self::LayoutTable,
            "LAYOUT_KEY_VALUE" => Self::LayoutKeyValue,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned bounding box in page-relative fractions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge (0.0 - 1.0)
    pub left: f64,
    /// Top edge (0.0 - 1.0)
    pub top: f64,
    /// Width (0.0 - 1.0)
    pub width: f64,
    /// Height (0.0 - 1.0)
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Corner polygon, clockwise from the top-left corner.
    pub fn polygon(&self) -> [Point; 4] {
        let right = self.left + self.width;
        let bottom = self.top + self.height;
        [
            Point::new(self.left, self.top),
            Point::new(right, self.top),
            Point::new(right, bottom),
            Point::new(self.left, bottom),
        ]
    }
}

/// Relationship type between blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationType {
    /// Containment (page -> line, line -> word, table -> cell)
    Child,
    /// Table -> merged cell
    MergedCell,
    /// Any other relationship (VALUE, TABLE_TITLE, ...)
    Other(String),
}

impl RelationType {
    /// Get the wire tag for this relationship.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Child => "CHILD",
            Self::MergedCell => "MERGED_CELL",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for RelationType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "CHILD" => Self::Child,
            "MERGED_CELL" => Self::MergedCell,
            _ => Self::Other(tag),
        }
    }
}

impl From<RelationType> for String {
    fn from(relation: RelationType) -> Self {
        relation.as_str().to_string()
    }
}

/// A typed list of references to other blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship type
    pub relation_type: RelationType,
    /// Referenced block ids, in order
    pub ids: Vec<String>,
}

impl Relationship {
    /// Create a CHILD relationship.
    pub fn child<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            relation_type: RelationType::Child,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a MERGED_CELL relationship.
    pub fn merged<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            relation_type: RelationType::MergedCell,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Position and span of a table cell.
///
/// Row and column are zero-based; the wire format is one-based and is
/// converted once, at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSpan {
    /// Zero-based row index
    pub row: usize,
    /// Zero-based column index
    pub column: usize,
    /// Number of rows covered (>= 1)
    pub row_span: usize,
    /// Number of columns covered (>= 1)
    pub column_span: usize,
}

impl CellSpan {
    /// Create a span.
    pub fn new(row: usize, column: usize, row_span: usize, column_span: usize) -> Self {
        Self {
            row,
            column,
            row_span,
            column_span,
        }
    }

    /// Single-cell span at a position.
    pub fn single(row: usize, column: usize) -> Self {
        Self::new(row, column, 1, 1)
    }

    /// Grid positions covered by this span, row-major.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row..self.row.saturating_add(self.row_span)).flat_map(move |r| {
            (self.column..self.column.saturating_add(self.column_span)).map(move |c| (r, c))
        })
    }
}

/// A single block of a layout analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique id within the result set
    pub id: String,

    /// Type tag
    pub block_type: BlockType,

    /// Page number (1-indexed)
    pub page: u32,

    /// Bounding box, if the service reported one
    pub geometry: Option<BoundingBox>,

    /// Outgoing relationships, in order
    pub relationships: Vec<Relationship>,

    /// Cell position (CELL and MERGED_CELL only)
    pub cell: Option<CellSpan>,

    /// Text (WORD and LINE only)
    pub text: Option<String>,
}

impl Block {
    /// Create a block with no geometry, relationships or text.
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            page: 1,
            geometry: None,
            relationships: Vec::new(),
            cell: None,
            text: None,
        }
    }

    /// Create a WORD block.
    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Word).with_text(text)
    }

    /// Create a LINE block.
    pub fn line(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Line).with_text(text)
    }

    /// Create a CELL block at a zero-based position.
    pub fn cell(id: impl Into<String>, span: CellSpan) -> Self {
        Self::new(id, BlockType::Cell).with_cell(span)
    }

    /// Set text and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set geometry and return self.
    pub fn with_geometry(mut self, geometry: BoundingBox) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set cell span and return self.
    pub fn with_cell(mut self, span: CellSpan) -> Self {
        self.cell = Some(span);
        self
    }

    /// Set page and return self.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Append a relationship and return self.
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Get the block text, or an empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
