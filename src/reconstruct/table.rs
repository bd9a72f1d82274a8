//! Table reconstruction from cell blocks.
//!
//! A TABLE block lists its CELL blocks through CHILD relationships and its
//! MERGED_CELL blocks through MERGED_CELL relationships. The grid is built
//! from the cells first; each merge then replaces the cells its rectangle
//! covers with a single spanning cell.

use super::{require_cell, require_geometry, text::assemble_words};
use crate::error::{Error, Result};
use crate::model::{BlockType, Content, ContentElement};
use crate::parser::{BlockGraph, BlockHandle};
use std::collections::BTreeMap;
use std::fmt::Write;

/// A cell of a reconstructed grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Number of rows covered
    pub row_span: usize,
    /// Number of columns covered
    pub column_span: usize,
    /// Cell text
    pub text: String,
}

/// Sparse table grid keyed by zero-based `(row, column)`.
#[derive(Debug, Clone)]
pub struct TableGrid {
    rows: usize,
    columns: usize,
    cells: BTreeMap<(usize, usize), GridCell>,
}

impl TableGrid {
    /// Build the grid of a TABLE block, applying its merges.
    pub fn build(graph: &BlockGraph, table: BlockHandle) -> Result<Self> {
        let table_id = graph.block(table).id.as_str();

        let mut cells = BTreeMap::new();
        for handle in graph.children_of_type(table, BlockType::Cell) {
            let span = require_cell(graph.block(handle))?;
            cells.insert(
                (span.row, span.column),
                GridCell {
                    row_span: span.row_span,
                    column_span: span.column_span,
                    text: assemble_words(graph, handle),
                },
            );
        }

        let rows = cells.keys().map(|&(row, _)| row + 1).max();
        let columns = cells.keys().map(|&(_, column)| column + 1).max();
        let (rows, columns) = match (rows, columns) {
            (Some(rows), Some(columns)) => (rows, columns),
            _ => {
                return Err(Error::EmptyTable {
                    table: table_id.to_string(),
                })
            }
        };

        let mut grid = Self {
            rows,
            columns,
            cells,
        };
        for merged in graph.merged_cells(table) {
            grid.apply_merge(graph, table_id, merged)?;
        }

        log::debug!(
            "Table {}: {}x{} grid, {} cells",
            table_id,
            grid.rows,
            grid.columns,
            grid.cells.len()
        );
        Ok(grid)
    }

    fn apply_merge(&mut self, graph: &BlockGraph, table_id: &str, merged: BlockHandle) -> Result<()> {
        let span = require_cell(graph.block(merged))?;

        for (row, column) in span.positions() {
            if self.cells.remove(&(row, column)).is_none() {
                return Err(Error::MergeConflict {
                    table: table_id.to_string(),
                    row,
                    column,
                });
            }
        }

        self.cells.insert(
            (span.row, span.column),
            GridCell {
                row_span: span.row_span,
                column_span: span.column_span,
                text: merged_text(graph, merged),
            },
        );
        Ok(())
    }

    /// Number of rows in the grid extent.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns in the grid extent.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Get the cell anchored at a position.
    pub fn get(&self, row: usize, column: usize) -> Option<&GridCell> {
        self.cells.get(&(row, column))
    }

    /// Number of anchored cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Render the grid as an HTML table.
    ///
    /// Cells are written in row-major order. Positions covered by a merge
    /// emit nothing; rows left without any anchored cell are omitted.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>");
        let mut current_row = None;
        for (&(row, _), cell) in &self.cells {
            if current_row != Some(row) {
                if current_row.is_some() {
                    html.push_str("</tr>");
                }
                html.push_str("<tr>");
                current_row = Some(row);
            }
            let _ = write!(
                html,
                "<td rowspan='{}' colspan='{}'>{}</td>",
                cell.row_span,
                cell.column_span,
                escape_html(&cell.text)
            );
        }
        if current_row.is_some() {
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

/// Text of a merged cell: the words of each cell in its first relationship.
fn merged_text(graph: &BlockGraph, merged: BlockHandle) -> String {
    graph
        .first_edge(merged)
        .map(|edge| {
            edge.targets
                .iter()
                .map(|&cell| assemble_words(graph, cell))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the element for a TABLE block.
pub fn table_element(graph: &BlockGraph, handle: BlockHandle) -> Result<ContentElement> {
    let block = graph.block(handle);
    let geometry = require_geometry(block)?;
    let grid = TableGrid::build(graph, handle)?;

    Ok(ContentElement::new(
        handle.index(),
        &block.block_type,
        &geometry,
        Content::html(grid.to_html()),
    )
    .on_page(block.page))
}
