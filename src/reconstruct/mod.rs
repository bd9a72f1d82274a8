//! Reconstruction of content elements from a block graph.
//!
//! Blocks are visited once, in input order. Layout regions become text
//! elements and TABLE blocks become HTML table elements; every other block
//! is only reached through relationships.

mod layout;
mod table;
mod text;

pub use layout::layout_element;
pub use table::{table_element, GridCell, TableGrid};
pub use text::{assemble_lines, assemble_words};

use crate::error::{Error, Result};
use crate::model::{Block, BlockType, BoundingBox, CellSpan, ContentElement};
use crate::parser::{BlockGraph, ErrorMode, ParseOptions};

/// Reconstruct content elements with default options.
pub fn reconstruct(graph: &BlockGraph) -> Result<Vec<ContentElement>> {
    reconstruct_with_options(graph, &ParseOptions::default())
}

/// Reconstruct content elements.
///
/// In [`ErrorMode::Strict`] the first failing element fails the whole
/// document; in [`ErrorMode::Lenient`] it is logged and skipped.
pub fn reconstruct_with_options(
    graph: &BlockGraph,
    options: &ParseOptions,
) -> Result<Vec<ContentElement>> {
    let mut elements = Vec::new();

    for handle in graph.handles() {
        let block = graph.block(handle);
        if !options.pages.includes(block.page) {
            continue;
        }

        let result = match block.block_type {
            BlockType::Table => table_element(graph, handle).map(Some),
            ref t if t.is_layout() => layout_element(graph, handle),
            _ => Ok(None),
        };

        match result {
            Ok(Some(element)) => elements.push(element),
            Ok(None) => {}
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping {} block {}: {}", block.block_type, block.id, e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(elements)
}

pub(crate) fn require_geometry(block: &Block) -> Result<BoundingBox> {
    block.geometry.ok_or_else(|| {
        Error::Schema(format!(
            "{} block {} has no geometry",
            block.block_type, block.id
        ))
    })
}

pub(crate) fn require_cell(block: &Block) -> Result<CellSpan> {
    block.cell.ok_or_else(|| {
        Error::Schema(format!(
            "{} block {} has no cell position",
            block.block_type, block.id
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Relationship;

    fn page_blocks() -> Vec<Block> {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 0.25);
        vec![
            Block::new("title", BlockType::LayoutTitle)
                .with_geometry(bbox)
                .with_relationship(Relationship::child(["l1"])),
            Block::line("l1", "Annual Summary"),
            Block::new("list", BlockType::LayoutList)
                .with_geometry(bbox)
                .with_relationship(Relationship::child(["item"])),
            Block::new("item", BlockType::LayoutText)
                .with_geometry(bbox)
                .with_relationship(Relationship::child(["l2"])),
            Block::line("l2", "- first point"),
            Block::new("t", BlockType::Table)
                .with_geometry(bbox)
                .on_page(2)
                .with_relationship(Relationship::child(["c"])),
            Block::cell("c", CellSpan::single(0, 0))
                .on_page(2)
                .with_relationship(Relationship::child(["w"])),
            Block::word("w", "42").on_page(2),
        ]
    }

    #[test]
    fn test_reconstruct_keeps_input_order_and_ids() {
        let graph = BlockGraph::build(page_blocks()).unwrap();
        let elements = reconstruct(&graph).unwrap();

        let summary: Vec<_> = elements
            .iter()
            .map(|e| (e.id, e.category.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(0, "LAYOUT_TITLE"), (3, "LAYOUT_TEXT"), (5, "TABLE")]
        );
        assert_eq!(elements[1].content.text, "- first point\n");
        assert_eq!(elements[2].page, 2);
    }

    #[test]
    fn test_page_selection_filters_elements() {
        let graph = BlockGraph::build(page_blocks()).unwrap();
        let options = ParseOptions::new().with_pages(crate::parser::PageSelection::Pages(vec![2]));
        let elements = reconstruct_with_options(&graph, &options).unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].category, "TABLE");
    }

    #[test]
    fn test_lenient_mode_skips_failing_table() {
        let mut blocks = page_blocks();
        blocks.push(
            Block::new("empty", BlockType::Table).with_geometry(BoundingBox::default()),
        );
        let graph = BlockGraph::build(blocks).unwrap();

        let strict = reconstruct(&graph);
        assert!(matches!(strict, Err(Error::EmptyTable { .. })));

        let lenient = reconstruct_with_options(&graph, &ParseOptions::new().lenient()).unwrap();
        assert_eq!(lenient.len(), 3);
    }
}
