//! Layout pass: one element per narrative layout region.

use super::{require_geometry, text::assemble_lines};
use crate::error::Result;
use crate::model::{BlockType, Content, ContentElement};
use crate::parser::{BlockGraph, BlockHandle};

/// Build the element for a layout block.
///
/// Returns `Ok(None)` for blocks that never produce an element: lists are
/// containers whose children are covered by other layout blocks, and table
/// regions are emitted from their TABLE block instead.
pub fn layout_element(graph: &BlockGraph, handle: BlockHandle) -> Result<Option<ContentElement>> {
    let block = graph.block(handle);
    if !block.block_type.emits_element() {
        return Ok(None);
    }

    let geometry = require_geometry(block)?;

    // Figures are image regions
    let text = if block.block_type == BlockType::LayoutFigure {
        String::new()
    } else {
        assemble_lines(graph, handle)
    };

    Ok(Some(
        ContentElement::new(
            handle.index(),
            &block.block_type,
            &geometry,
            Content::text(text),
        )
        .on_page(block.page),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BoundingBox, Relationship};

    fn region(id: &str, block_type: BlockType) -> Block {
        Block::new(id, block_type)
            .with_geometry(BoundingBox::new(0.25, 0.5, 0.5, 0.25))
            .with_relationship(Relationship::child(["l1", "w1", "l2"]))
    }

    fn build_graph(block_type: BlockType) -> BlockGraph {
        BlockGraph::build(vec![
            region("r", block_type),
            Block::line("l1", "Quarterly report"),
            Block::word("w1", "Quarterly"),
            Block::line("l2", "2024"),
        ])
        .unwrap()
    }

    #[test]
    fn test_text_region_joins_line_children() {
        let graph = build_graph(BlockType::LayoutText);
        let element = layout_element(&graph, graph.get("r").unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(element.id, 0);
        assert_eq!(element.category, "LAYOUT_TEXT");
        assert_eq!(element.content.text, "Quarterly report\n2024\n");
        assert!(element.content.html.is_empty());
    }

    #[test]
    fn test_figure_has_no_text() {
        let graph = build_graph(BlockType::LayoutFigure);
        let element = layout_element(&graph, graph.get("r").unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(element.category, "LAYOUT_FIGURE");
        assert_eq!(element.content.text, "");
    }

    #[test]
    fn test_list_and_table_regions_are_skipped() {
        let graph = build_graph(BlockType::LayoutList);
        assert!(layout_element(&graph, graph.get("r").unwrap())
            .unwrap()
            .is_none());

        let graph = build_graph(BlockType::LayoutTable);
        assert!(layout_element(&graph, graph.get("r").unwrap())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unknown_layout_tag_keeps_category() {
        let graph = build_graph(BlockType::Other("LAYOUT_CAPTION".to_string()));
        let element = layout_element(&graph, graph.get("r").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(element.category, "LAYOUT_CAPTION");
    }
}
