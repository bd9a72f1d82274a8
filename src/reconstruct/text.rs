//! Text assembly from child blocks.

use crate::model::BlockType;
use crate::parser::{BlockGraph, BlockHandle};

/// Join the text of a block's WORD children with single spaces.
///
/// Children are taken in relationship order. Returns an empty string when
/// the block has no WORD children.
pub fn assemble_words(graph: &BlockGraph, handle: BlockHandle) -> String {
    graph
        .children_of_type(handle, BlockType::Word)
        .map(|word| graph.block(word).text())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Concatenate a block's LINE children, each followed by a newline.
pub fn assemble_lines(graph: &BlockGraph, handle: BlockHandle) -> String {
    let mut text = String::new();
    for line in graph.children_of_type(handle, BlockType::Line) {
        text.push_str(graph.block(line).text());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, CellSpan, Relationship};

    fn graph_with_children(order: [&str; 3]) -> BlockGraph {
        BlockGraph::build(vec![
            Block::cell("c", CellSpan::single(0, 0))
                .with_relationship(Relationship::child(order)),
            Block::word("w1", "alpha"),
            Block::word("w2", "beta"),
            Block::word("w3", "gamma"),
        ])
        .unwrap()
    }

    #[test]
    fn test_words_follow_child_order() {
        let graph = graph_with_children(["w1", "w2", "w3"]);
        assert_eq!(assemble_words(&graph, graph.get("c").unwrap()), "alpha beta gamma");

        let graph = graph_with_children(["w3", "w1", "w2"]);
        assert_eq!(assemble_words(&graph, graph.get("c").unwrap()), "gamma alpha beta");
    }

    #[test]
    fn test_words_across_several_child_relationships() {
        let graph = BlockGraph::build(vec![
            Block::cell("c", CellSpan::single(0, 0))
                .with_relationship(Relationship::child(["w1"]))
                .with_relationship(Relationship::child(["w2"])),
            Block::word("w1", "left"),
            Block::word("w2", "right"),
        ])
        .unwrap();
        assert_eq!(assemble_words(&graph, graph.get("c").unwrap()), "left right");
    }

    #[test]
    fn test_no_children_is_empty() {
        let graph = BlockGraph::build(vec![Block::cell("c", CellSpan::single(0, 0))])
            .unwrap();
        assert_eq!(assemble_words(&graph, graph.get("c").unwrap()), "");
    }

    #[test]
    fn test_non_word_children_are_ignored() {
        let graph = BlockGraph::build(vec![
            Block::cell("c", CellSpan::single(0, 0))
                .with_relationship(Relationship::child(["s1", "w1"])),
            Block::new("s1", BlockType::Other("SELECTION_ELEMENT".to_string())),
            Block::word("w1", "only"),
        ])
        .unwrap();
        assert_eq!(assemble_words(&graph, graph.get("c").unwrap()), "only");
    }

    #[test]
    fn test_lines_end_with_newline() {
        let graph = BlockGraph::build(vec![
            Block::new("r", BlockType::LayoutText)
                .with_relationship(Relationship::child(["l1", "l2"])),
            Block::line("l1", "First line"),
            Block::line("l2", "Second line"),
        ])
        .unwrap();
        assert_eq!(
            assemble_lines(&graph, graph.get("r").unwrap()),
            "First line\nSecond line\n"
        );
    }
}
