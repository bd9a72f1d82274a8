//! Resolved block graph.
//!
//! [`BlockGraph`] is a node table plus typed adjacency lists. Every
//! relationship id is resolved to a [`BlockHandle`] once, when the graph is
//! built, so a graph that exists has no dangling references.

use crate::error::{Error, Result};
use crate::model::{Block, BlockType, RelationType};
use std::collections::HashMap;

/// Index of a block in a [`BlockGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHandle(usize);

impl BlockHandle {
    /// Position of the block in input order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A resolved relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Relationship type
    pub kind: RelationType,
    /// Target blocks, in relationship order
    pub targets: Vec<BlockHandle>,
}

/// A block collection with resolved relationships.
#[derive(Debug, Clone)]
pub struct BlockGraph {
    nodes: Vec<Block>,
    index: HashMap<String, BlockHandle>,
    edges: Vec<Vec<Edge>>,
}

impl BlockGraph {
    /// Build a graph from blocks in input order.
    ///
    /// Fails with [`Error::DuplicateBlockId`] if two blocks share an id and
    /// with [`Error::UnresolvedReference`] if a relationship points outside
    /// the collection.
    pub fn build(blocks: Vec<Block>) -> Result<Self> {
        let mut index = HashMap::with_capacity(blocks.len());
        for (i, block) in blocks.iter().enumerate() {
            if index.insert(block.id.clone(), BlockHandle(i)).is_some() {
                return Err(Error::DuplicateBlockId(block.id.clone()));
            }
        }

        let edges = blocks
            .iter()
            .map(|block| -> Result<Vec<Edge>> {
                block
                    .relationships
                    .iter()
                    .map(|rel| -> Result<Edge> {
                        let targets = rel
                            .ids
                            .iter()
                            .map(|target| {
                                index.get(target).copied().ok_or_else(|| {
                                    Error::UnresolvedReference {
                                        from: block.id.clone(),
                                        target: target.clone(),
                                    }
                                })
                            })
                            .collect::<Result<Vec<_>>>()?;
                        Ok(Edge {
                            kind: rel.relation_type.clone(),
                            targets,
                        })
                    })
                    .collect()
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Built block graph with {} nodes", blocks.len());

        Ok(Self {
            nodes: blocks,
            index,
            edges,
        })
    }

    /// Get the number of blocks.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no blocks.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over handles in input order.
    pub fn handles(&self) -> impl Iterator<Item = BlockHandle> {
        (0..self.nodes.len()).map(BlockHandle)
    }

    /// Get a block by handle.
    pub fn block(&self, handle: BlockHandle) -> &Block {
        &self.nodes[handle.0]
    }

    /// Look up a handle by block id.
    pub fn get(&self, id: &str) -> Option<BlockHandle> {
        self.index.get(id).copied()
    }

    /// All resolved relationships of a block, in order.
    pub fn edges(&self, handle: BlockHandle) -> &[Edge] {
        &self.edges[handle.0]
    }

    /// CHILD targets of a block, in order.
    pub fn children(&self, handle: BlockHandle) -> impl Iterator<Item = BlockHandle> + '_ {
        self.edges(handle)
            .iter()
            .filter(|edge| edge.kind == RelationType::Child)
            .flat_map(|edge| edge.targets.iter().copied())
    }

    /// CHILD targets of a block with the given type.
    pub fn children_of_type(
        &self,
        handle: BlockHandle,
        block_type: BlockType,
    ) -> impl Iterator<Item = BlockHandle> + '_ {
        self.children(handle)
            .filter(move |child| self.block(*child).block_type == block_type)
    }

    /// MERGED_CELL targets of a block, in order.
    pub fn merged_cells(&self, handle: BlockHandle) -> impl Iterator<Item = BlockHandle> + '_ {
        self.edges(handle)
            .iter()
            .filter(|edge| edge.kind == RelationType::MergedCell)
            .flat_map(|edge| edge.targets.iter().copied())
    }

    /// The first relationship of a block, whatever its kind.
    pub fn first_edge(&self, handle: BlockHandle) -> Option<&Edge> {
        self.edges(handle).first()
    }
}
