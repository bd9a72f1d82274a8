//! Document model types.
//!
//! Two layers live here: the input graph nodes ([`Block`]) as reported by a
//! layout service, and the output ([`ContentElement`], [`Document`]) that
//! renderers consume.

mod block;
mod document;
mod element;

pub use block::{Block, BlockType, BoundingBox, CellSpan, RelationType, Relationship};
pub use document::Document;
pub use element::{Content, ContentElement, Point};
