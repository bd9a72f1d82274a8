//! Textract response ingestion.
//!
//! The wire schema is PascalCase JSON with a top-level `Blocks` array. Every
//! field is optional on the wire; the fields each block type needs are
//! checked here so that reconstruction never meets a half-formed block.
//! Cell row/column indices are converted from one-based to zero-based in
//! [`ingest_block`] and nowhere else.

use crate::error::{Error, Result};
use crate::model::{Block, BlockType, BoundingBox, CellSpan, Relationship};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawResponse {
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawBlock {
    id: Option<String>,
    block_type: Option<String>,
    geometry: Option<RawGeometry>,
    relationships: Option<Vec<RawRelationship>>,
    text: Option<String>,
    row_index: Option<u64>,
    column_index: Option<u64>,
    row_span: Option<u64>,
    column_span: Option<u64>,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGeometry {
    bounding_box: Option<RawBoundingBox>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawBoundingBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRelationship {
    #[serde(rename = "Type")]
    relation_type: String,
    #[serde(default)]
    ids: Vec<String>,
}

/// Read the blocks of a Textract response from JSON bytes.
pub fn read_blocks(data: &[u8]) -> Result<Vec<Block>> {
    let response: RawResponse = serde_json::from_slice(data)?;
    ingest(response)
}

/// Read the blocks of a Textract response from a parsed JSON value.
pub fn blocks_from_value(value: Value) -> Result<Vec<Block>> {
    let response: RawResponse = serde_json::from_value(value)?;
    ingest(response)
}

fn ingest(response: RawResponse) -> Result<Vec<Block>> {
    response
        .blocks
        .into_iter()
        .enumerate()
        .map(|(position, raw)| ingest_block(position, raw))
        .collect()
}

fn ingest_block(position: usize, raw: RawBlock) -> Result<Block> {
    let id = match raw.id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(Error::Schema(format!("block #{} has no Id", position))),
    };
    let block_type = raw
        .block_type
        .map(BlockType::from)
        .ok_or_else(|| Error::Schema(format!("block {} has no BlockType", id)))?;

    let geometry = raw
        .geometry
        .and_then(|g| g.bounding_box)
        .map(|b| BoundingBox::new(b.left, b.top, b.width, b.height));
    if geometry.is_none() && block_type.emits_element() {
        return Err(Error::Schema(format!(
            "{} block {} has no Geometry.BoundingBox",
            block_type, id
        )));
    }

    let cell = if block_type.is_cell() {
        let cell = CellSpan::new(
            zero_based(raw.row_index, "RowIndex", &id)?,
            zero_based(raw.column_index, "ColumnIndex", &id)?,
            span(raw.row_span, "RowSpan", &id)?,
            span(raw.column_span, "ColumnSpan", &id)?,
        );
        check_extent(&cell, &id)?;
        Some(cell)
    } else {
        None
    };

    if block_type.has_text() && raw.text.is_none() {
        return Err(Error::Schema(format!(
            "{} block {} has no Text",
            block_type, id
        )));
    }

    let relationships = raw
        .relationships
        .unwrap_or_default()
        .into_iter()
        .map(|r| Relationship {
            relation_type: r.relation_type.into(),
            ids: r.ids,
        })
        .collect();

    Ok(Block {
        id,
        block_type,
        page: raw.page.unwrap_or(1),
        geometry,
        relationships,
        cell,
        text: raw.text,
    })
}

/// Convert a one-based wire index to zero-based.
fn zero_based(value: Option<u64>, field: &str, id: &str) -> Result<usize> {
    match value {
        Some(v) if v >= 1 => to_usize(v - 1, field, id),
        Some(v) => Err(Error::Schema(format!(
            "cell {} has {} {} (expected >= 1)",
            id, field, v
        ))),
        None => Err(Error::Schema(format!("cell {} has no {}", id, field))),
    }
}

fn span(value: Option<u64>, field: &str, id: &str) -> Result<usize> {
    match value {
        Some(v) if v >= 1 => to_usize(v, field, id),
        Some(v) => Err(Error::Schema(format!(
            "cell {} has {} {} (expected >= 1)",
            id, field, v
        ))),
        None => Err(Error::Schema(format!("cell {} has no {}", id, field))),
    }
}

fn to_usize(value: u64, field: &str, id: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::Schema(format!("cell {} has {} {} out of range", id, field, value)))
}

/// The covered rectangle must end inside the index range.
fn check_extent(cell: &CellSpan, id: &str) -> Result<()> {
    let rows_end = cell.row.checked_add(cell.row_span);
    let columns_end = cell.column.checked_add(cell.column_span);
    if rows_end.is_none() || columns_end.is_none() {
        return Err(Error::Schema(format!(
            "cell {} spans past the largest index",
            id
        )));
    }
    Ok(())
}
