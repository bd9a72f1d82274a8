//! Response format detection.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Vendor response format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// AWS Textract layout analysis (flat `Blocks` graph)
    Textract,
    /// Document Parse response (pre-rendered `elements`)
    DocumentParse,
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Textract => write!(f, "Textract"),
            Self::DocumentParse => write!(f, "Document Parse"),
        }
    }
}

/// Detect the response format of a file.
///
/// # Example
/// ```no_run
/// use docbench::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("page-001.json").unwrap();
/// println!("Format: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ResponseFormat> {
    let data = fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect the response format of raw JSON bytes.
///
/// # Returns
/// * `Err(Error::Json(_))` if the data is not JSON
/// * `Err(Error::UnknownFormat)` if the JSON has neither shape
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ResponseFormat> {
    let value: Value = serde_json::from_slice(data)?;
    detect_format_from_value(&value)
}

/// Detect the response format of a parsed JSON value.
pub fn detect_format_from_value(value: &Value) -> Result<ResponseFormat> {
    let object = value.as_object().ok_or(Error::UnknownFormat)?;

    if object.get("Blocks").is_some_and(Value::is_array) {
        return Ok(ResponseFormat::Textract);
    }

    let has_elements = object.get("elements").is_some_and(Value::is_array);
    let has_content = object.get("content").is_some_and(Value::is_object);
    if has_elements || has_content {
        return Ok(ResponseFormat::DocumentParse);
    }

    Err(Error::UnknownFormat)
}

/// Check if bytes hold a Textract response.
pub fn is_textract_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(ResponseFormat::Textract))
}
