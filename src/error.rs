//! Error types for docbench library.

use std::io;
use thiserror::Error;

/// Result type alias for docbench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ingesting, reconstructing or scoring documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response shape is not recognized.
    #[error("Unknown response format: expected a Textract or Document Parse response")]
    UnknownFormat,

    /// A required field is missing or has an invalid value.
    #[error("Schema violation: {0}")]
    Schema(String),

    /// Two blocks share the same id.
    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(String),

    /// A relationship references an id that is not in the result set.
    #[error("Block {from} references unknown block {target}")]
    UnresolvedReference {
        /// Id of the block holding the relationship
        from: String,
        /// The id that could not be resolved
        target: String,
    },

    /// A table has no cells to build a grid from.
    #[error("Table {table} has no cells")]
    EmptyTable {
        /// Id of the table block
        table: String,
    },

    /// A merged cell covers a grid position that is already gone.
    #[error("Merged cell in table {table} covers missing cell at row {row}, column {column}")]
    MergeConflict {
        /// Id of the table block
        table: String,
        /// Zero-based row of the missing cell
        row: usize,
        /// Zero-based column of the missing cell
        column: usize,
    },

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The question set for a document could not be resolved.
    #[error("Question set error: {0}")]
    QuestionSet(String),

    /// A model reply could not be interpreted.
    #[error("Malformed model reply: {0}")]
    ModelReply(String),

    /// The chat model backend failed.
    #[error("Chat model error: {0}")]
    Chat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnresolvedReference {
            from: "t1".to_string(),
            target: "c9".to_string(),
        };
        assert_eq!(err.to_string(), "Block t1 references unknown block c9");

        let err = Error::MergeConflict {
            table: "t1".to_string(),
            row: 1,
            column: 2,
        };
        assert_eq!(
            err.to_string(),
            "Merged cell in table t1 covers missing cell at row 1, column 2"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
