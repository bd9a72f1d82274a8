//! Rendering module for converting documents to output formats.

mod html_table;
mod json;
mod markdown;
mod options;
mod text;

pub use html_table::{HtmlCell, HtmlTable};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{RenderOptions, TableMode};
pub use text::to_text;
