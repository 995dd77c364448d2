//! Trellis CLI library.
//!
//! This library provides the pieces behind the `trellis` binary: template
//! document loading, JSON-lines row input, command execution and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod document;
pub mod error;
pub mod output;
pub mod rows;

pub use cli::{Cli, CliFormat, Command};
pub use document::TemplateDocument;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use rows::{load_rows, read_json_lines, RowOptions};
