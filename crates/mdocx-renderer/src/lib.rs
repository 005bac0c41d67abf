//! Markdown rendering into word-processing documents.
//!
//! This crate walks a parsed markdown tree ([`Document`]) and drives a
//! [`DocumentBuilder`] with semantic operations: headings, paragraphs with
//! formatted runs, lists, tables, code blocks and raw markup chunks. The
//! builder decides how those operations materialize; `mdocx-docx` provides
//! one that produces WordprocessingML.
//!
//! # Architecture
//!
//! - [`parse_markdown`] folds `pulldown-cmark` events into the tree
//! - [`DocumentRenderer`] traverses the tree, tracking open lists, the
//!   current table and a [`RawMarkupBuffer`] that merges inline HTML tags
//!   into well-formed chunks
//! - [`RecordingBuilder`] logs operations for inspection and tests
//!
//! # Example
//!
//! ```
//! use mdocx_renderer::{Operation, RecordingBuilder, parse_markdown, render_document};
//!
//! let document = parse_markdown("# Hello\n\n**Bold** text", true);
//! let mut builder = RecordingBuilder::new();
//! render_document(&mut builder, &document).unwrap();
//!
//! assert_eq!(
//!     builder.operations()[0],
//!     Operation::Heading { text: "Hello".to_owned(), level: 1 }
//! );
//! ```

mod ast;
mod builder;
mod extract;
mod parse;
mod raw;
mod recording;
mod renderer;
mod state;

pub use ast::{Block, Document, Inline, ListItem, TableCell, TableRow};
pub use builder::{DocumentBuilder, MAX_HEADING_LEVEL, NumberingId};
pub use extract::plain_text;
pub use parse::{parse_events, parse_markdown, parser_options};
pub use raw::{FragmentKind, RawMarkupBuffer, RawMode, escape_html};
pub use recording::{Operation, RecordingBuilder};
pub use renderer::{DocumentRenderer, render_document};
pub use state::{ListContext, ListStack, TableState};
