//! WordprocessingML output for `mdocx`.
//!
//! [`WordBuilder`] implements [`mdocx_renderer::DocumentBuilder`] and
//! accumulates a [`WordDocument`], which serializes to a single-file Flat OPC
//! package that Word opens directly.
//!
//! # Example
//!
//! ```
//! use mdocx_docx::{StyleNames, WordBuilder};
//! use mdocx_renderer::{parse_markdown, render_document};
//!
//! let mut builder = WordBuilder::new();
//! render_document(&mut builder, &parse_markdown("# Hello", true)).unwrap();
//! let xml = builder.into_document().to_flat_opc(&StyleNames::default()).unwrap();
//! assert!(xml.contains("Heading1"));
//! ```

mod builder;
mod error;
pub mod model;
mod package;

pub use builder::{MAX_LIST_LEVEL, WordBuilder};
pub use error::DocxError;
pub use model::WordDocument;
pub use package::StyleNames;
