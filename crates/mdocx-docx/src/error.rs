//! Error types for document building and serialization.

use std::string::FromUtf8Error;

/// Error from [`WordBuilder`](crate::WordBuilder) or package serialization.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocxError {
    /// Builder operation called where the document structure forbids it.
    #[error("invalid document structure: {0}")]
    Structure(&'static str),

    /// I/O error while writing the package.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// XML serialization error.
    #[error("XML write error")]
    Xml(#[from] quick_xml::Error),

    /// Serialized package is not valid UTF-8.
    #[error("invalid UTF-8 in package")]
    Utf8(#[from] FromUtf8Error),
}
