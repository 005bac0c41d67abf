//! CLI error types.

use std::path::PathBuf;

use mdocx_config::ConfigError;
use mdocx_docx::DocxError;
use mdocx_template::TemplateError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Docx(#[from] DocxError),

    #[error("{0}")]
    Validation(String),
}
