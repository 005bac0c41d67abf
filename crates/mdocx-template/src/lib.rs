//! Jinja templating of markdown sources.
//!
//! Markdown is rendered as a `minijinja` template before parsing, with a
//! data context loaded from a JSON, YAML or TOML file. Any template failure
//! is fatal: the document is never rendered from a half-expanded source.

use std::path::{Path, PathBuf};

use minijinja::{Environment, UndefinedBehavior};
use serde_json::{Map, Value};

/// Template name used in error messages.
const TEMPLATE_NAME: &str = "document";

/// Error from loading template data or rendering a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Data file could not be read.
    #[error("failed to read data file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data file extension is not one of json, yaml, yml or toml.
    #[error("unsupported data file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// JSON data parse error.
    #[error("invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML data parse error.
    #[error("invalid YAML data: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML data parse error.
    #[error("invalid TOML data: {0}")]
    Toml(#[from] toml::de::Error),

    /// Template syntax or evaluation error.
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

/// Supported data file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
    Toml,
}

impl DataFormat {
    /// Detect the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Parse data in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid for the format.
    pub fn parse(self, content: &str) -> Result<Value, TemplateError> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        })
    }
}

/// Load a template data context from a file, choosing the format by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension or
/// does not parse.
pub fn load_data(path: &Path) -> Result<Value, TemplateError> {
    let format = DataFormat::from_path(path)
        .ok_or_else(|| TemplateError::UnsupportedFormat(path.to_path_buf()))?;
    let content = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data = format.parse(&content)?;
    tracing::debug!(path = %path.display(), ?format, "Loaded template data");
    Ok(data)
}

/// Empty data context.
#[must_use]
pub fn empty_context() -> Value {
    Value::Object(Map::new())
}

/// Renders markdown sources as Jinja templates.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine. In strict mode, undefined variables are errors
    /// instead of rendering as empty strings.
    #[must_use]
    pub fn new(strict: bool) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        if strict {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        Self { env }
    }

    /// Render `source` with `data` as the template context.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`] on syntax or evaluation errors.
    pub fn render(&self, source: &str, data: &Value) -> Result<String, TemplateError> {
        self.env
            .render_named_str(TEMPLATE_NAME, source, data)
            .map_err(TemplateError::from)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(true)
    }
}
