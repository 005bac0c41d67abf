//! Markdown source loading shared by all commands.

use std::path::PathBuf;

use clap::Args;
use mdocx_config::{CliSettings, Config, TemplateConfig};
use mdocx_renderer::{Document, parse_markdown};
use mdocx_template::{TemplateEngine, TemplateError, empty_context, load_data};

use crate::error::CliError;

/// Arguments selecting and preprocessing the markdown source.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to the markdown file.
    pub(crate) input: PathBuf,

    /// Template data file (.json, .yaml, .yml or .toml; overrides config).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Do not render the source as a template.
    #[arg(long)]
    no_template: bool,

    /// Disable tables, strikethrough and task lists.
    #[arg(long)]
    no_gfm: bool,

    /// Path to configuration file (default: auto-discover mdocx.toml).
    #[arg(short, long, env = "MDOCX_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SourceArgs {
    /// Load configuration, read the source, expand the template and parse.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, source or template data cannot be
    /// loaded, or if the template fails to render.
    pub(crate) fn load(&self) -> Result<(Config, Document), CliError> {
        let cli_settings = CliSettings {
            gfm: self.no_gfm.then_some(false),
            template_enabled: self.no_template.then_some(false),
            data: self.data.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let mut source =
            std::fs::read_to_string(&self.input).map_err(|source| CliError::Input {
                path: self.input.clone(),
                source,
            })?;
        if config.template_resolved.enabled {
            source = expand_template(&source, &config.template_resolved)?;
        }

        let document = parse_markdown(&source, config.markdown.gfm);
        tracing::info!(
            input = %self.input.display(),
            blocks = document.blocks.len(),
            "Parsed markdown"
        );
        Ok((config, document))
    }
}

/// Render the source as a template with the configured data context.
fn expand_template(source: &str, template: &TemplateConfig) -> Result<String, TemplateError> {
    let data = match &template.data {
        Some(path) => load_data(path)?,
        None => empty_context(),
    };
    TemplateEngine::new(template.strict).render(source, &data)
}
