//! `mdocx ops` command implementation.

use clap::Args;
use console::Term;
use mdocx_renderer::{RecordingBuilder, render_document};

use super::source::SourceArgs;
use crate::error::CliError;

/// Arguments for the ops command.
#[derive(Args)]
pub(crate) struct OpsArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

impl OpsArgs {
    /// Execute the ops command, printing one operation per line to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or stdout fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let (_, document) = self.source.load()?;

        let mut builder = RecordingBuilder::new();
        let Ok(()) = render_document(&mut builder, &document);

        let stdout = Term::stdout();
        for operation in builder.operations() {
            stdout.write_line(&operation.to_string())?;
        }
        Ok(())
    }
}
