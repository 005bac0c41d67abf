//! `mdocx render` command implementation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use mdocx_config::StylesConfig;
use mdocx_docx::{StyleNames, WordBuilder};
use mdocx_renderer::render_document;

use super::source::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,

    /// Output path (default: input path with .xml extension).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, rendering or writing the document fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let path = self.output_path()?;
        output.info(&format!("Converting {}...", self.source.input.display()));

        let (config, document) = self.source.load()?;
        let mut builder = WordBuilder::new();
        render_document(&mut builder, &document)?;

        let mut writer = BufWriter::new(File::create(&path)?);
        builder
            .into_document()
            .write_flat_opc(&style_names(&config.styles), &mut writer)?;
        writer.flush()?;

        output.success(&format!("Wrote {}", path.display()));
        Ok(())
    }

    fn output_path(&self) -> Result<PathBuf, CliError> {
        let path = self
            .output
            .clone()
            .unwrap_or_else(|| self.source.input.with_extension("xml"));
        if path == self.source.input {
            return Err(CliError::Validation(format!(
                "output {} would overwrite the input",
                path.display()
            )));
        }
        Ok(path)
    }
}

fn style_names(styles: &StylesConfig) -> StyleNames {
    StyleNames {
        code_block: styles.code_block.clone(),
        block_quote: styles.block_quote.clone(),
        inline_code: styles.inline_code.clone(),
        hyperlink: styles.hyperlink.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        render: RenderArgs,
    }

    fn args(dir: &Path, extra: &[&str]) -> RenderArgs {
        let config = dir.join("mdocx.toml");
        if !config.exists() {
            std::fs::write(&config, "").unwrap();
        }
        let mut argv = vec![
            "mdocx".to_owned(),
            "-c".to_owned(),
            config.display().to_string(),
        ];
        argv.extend(extra.iter().map(|arg| (*arg).to_owned()));
        TestCli::parse_from(argv).render
    }

    #[test]
    fn test_render_writes_default_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.md");
        std::fs::write(&input, "# Report\n\n- one\n- two\n").unwrap();

        args(dir.path(), &[input.to_str().unwrap()])
            .execute(&Output::new())
            .unwrap();

        let xml = std::fs::read_to_string(dir.path().join("report.xml")).unwrap();
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains("<w:numId w:val=\"1\"/>"));
    }

    #[test]
    fn test_render_expands_template_data() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("letter.md");
        let data = dir.path().join("data.yaml");
        let out = dir.path().join("out.xml");
        std::fs::write(&input, "Dear {{ name }},").unwrap();
        std::fs::write(&data, "name: Grace\n").unwrap();

        args(
            dir.path(),
            &[
                input.to_str().unwrap(),
                "--data",
                data.to_str().unwrap(),
                "-o",
                out.to_str().unwrap(),
            ],
        )
        .execute(&Output::new())
        .unwrap();

        let xml = std::fs::read_to_string(out).unwrap();
        assert!(xml.contains("Dear Grace,"));
    }

    #[test]
    fn test_render_without_template_keeps_braces() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.md");
        std::fs::write(&input, "Use {{ braces }} literally").unwrap();

        args(dir.path(), &[input.to_str().unwrap(), "--no-template"])
            .execute(&Output::new())
            .unwrap();

        let xml = std::fs::read_to_string(dir.path().join("raw.xml")).unwrap();
        assert!(xml.contains("Use {{ braces }} literally"));
    }

    #[test]
    fn test_undefined_template_variable_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.md");
        std::fs::write(&input, "Hello {{ nobody }}").unwrap();

        let result = args(dir.path(), &[input.to_str().unwrap()]).execute(&Output::new());
        assert!(matches!(result, Err(CliError::Template(_))));
        assert!(!dir.path().join("broken.xml").exists());
    }

    #[test]
    fn test_output_may_not_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.xml");
        std::fs::write(&input, "text").unwrap();

        let result = args(dir.path(), &[input.to_str().unwrap()]).execute(&Output::new());
        assert!(matches!(result, Err(CliError::Validation(_))));
    }

    #[test]
    fn test_missing_input_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.md");

        let err = args(dir.path(), &[input.to_str().unwrap()])
            .execute(&Output::new())
            .unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }
}
