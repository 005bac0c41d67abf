//! Configuration management for mdocx.
//!
//! Parses `mdocx.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `template.data`
//! - `styles.*`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override GitHub Flavored Markdown extensions.
    pub gfm: Option<bool>,
    /// Override whether the source is rendered as a template.
    pub template_enabled: Option<bool>,
    /// Override the template data file.
    pub data: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdocx.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown parsing configuration.
    pub markdown: MarkdownConfig,
    /// Template configuration (data path is a relative string from TOML).
    template: TemplateConfigRaw,
    /// Output style names.
    pub styles: StylesConfig,

    /// Resolved template configuration (set after loading).
    #[serde(skip)]
    pub template_resolved: TemplateConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown parsing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Raw template configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TemplateConfigRaw {
    enabled: Option<bool>,
    strict: Option<bool>,
    data: Option<String>,
}

/// Resolved template configuration with an absolute data path.
#[derive(Debug)]
pub struct TemplateConfig {
    /// Whether sources are rendered as templates before parsing.
    pub enabled: bool,
    /// Whether undefined variables are errors.
    pub strict: bool,
    /// Data file providing the template context.
    pub data: Option<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strict: true,
            data: None,
        }
    }
}

/// Style ids used in the generated document.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Paragraph style of code block lines.
    pub code_block: String,
    /// Paragraph style of block quotes.
    pub block_quote: String,
    /// Character style of inline code.
    pub inline_code: String,
    /// Character style of hyperlinks.
    pub hyperlink: String,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            code_block: "SourceCode".to_owned(),
            block_quote: "Quote".to_owned(),
            inline_code: "VerbatimChar".to_owned(),
            hyperlink: "Hyperlink".to_owned(),
        }
    }
}

impl StylesConfig {
    /// Validate that every style id is usable as a `w:styleId`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a style id is empty or contains
    /// characters other than ASCII letters, digits, `-` and `_`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_style_id(&self.code_block, "styles.code_block")?;
        require_style_id(&self.block_quote, "styles.block_quote")?;
        require_style_id(&self.inline_code, "styles.inline_code")?;
        require_style_id(&self.hyperlink, "styles.hyperlink")?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`template.data`").
        field: String,
        /// Error message (e.g., "${`DATA_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a style id made of ASCII letters, digits, `-` and `_`.
fn require_style_id(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "{field} must contain only ASCII letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdocx.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "Discovered configuration file");
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(gfm) = settings.gfm {
            self.markdown.gfm = gfm;
        }
        if let Some(enabled) = settings.template_enabled {
            self.template_resolved.enabled = enabled;
        }
        if let Some(data) = &settings.data {
            self.template_resolved.data = Some(data.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.exists())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.styles.validate()?;
        if let Some(data) = &self.template.data {
            require_non_empty(data, "template.data")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref data) = self.template.data {
            self.template.data = Some(expand::expand_env(data, "template.data")?);
        }

        let styles = &mut self.styles;
        for (value, field) in [
            (&mut styles.code_block, "styles.code_block"),
            (&mut styles.block_quote, "styles.block_quote"),
            (&mut styles.inline_code, "styles.inline_code"),
            (&mut styles.hyperlink, "styles.hyperlink"),
        ] {
            *value = expand::expand_env(value, field)?;
        }

        Ok(())
    }

    /// Resolve the data path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = TemplateConfig::default();
        self.template_resolved = TemplateConfig {
            enabled: self.template.enabled.unwrap_or(defaults.enabled),
            strict: self.template.strict.unwrap_or(defaults.strict),
            data: self.template.data.as_deref().map(|data| config_dir.join(data)),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.markdown.gfm);
        assert!(config.template_resolved.enabled);
        assert!(config.template_resolved.strict);
        assert_eq!(config.template_resolved.data, None);
        assert_eq!(config.styles.code_block, "SourceCode");
        assert_eq!(config.styles.hyperlink, "Hyperlink");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.markdown.gfm);
        assert_eq!(config.styles.block_quote, "Quote");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[markdown]
gfm = false

[template]
enabled = false
strict = false
data = "vars.yaml"

[styles]
code_block = "Code"
inline_code = "CodeChar"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert!(!config.markdown.gfm);
        assert!(!config.template_resolved.enabled);
        assert!(!config.template_resolved.strict);
        assert_eq!(
            config.template_resolved.data,
            Some(PathBuf::from("/project/vars.yaml"))
        );
        assert_eq!(config.styles.code_block, "Code");
        assert_eq!(config.styles.inline_code, "CodeChar");
        assert_eq!(config.styles.block_quote, "Quote");
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/mdocx.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[template]\ndata = \"data/vars.json\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(
            config.template_resolved.data,
            Some(dir.path().join("data/vars.json"))
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[markdown]\ngfm = true\n[template]\nenabled = true\n").unwrap();

        let settings = CliSettings {
            gfm: Some(false),
            template_enabled: Some(false),
            data: Some(PathBuf::from("/other/data.toml")),
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(!config.markdown.gfm);
        assert!(!config.template_resolved.enabled);
        assert_eq!(
            config.template_resolved.data,
            Some(PathBuf::from("/other/data.toml"))
        );
    }

    #[test]
    fn test_invalid_style_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[styles]\nhyperlink = \"My Link\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("styles.hyperlink"));
    }

    #[test]
    fn test_empty_style_id_rejected() {
        let styles = StylesConfig {
            code_block: String::new(),
            ..StylesConfig::default()
        };
        let err = styles.validate().unwrap_err();
        assert!(err.to_string().contains("styles.code_block cannot be empty"));
    }

    #[test]
    fn test_unknown_env_var_in_data_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDOCX_TEST_MISSING_DATA");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[template]\ndata = \"${MDOCX_TEST_MISSING_DATA}\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "template.data"));
    }

    #[test]
    fn test_discover_from_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }
}
