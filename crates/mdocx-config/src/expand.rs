//! `${VAR}` and `${VAR:-default}` expansion in configuration strings.

use crate::ConfigError;

/// Variable that was referenced but is not set.
struct UnsetVar(String);

/// Expand environment variable references in `value`.
///
/// Only the braced forms are recognized; a value without `${` is returned
/// as is, so `$path` segments in URLs or file names survive untouched.
/// `field` names the config key in the error for an unset variable.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| match std::env::var(name) {
        Ok(found) => Ok(Some(found)),
        Err(_) => Err(UnsetVar(name.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var_in_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDOCX_TEST_DATA_DIR", "/srv/data");
        }
        let result = expand_env("${MDOCX_TEST_DATA_DIR}/vars.yaml", "template.data").unwrap();
        assert_eq!(result, "/srv/data/vars.yaml");
        unsafe {
            std::env::remove_var("MDOCX_TEST_DATA_DIR");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDOCX_TEST_CODE_STYLE");
        }
        let result = expand_env("${MDOCX_TEST_CODE_STYLE:-SourceCode}", "styles.code_block").unwrap();
        assert_eq!(result, "SourceCode");
    }

    #[test]
    fn test_expand_unset_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDOCX_TEST_UNSET");
        }
        let err = expand_env("${MDOCX_TEST_UNSET}", "styles.hyperlink").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("MDOCX_TEST_UNSET"));
        assert!(message.contains("styles.hyperlink"));
    }

    #[test]
    fn test_values_without_braces_unchanged() {
        assert_eq!(expand_env("Quote", "styles.block_quote").unwrap(), "Quote");
        assert_eq!(expand_env("$HOME/data.json", "template.data").unwrap(), "$HOME/data.json");
    }
}
