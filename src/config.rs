//! Configuration file support
//!
//! A TOML file can add include functions and tune the template environment:
//!
//! ```toml
//! [template]
//! keep_trailing_newline = true
//! strict_undefined = true
//!
//! [[function]]
//! name = "includeOAPIResponses"
//! selector = ".components.responses"
//! rewrite_refs = true
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::template::{FunctionRegistry, IncludeFunction, RegistryError, TemplateOptions};

/// Errors that can occur when loading or applying a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid function in config: {0}")]
    Registry(#[from] RegistryError),
}

/// Settings loaded from a configuration file
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub template: TemplateOptions,
    /// Extra include functions, in file order
    pub functions: Vec<IncludeFunction>,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    template: Option<TomlTemplate>,
    #[serde(default)]
    function: Vec<TomlFunction>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTemplate {
    keep_trailing_newline: Option<bool>,
    strict_undefined: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlFunction {
    name: String,
    selector: String,
    #[serde(default)]
    rewrite_refs: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        let defaults = TemplateOptions::default();
        let template = match parsed.template {
            Some(t) => TemplateOptions {
                keep_trailing_newline: t
                    .keep_trailing_newline
                    .unwrap_or(defaults.keep_trailing_newline),
                strict_undefined: t.strict_undefined.unwrap_or(defaults.strict_undefined),
            },
            None => defaults,
        };

        let functions = parsed
            .function
            .into_iter()
            .map(|f| IncludeFunction::fixed(f.name, f.selector, f.rewrite_refs))
            .collect();

        Ok(Config {
            template,
            functions,
        })
    }

    /// The builtin functions plus the configured ones
    ///
    /// Fails if a configured function reuses a name.
    pub fn registry(&self) -> Result<FunctionRegistry, ConfigError> {
        let mut registry = FunctionRegistry::builtin();
        for function in &self.functions {
            registry.register(function.clone())?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Selection;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert!(config.template.keep_trailing_newline);
        assert!(config.template.strict_undefined);
        assert!(config.functions.is_empty());
        assert_eq!(config.registry().unwrap().len(), 5);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_str(
            r#"
[template]
strict_undefined = false

[[function]]
name = "includeOAPIResponses"
selector = ".components.responses"
rewrite_refs = true

[[function]]
name = "includeExamples"
selector = ".examples"
"#,
        )
        .unwrap();

        assert!(config.template.keep_trailing_newline);
        assert!(!config.template.strict_undefined);
        assert_eq!(config.functions.len(), 2);
        assert_eq!(
            config.functions[0].selection,
            Selection::Fixed(".components.responses".to_string())
        );
        assert!(config.functions[0].rewrite_refs);
        assert!(!config.functions[1].rewrite_refs);

        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 7);
        assert!(registry.get("includeExamples").is_some());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = Config::from_str("[[function]]\nname = \"a\"\nselector = \".a\"\nrewrite = true\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_selector_rejected() {
        let result = Config::from_str("[[function]]\nname = \"a\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_duplicate_function_rejected() {
        let config = Config::from_str(
            "[[function]]\nname = \"includeOAPIPaths\"\nselector = \".webhooks\"\n",
        )
        .unwrap();
        assert!(matches!(
            config.registry(),
            Err(ConfigError::Registry(RegistryError::Duplicate { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
