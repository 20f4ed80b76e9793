//! oapi-templ - assemble one document from many through templates
//!
//! A template calls include functions that expand a glob, optionally select a
//! sub-document from every matched YAML/JSON file, and splice the joined
//! results into the output. The OpenAPI flavoured includes also turn
//! cross-file `$ref` values into document-local fragments.
//!
//! # Example
//!
//! ```rust
//! use oapi_templ::assemble;
//!
//! let out = assemble("api.yaml", "openapi: 3.0.3\n").unwrap();
//! assert_eq!(out, "openapi: 3.0.3\n");
//! ```

pub mod config;
pub mod include;
pub mod query;
pub mod template;

pub use config::{Config, ConfigError};
pub use include::{include, resolve, rewrite_refs, IncludeError, ResolveError};
pub use query::QueryError;
pub use template::{Engine, FunctionRegistry, IncludeFunction, TemplateOptions};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Errors that can occur while assembling a document
#[derive(Debug, Error)]
pub enum AssembleError {
    /// Template parsing or execution failed, including failed includes
    #[error("failed to execute template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("failed to read template file {}: {source}", path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AssembleError {
    /// The failed include behind this error, if any
    pub fn include_error(&self) -> Option<&IncludeError> {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = source {
            if let Some(include) = err.downcast_ref::<IncludeError>() {
                return Some(include);
            }
            source = err.source();
        }
        None
    }

    /// The selector error behind this error, if any
    pub fn query_error(&self) -> Option<&QueryError> {
        self.include_error().and_then(IncludeError::query_error)
    }
}

/// Configuration for assembling documents
#[derive(Debug, Clone)]
pub struct AssembleConfig {
    /// Include functions available to templates
    pub registry: FunctionRegistry,
    /// Template environment options
    pub template: TemplateOptions,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            registry: FunctionRegistry::builtin(),
            template: TemplateOptions::default(),
        }
    }
}

impl AssembleConfig {
    /// Create a configuration with the builtin functions and default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loaded configuration file
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            registry: config.registry()?,
            template: config.template.clone(),
        })
    }

    /// Set the function registry
    pub fn with_registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the template options
    pub fn with_template_options(mut self, options: TemplateOptions) -> Self {
        self.template = options;
        self
    }
}

/// Assemble a template with the builtin functions
pub fn assemble(name: &str, source: &str) -> Result<String, AssembleError> {
    assemble_with_config(name, source, &AssembleConfig::new())
}

/// Assemble a template with a custom configuration
///
/// `name` identifies the template in error messages.
pub fn assemble_with_config(
    name: &str,
    source: &str,
    config: &AssembleConfig,
) -> Result<String, AssembleError> {
    let engine = Engine::new(&config.registry, &config.template);
    Ok(engine.render(name, source)?)
}

/// Assemble the template at `template` and write the result to `output`
///
/// The output file is only written once the whole template rendered, so a
/// failed run leaves no partial document behind.
pub fn assemble_file(
    template: &Path,
    output: &Path,
    config: &AssembleConfig,
) -> Result<(), AssembleError> {
    let source = fs::read_to_string(template).map_err(|source| AssembleError::ReadTemplate {
        path: template.to_path_buf(),
        source,
    })?;

    let name = template.to_string_lossy();
    let document = assemble_with_config(&name, &source, config)?;

    fs::write(output, &document).map_err(|source| AssembleError::WriteOutput {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        template = %template.display(),
        output = %output.display(),
        bytes = document.len(),
        "assembled document"
    );
    Ok(())
}
