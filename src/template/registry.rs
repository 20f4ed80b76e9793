//! Registry of include functions exposed to templates

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::include::{include, rewrite_refs, IncludeError};

/// Errors that can occur while building the registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two functions share a name
    #[error("duplicate function definition: {name}")]
    Duplicate { name: String },

    /// Function names must be usable as template identifiers
    #[error("invalid function name {name:?}: expected letters, digits and underscores")]
    InvalidName { name: String },
}

/// Where an include function gets its selector from
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Fixed when the function is defined; the template passes only a pattern
    Fixed(String),
    /// Passed by the template as the first argument, before the pattern
    Caller,
}

/// A named include function
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeFunction {
    pub name: String,
    pub selection: Selection,
    /// Strip file paths from `$ref` values in the result
    pub rewrite_refs: bool,
}

impl IncludeFunction {
    /// A function with a fixed selector
    pub fn fixed(name: impl Into<String>, selector: impl Into<String>, rewrite_refs: bool) -> Self {
        Self {
            name: name.into(),
            selection: Selection::Fixed(selector.into()),
            rewrite_refs,
        }
    }

    /// A function taking its selector from the template
    pub fn caller_selected(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selection: Selection::Caller,
            rewrite_refs: false,
        }
    }

    /// Number of arguments the template passes
    pub fn arity(&self) -> usize {
        match self.selection {
            Selection::Fixed(_) => 1,
            Selection::Caller => 2,
        }
    }

    /// Include the files matching `pattern`
    ///
    /// `selector` is only consulted for [`Selection::Caller`] functions.
    pub fn call(&self, selector: &str, pattern: &str) -> Result<String, IncludeError> {
        let selector = match &self.selection {
            Selection::Fixed(fixed) => fixed.as_str(),
            Selection::Caller => selector,
        };
        let content = include(selector, pattern)?;
        if self.rewrite_refs {
            Ok(rewrite_refs(&content).into_owned())
        } else {
            Ok(content)
        }
    }
}

impl fmt::Display for IncludeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selection {
            Selection::Fixed(selector) if selector.is_empty() => {
                write!(f, "{}(pattern) verbatim", self.name)?
            }
            Selection::Fixed(selector) => write!(f, "{}(pattern) selects {}", self.name, selector)?,
            Selection::Caller => write!(f, "{}(selector, pattern)", self.name)?,
        }
        if self.rewrite_refs {
            write!(f, ", rewrites $ref paths")?;
        }
        Ok(())
    }
}

/// Immutable set of include functions, keyed by name
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, IncludeFunction>,
}

impl FunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard include functions
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for function in [
            IncludeFunction::fixed("includeVerbatim", "", false),
            IncludeFunction::caller_selected("includeYQ"),
            IncludeFunction::fixed("includeOAPISchemas", ".components.schemas", true),
            IncludeFunction::fixed("includeOAPIPaths", ".paths", true),
            IncludeFunction::fixed("includeOAPIParameters", ".components.parameters", true),
        ] {
            registry
                .functions
                .insert(function.name.clone(), function);
        }
        registry
    }

    /// Register a function
    pub fn register(&mut self, function: IncludeFunction) -> Result<(), RegistryError> {
        if !is_identifier(&function.name) {
            return Err(RegistryError::InvalidName {
                name: function.name,
            });
        }
        if self.functions.contains_key(&function.name) {
            return Err(RegistryError::Duplicate {
                name: function.name,
            });
        }
        self.functions.insert(function.name.clone(), function);
        Ok(())
    }

    /// Get a function by name
    pub fn get(&self, name: &str) -> Option<&IncludeFunction> {
        self.functions.get(name)
    }

    /// All functions, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &IncludeFunction> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
