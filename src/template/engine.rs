//! Template rendering with the include functions bound in
//!
//! Templates get minijinja's builtin filters plus `nindent`. Text helpers
//! that gotempl templates take from sprig map onto them as follows:
//!
//! | sprig | here |
//! |---|---|
//! | `indent 4 x` | `x \| indent(4, true)` |
//! | `nindent 4 x` | `x \| nindent(4)` |
//! | `trim`, `upper`, `lower`, `replace` | filters of the same name |
//! | `default "d" x` | `x \| default("d")` |
//! | `quote x` | `'"' ~ x ~ '"'` |
//! | `trimSuffix`, `trimPrefix`, `toYaml` | not available |
//!
//! The include functions already return YAML text, so `toYaml` is rarely
//! needed.

use minijinja::{context, AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior};
use tracing::debug;

use super::registry::{FunctionRegistry, IncludeFunction};

/// Options for the template environment
#[derive(Debug, Clone)]
pub struct TemplateOptions {
    /// Keep the final newline of the template source in the output
    pub keep_trailing_newline: bool,

    /// Fail on undefined variables instead of rendering them as empty
    pub strict_undefined: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            keep_trailing_newline: true,
            strict_undefined: true,
        }
    }
}

impl TemplateOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the trailing newline is kept
    pub fn with_keep_trailing_newline(mut self, keep: bool) -> Self {
        self.keep_trailing_newline = keep;
        self
    }

    /// Set whether undefined variables are errors
    pub fn with_strict_undefined(mut self, strict: bool) -> Self {
        self.strict_undefined = strict;
        self
    }
}

/// A template environment with every registered include function bound
///
/// The environment is built once and not modified afterwards.
pub struct Engine {
    env: Environment<'static>,
}

impl Engine {
    pub fn new(registry: &FunctionRegistry, options: &TemplateOptions) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(options.keep_trailing_newline);
        if options.strict_undefined {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        // Output is YAML/JSON, never HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("nindent", nindent);

        for function in registry.iter() {
            bind(&mut env, function.clone());
        }

        Self { env }
    }

    /// Render `source`, using `name` in error locations
    pub fn render(&self, name: &str, source: &str) -> Result<String, Error> {
        self.env.render_named_str(name, source, context! {})
    }
}

fn bind(env: &mut Environment<'static>, function: IncludeFunction) {
    let name = function.name.clone();
    if function.arity() == 1 {
        env.add_function(name, move |pattern: String| call(&function, "", &pattern));
    } else {
        env.add_function(name, move |selector: String, pattern: String| {
            call(&function, &selector, &pattern)
        });
    }
}

fn call(function: &IncludeFunction, selector: &str, pattern: &str) -> Result<String, Error> {
    debug!(function = %function.name, pattern, "calling include function");
    function.call(selector, pattern).map_err(|err| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("{}: {}", function.name, err),
        )
        .with_source(err)
    })
}

/// Start a new line and indent every non-empty line by `width` spaces
fn nindent(value: String, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::with_capacity(value.len() + width * 4);
    for line in value.lines() {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    out
}
