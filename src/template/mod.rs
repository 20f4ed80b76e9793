//! Template execution with include functions
//!
//! Templates use Jinja syntax. Include functions splice the content of other
//! files into the output:
//!
//! ```text
//! openapi: 3.0.3
//! paths:
//!   {{ includeOAPIPaths("paths/*.yaml") | indent(2) }}
//! components:
//!   schemas:{{ includeOAPISchemas("schemas/*.yaml") | nindent(4) }}
//! ```

mod engine;
mod registry;

pub use engine::{Engine, TemplateOptions};
pub use registry::{FunctionRegistry, IncludeFunction, RegistryError, Selection};
