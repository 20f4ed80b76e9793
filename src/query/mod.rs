//! Selector language for extracting sub-documents from YAML/JSON text
//!
//! Selectors use yq-style path syntax:
//!
//! ```text
//! .components.schemas          // nested key lookup
//! .paths["/pets/{id}"]         // quoted keys
//! .servers[0], .servers[-1]    // indices, several outputs
//! .tags[] | .name              // iterate, then pipe into a path
//! ```
//!
//! Documents are decoded as YAML (which also covers JSON), every result is
//! encoded back to YAML text.

pub mod ast;
mod error;
mod eval;
mod grammar;
pub mod lexer;

pub use ast::{Segment, Selector, Stage, Term};
pub use error::QueryError;
pub use grammar::parse;

use serde::Deserialize;
use serde_yaml::Value;

/// Evaluate `selector` against one document's text
///
/// An empty selector returns the text unchanged. Otherwise each YAML document
/// in `document` is queried and every result is re-encoded as YAML. Results of
/// one document are concatenated in order, and `---` separates the output of
/// different documents so a multi-document file stays multi-document.
pub fn evaluate(selector: &str, document: &str) -> Result<String, QueryError> {
    if selector.is_empty() {
        return Ok(document.to_string());
    }

    let selector = parse(selector)?;

    if document.trim().is_empty() {
        return Ok(String::new());
    }

    let mut output = String::new();
    for doc in serde_yaml::Deserializer::from_str(document) {
        let value = Value::deserialize(doc).map_err(QueryError::Decode)?;
        let results = eval::evaluate(&selector, value)?;
        if results.is_empty() {
            continue;
        }
        if !output.is_empty() {
            output.push_str("---\n");
        }
        for result in results {
            output.push_str(&serde_yaml::to_string(&result).map_err(QueryError::Encode)?);
        }
    }
    Ok(output)
}
