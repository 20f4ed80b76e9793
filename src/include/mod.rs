//! File inclusion: glob expansion, per-file selection and concatenation

mod refs;
mod resolve;

pub use refs::rewrite_refs;
pub use resolve::{resolve, ResolveError};

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::query::{self, QueryError};

/// Errors that abort an include
#[derive(Debug, Error)]
pub enum IncludeError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A matched file could not be read as UTF-8 text
    #[error("failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selector failed on a matched file
    #[error("include {} failed: {source}", path.display())]
    Query {
        path: PathBuf,
        #[source]
        source: QueryError,
    },
}

impl IncludeError {
    /// The query error behind this failure, if any
    pub fn query_error(&self) -> Option<&QueryError> {
        match self {
            IncludeError::Query { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Include every file matching `pattern`, filtered through `selector`
///
/// Files are processed in ascending path order. Each result is trimmed,
/// empty results are dropped and the rest are joined with a newline. The
/// first failure aborts the whole include.
pub fn include(selector: &str, pattern: &str) -> Result<String, IncludeError> {
    let paths = resolve(pattern)?;

    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) => return Err(IncludeError::FileRead { path, source }),
        };

        let part = match query::evaluate(selector, &content) {
            Ok(part) => part,
            Err(source) => return Err(IncludeError::Query { path, source }),
        };

        let part = part.trim();
        if part.is_empty() {
            debug!(path = %path.display(), "skipping empty result");
            continue;
        }
        debug!(path = %path.display(), bytes = part.len(), "included file");
        parts.push(part.to_string());
    }

    Ok(parts.join("\n"))
}
