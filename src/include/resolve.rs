//! Glob expansion into a sorted set of files

use std::path::PathBuf;

use glob::MatchOptions;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while expanding a pattern
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The pattern is not a valid glob
    #[error("invalid glob {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The pattern is valid but matched nothing
    #[error("no files matched pattern {pattern:?}")]
    NoMatch { pattern: String },

    /// A directory could not be read while expanding the pattern
    #[error("cannot expand pattern {pattern:?}: {source}")]
    Unreadable {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },
}

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Expand `pattern` into the files it matches, sorted by path string
///
/// `**` has no recursive meaning and matches like `*`.
pub fn resolve(pattern: &str) -> Result<Vec<PathBuf>, ResolveError> {
    let flattened = collapse_wildcards(pattern);

    let entries = glob::glob_with(&flattened, OPTIONS).map_err(|source| {
        ResolveError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    })?;

    let mut paths = entries
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ResolveError::Unreadable {
            pattern: pattern.to_string(),
            source,
        })?;

    if paths.is_empty() {
        return Err(ResolveError::NoMatch {
            pattern: pattern.to_string(),
        });
    }

    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    debug!(pattern, matched = paths.len(), "resolved pattern");
    Ok(paths)
}

/// Collapse runs of `*` into one, turning `**` into a plain wildcard
fn collapse_wildcards(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut previous_star = false;
    for c in pattern.chars() {
        if c == '*' && previous_star {
            continue;
        }
        previous_star = c == '*';
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x: 1\n").unwrap();
    }

    fn pattern(dir: &TempDir, rest: &str) -> String {
        format!(
            "{}/{}",
            glob::Pattern::escape(&dir.path().to_string_lossy()),
            rest
        )
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_collapse_wildcards() {
        assert_eq!(collapse_wildcards("a/**/b*.yaml"), "a/*/b*.yaml");
        assert_eq!(collapse_wildcards("***"), "*");
        assert_eq!(collapse_wildcards("plain.yaml"), "plain.yaml");
    }

    #[test]
    fn test_matches_are_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.yaml", "c.yaml", "a.yaml", "B.yaml"] {
            touch(&dir, name);
        }
        let paths = resolve(&pattern(&dir, "*.yaml")).unwrap();
        assert_eq!(names(&paths), vec!["B.yaml", "a.yaml", "b.yaml", "c.yaml"]);
    }

    #[test]
    fn test_question_mark_and_class() {
        let dir = TempDir::new().unwrap();
        for name in ["v1.yaml", "v2.yaml", "v10.yaml", "vx.yaml"] {
            touch(&dir, name);
        }
        assert_eq!(
            names(&resolve(&pattern(&dir, "v?.yaml")).unwrap()),
            vec!["v1.yaml", "v2.yaml", "vx.yaml"]
        );
        assert_eq!(
            names(&resolve(&pattern(&dir, "v[0-9].yaml")).unwrap()),
            vec!["v1.yaml", "v2.yaml"]
        );
    }

    #[test]
    fn test_literal_path() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "openapi.yaml");
        let paths = resolve(&pattern(&dir, "openapi.yaml")).unwrap();
        assert_eq!(paths, vec![dir.path().join("openapi.yaml")]);
    }

    #[test]
    fn test_no_match() {
        let dir = TempDir::new().unwrap();
        let err = resolve(&pattern(&dir, "*.json")).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch { .. }));
        assert!(err.to_string().contains("*.json"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            resolve("schemas/[unclosed"),
            Err(ResolveError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_double_star_does_not_recurse() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "top.yaml");
        touch(&dir, "nested/deep.yaml");
        let paths = resolve(&pattern(&dir, "**.yaml")).unwrap();
        assert_eq!(names(&paths), vec!["top.yaml"]);
    }

    #[test]
    fn test_wildcard_does_not_cross_directories() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "nested/deep.yaml");
        assert!(matches!(
            resolve(&pattern(&dir, "*deep.yaml")),
            Err(ResolveError::NoMatch { .. })
        ));
        assert_eq!(
            names(&resolve(&pattern(&dir, "*/deep.yaml")).unwrap()),
            vec!["deep.yaml"]
        );
    }
}
