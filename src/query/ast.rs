//! AST types for selector expressions

use std::fmt;

/// A parsed selector: stages joined by `|`
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub stages: Vec<Stage>,
}

/// Comma-separated alternatives whose outputs are concatenated
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `.`, `.a.b`, `.[0]`, `.a[]`
    Path(Vec<Segment>),
    /// `( selector )` followed by optional path segments
    Group {
        inner: Box<Selector>,
        segments: Vec<Segment>,
    },
}

/// One traversal step
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Key(String),
    Index(i64),
    Iterate,
}

impl Selector {
    /// The selector `.`, which yields its input unchanged
    pub fn identity() -> Self {
        Self {
            stages: vec![Stage {
                terms: vec![Term::Path(Vec::new())],
            }],
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, ".{key}"),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::Iterate => write!(f, "[]"),
        }
    }
}
