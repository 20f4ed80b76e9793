//! Error types for selector parsing and evaluation

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use super::lexer::{Span, Token};

#[derive(Error, Debug)]
pub enum QueryError {
    /// The selector expression could not be parsed
    #[error("invalid selector {selector:?} at {span:?}: {message}")]
    Syntax {
        selector: String,
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    /// The selector is valid but does not apply to the document
    #[error("cannot evaluate selector: {message}")]
    Eval { message: String },

    #[error("failed to decode document as YAML: {0}")]
    Decode(#[source] serde_yaml::Error),

    #[error("failed to encode query result as YAML: {0}")]
    Encode(#[source] serde_yaml::Error),
}

impl QueryError {
    pub(crate) fn eval(message: impl Into<String>) -> Self {
        Self::Eval {
            message: message.into(),
        }
    }

    /// Build a syntax error from a chumsky parse error
    pub(crate) fn from_rich(selector: &str, err: Rich<'_, Token>) -> Self {
        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        QueryError::Syntax {
            selector: selector.to_string(),
            span: err.span().into_range(),
            message,
            expected,
        }
    }

    /// Format a syntax error with the selector as source context using ariadne
    ///
    /// Returns `None` for errors that do not point into the selector.
    pub fn report(&self) -> Option<String> {
        let QueryError::Syntax {
            selector,
            span,
            message,
            expected,
        } = self
        else {
            return None;
        };

        let expected_str = if expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", expected.join(", "))
        };

        let mut buf = Vec::new();
        Report::build(ReportKind::Error, "selector", span.start)
            .with_config(Config::default().with_color(false))
            .with_message(message)
            .with_label(
                Label::new(("selector", span.clone()))
                    .with_message(format!("{}{}", message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write(("selector", Source::from(selector.as_str())), &mut buf)
            .ok()?;
        String::from_utf8(buf).ok()
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Dot => "'.'".to_string(),
        Token::Pipe => "'|'".to_string(),
        Token::Comma => "','".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Ident(s) => format!("key '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Integer(n) => format!("index {}", n),
        Token::Error(s) => format!("unrecognized input '{}'", s),
    }
}
