//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::*;
use super::error::QueryError;
use super::lexer::{lex, Token};

/// Parse a selector expression into an AST
///
/// Only the first syntax error is reported; a selector is short enough that
/// later errors are rarely useful.
pub fn parse(input: &str) -> Result<Selector, QueryError> {
    let len = input.len();

    let token_iter = lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream =
        Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    selector_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => QueryError::from_rich(input, err),
            None => QueryError::Syntax {
                selector: input.to_string(),
                span: 0..len,
                message: "invalid selector".to_string(),
                expected: Vec::new(),
            },
        })
}

fn selector_parser<'a, I>() -> impl Parser<'a, I, Selector, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|selector| {
        // `.200` names a key, as in OpenAPI response codes
        let key = select! {
            Token::Ident(s) => s,
            Token::String(s) => s,
            Token::Integer(n) => n.to_string(),
        };

        // `[]`, `[n]` or `["key"]`
        let bracket = choice((
            select! { Token::Integer(n) => Segment::Index(n) },
            select! { Token::String(s) => Segment::Key(s) },
        ))
        .or_not()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
        .map(|segment| segment.unwrap_or(Segment::Iterate));

        let head = choice((key.map(Segment::Key), bracket.clone()));

        let tail = choice((just(Token::Dot).ignore_then(head.clone()), bracket));

        let path = just(Token::Dot)
            .ignore_then(head.or_not())
            .then(tail.clone().repeated().collect::<Vec<_>>())
            .map(|(first, rest)| {
                let mut segments: Vec<Segment> = first.into_iter().collect();
                segments.extend(rest);
                Term::Path(segments)
            });

        let group = selector
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
            .then(tail.repeated().collect::<Vec<_>>())
            .map(|(inner, segments)| Term::Group {
                inner: Box::new(inner),
                segments,
            });

        let term = choice((path, group));

        let stage = term
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|terms| Stage { terms });

        stage
            .separated_by(just(Token::Pipe))
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|stages| Selector { stages })
    })
}
