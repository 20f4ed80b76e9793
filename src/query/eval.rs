//! Evaluation of parsed selectors against YAML values
//!
//! Every expression maps one input value to a stream of output values. Key and
//! index lookups yield a single value, `[]` yields one value per element, and
//! `,` concatenates the streams of its alternatives.

use serde_yaml::{Mapping, Value};

use super::ast::{Segment, Selector, Stage, Term};
use super::error::QueryError;

/// Apply a selector to a single input value
pub fn evaluate(selector: &Selector, input: Value) -> Result<Vec<Value>, QueryError> {
    let mut values = vec![input];
    for stage in &selector.stages {
        let mut next = Vec::new();
        for value in &values {
            next.extend(eval_stage(stage, value)?);
        }
        values = next;
    }
    Ok(values)
}

fn eval_stage(stage: &Stage, input: &Value) -> Result<Vec<Value>, QueryError> {
    let mut out = Vec::new();
    for term in &stage.terms {
        out.extend(eval_term(term, input)?);
    }
    Ok(out)
}

fn eval_term(term: &Term, input: &Value) -> Result<Vec<Value>, QueryError> {
    match term {
        Term::Path(segments) => walk(vec![input.clone()], segments),
        Term::Group { inner, segments } => {
            let values = evaluate(inner, input.clone())?;
            walk(values, segments)
        }
    }
}

fn walk(mut values: Vec<Value>, segments: &[Segment]) -> Result<Vec<Value>, QueryError> {
    for segment in segments {
        let mut next = Vec::new();
        for value in &values {
            next.extend(apply_segment(segment, value)?);
        }
        values = next;
    }
    Ok(values)
}

fn apply_segment(segment: &Segment, value: &Value) -> Result<Vec<Value>, QueryError> {
    let value = untag(value);
    match (segment, value) {
        (Segment::Key(_) | Segment::Index(_), Value::Null) => Ok(vec![Value::Null]),
        (Segment::Iterate, Value::Null) => Ok(Vec::new()),

        (Segment::Key(key), Value::Mapping(map)) => Ok(vec![lookup_key(map, key)]),
        (Segment::Index(index), Value::Sequence(seq)) => {
            let resolved = if *index < 0 {
                seq.len().checked_sub(index.unsigned_abs() as usize)
            } else {
                Some(*index as usize)
            };
            Ok(vec![resolved
                .and_then(|i| seq.get(i))
                .cloned()
                .unwrap_or(Value::Null)])
        }
        (Segment::Iterate, Value::Sequence(seq)) => Ok(seq.clone()),
        (Segment::Iterate, Value::Mapping(map)) => Ok(map.values().cloned().collect()),

        (segment, other) => Err(QueryError::eval(format!(
            "cannot apply '{}' to {}",
            segment,
            kind_name(other)
        ))),
    }
}

/// Find `key` in `map`, matching non-string scalar keys by their text
///
/// YAML reads unquoted keys such as `200:` or `true:` as numbers and booleans,
/// so `.responses["200"]` has to compare against the rendered key.
fn lookup_key(map: &Mapping, key: &str) -> Value {
    if let Some(value) = map.get(Value::String(key.to_string())) {
        return value.clone();
    }
    map.iter()
        .find(|(k, _)| scalar_text(k).as_deref() == Some(key))
        .map(|(_, value)| value.clone())
        .unwrap_or(Value::Null)
}

fn scalar_text(value: &Value) -> Option<String> {
    match untag(value) {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Look through YAML tags such as `!include` when traversing
fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
