//! Inbound half of the codec.

use crate::error::{FemmError, Result};

use super::literal::{Value, parse_literal};

/// A decoded engine reply
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The engine returned nothing
    Empty,
    /// The reply parsed as a literal
    Value(Value),
    /// The reply was not a literal and is passed through untouched
    Raw(String),
}

impl Response {
    pub fn is_empty(&self) -> bool {
        matches!(self, Response::Empty)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Response::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Response::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value().and_then(Value::as_f64)
    }

    /// Numeric items of a sequence reply, or the single number of a scalar
    /// reply. Non-numeric items are skipped.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self.value() {
            Some(Value::Seq(items)) => items.iter().filter_map(Value::as_f64).collect(),
            Some(v) => v.as_f64().into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Response::Raw(s) => Some(s),
            _ => None,
        }
    }
}

/// Decode a raw reply.
///
/// A reply starting with `e` is the engine's error sentinel. Replies that are
/// not literals come back as [`Response::Raw`]. A one-element sequence is
/// unwrapped to its element.
pub fn decode(raw: &str) -> Result<Response> {
    if raw.is_empty() {
        return Ok(Response::Empty);
    }
    if raw.starts_with('e') {
        return Err(FemmError::Engine(raw.to_string()));
    }

    match parse_literal(raw) {
        Ok(Value::Seq(mut items)) if items.len() == 1 => {
            Ok(Response::Value(items.pop().unwrap_or(Value::None)))
        }
        Ok(value) => Ok(Response::Value(value)),
        Err(err) => {
            tracing::trace!(reply = raw, ?err, "reply is not a literal, passing through");
            Ok(Response::Raw(raw.to_string()))
        }
    }
}
