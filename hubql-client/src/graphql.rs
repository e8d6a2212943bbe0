//! # GraphQL Wire Format
//!
//! Request and response envelopes for GitHub's GraphQL endpoint, plus the
//! helpers that walk a response's `data` tree down to the node an operation
//! asked for.
//!
//! A key that is missing from the response is reported as
//! [`Error::MissingField`]; an explicit `null` anywhere on the path means the
//! object is absent and yields `None`.
//!
//! GitHub reports a missing object twice: the field resolves to `null` and
//! the `errors` array carries a `NOT_FOUND` entry whose `path` names it.
//! Lookups read that pair as absence; everything else keeps the error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// A GraphQL document together with its variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
  pub query: String,
  pub variables: Map<String, Value>,
}

impl GraphQlRequest {
  /// Create a request with no variables
  pub fn new(query: impl Into<String>) -> Self {
    Self {
      query: query.into(),
      variables: Map::new(),
    }
  }

  /// Bind a variable
  pub fn var(mut self, name: &str, value: impl Into<Value>) -> Self {
    self.variables.insert(name.to_string(), value.into());
    self
  }

  /// Bind a variable from any serializable value, typically a mutation input
  pub fn try_var<T: Serialize + ?Sized>(self, name: &str, value: &T) -> Result<Self> {
    let value = serde_json::to_value(value)?;
    Ok(self.var(name, value))
  }
}

/// Location of a GraphQL error inside the submitted document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
  pub line: u32,
  pub column: u32,
}

/// One entry of the `errors` array GitHub returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
  pub message: String,
  /// GitHub's error classification, e.g. `NOT_FOUND` or `FORBIDDEN`
  #[serde(rename = "type", default)]
  pub kind: Option<String>,
  #[serde(default)]
  pub path: Vec<Value>,
  #[serde(default)]
  pub locations: Vec<ErrorLocation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub extensions: Option<Value>,
}

/// Top-level response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
  #[serde(default)]
  pub data: Option<Value>,
  #[serde(default)]
  pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
  /// Split the envelope into its data, failing on any reported error
  pub(crate) fn into_data(self) -> Result<Value> {
    if !self.errors.is_empty() {
      return Err(Error::from_graphql(self.errors));
    }
    self.data.ok_or_else(|| Error::MissingField {
      path: "data".to_string(),
    })
  }

  /// Like [`into_data`](Self::into_data), but keeps the data when every
  /// error is a `NOT_FOUND` for a field that resolved to `null`
  pub(crate) fn into_lookup_data(self) -> Result<Value> {
    match self.data {
      Some(data) if !self.errors.is_empty() && self.errors.iter().all(|e| is_absent(&data, e)) => {
        debug!("Treating {} NOT_FOUND error(s) as absent objects", self.errors.len());
        Ok(data)
      }
      data => Self { data, errors: self.errors }.into_data(),
    }
  }
}

/// Whether `error` is a `NOT_FOUND` whose path ends at a `null` in `data`
fn is_absent(data: &Value, error: &GraphQlError) -> bool {
  if error.kind.as_deref() != Some("NOT_FOUND") || error.path.is_empty() {
    return false;
  }

  let mut current = data;
  for segment in &error.path {
    if current.is_null() {
      return true;
    }
    let next = match segment {
      Value::String(key) => current.get(key.as_str()),
      Value::Number(index) => index.as_u64().and_then(|i| current.get(usize::try_from(i).ok()?)),
      _ => None,
    };
    match next {
      Some(next) => current = next,
      None => return false,
    }
  }
  current.is_null()
}

/// Walk `path` from the root of `data`
pub(crate) fn select<'a>(data: &'a Value, path: &[&str]) -> Result<Option<&'a Value>> {
  let mut current = data;
  for (depth, key) in path.iter().enumerate() {
    if current.is_null() {
      return Ok(None);
    }
    current = current.get(*key).ok_or_else(|| Error::MissingField {
      path: path[..=depth].join("."),
    })?;
  }

  Ok(if current.is_null() { None } else { Some(current) })
}

/// Decode the node at `path`, `None` when it is null
pub(crate) fn decode<T: DeserializeOwned>(data: &Value, path: &[&str]) -> Result<Option<T>> {
  match select(data, path)? {
    Some(node) => Ok(Some(T::deserialize(node)?)),
    None => Ok(None),
  }
}

/// Decode a mutation payload that must be present
pub(crate) fn payload<T: DeserializeOwned>(data: &Value, path: &[&str]) -> Result<T> {
  decode(data, path)?.ok_or_else(|| Error::EmptyPayload {
    field: path.join("."),
  })
}
