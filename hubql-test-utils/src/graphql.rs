//! GraphQL response builders
//!
//! Helpers for shaping the JSON a mock GitHub endpoint returns: the
//! `{ "data": ... }` envelope, connection pages, and error payloads.

use serde_json::{Map, Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the client posts to when its endpoint is `{uri}/graphql`
pub const GRAPHQL_PATH: &str = "/graphql";

/// Wrap `value` in a `data` envelope, nested under `keys`
///
/// `graphql_data(&["repository", "issue"], issue)` produces
/// `{"data": {"repository": {"issue": issue}}}`.
pub fn graphql_data(keys: &[&str], value: Value) -> Value {
  let nested = keys.iter().rev().fold(value, |inner, key| {
    let mut map = Map::new();
    map.insert((*key).to_string(), inner);
    Value::Object(map)
  });
  json!({ "data": nested })
}

/// An `errors` response carrying one error of the given GitHub type
pub fn graphql_errors(kind: &str, message: &str) -> Value {
  json!({
    "data": null,
    "errors": [{
      "type": kind,
      "message": message,
      "path": [],
      "locations": [{ "line": 1, "column": 1 }]
    }]
  })
}

/// GitHub's answer for an object that does not exist: the field at `keys`
/// is `null` and a `NOT_FOUND` error points at it
///
/// `graphql_not_found(&["repository", "issue"], msg)` produces
/// `{"data": {"repository": {"issue": null}}, "errors": [{"type": "NOT_FOUND", "path": ["repository", "issue"], ...}]}`.
pub fn graphql_not_found(keys: &[&str], message: &str) -> Value {
  let mut body = graphql_data(keys, Value::Null);
  body["errors"] = json!([{
    "type": "NOT_FOUND",
    "message": message,
    "path": keys,
    "locations": [{ "line": 2, "column": 3 }]
  }]);
  body
}

/// One connection page. A cursor means another page follows.
pub fn connection(nodes: Vec<Value>, end_cursor: Option<&str>) -> Value {
  let total = nodes.len();
  json!({
    "nodes": nodes,
    "pageInfo": {
      "hasNextPage": end_cursor.is_some(),
      "endCursor": end_cursor
    },
    "totalCount": total
  })
}

/// Mount a catch-all GraphQL responder on `server`
pub async fn mount_graphql(server: &MockServer, body: Value) {
  Mock::given(method("POST"))
    .and(path(GRAPHQL_PATH))
    .respond_with(ResponseTemplate::new(200).set_body_json(body))
    .mount(server)
    .await;
}
