//! # Client Errors
//!
//! Every failure the client can report, from the HTTP layer up to responses
//! whose shape does not match the record being decoded.

use reqwest::StatusCode;
use thiserror::Error;

use crate::graphql::GraphQlError;

/// Result alias used by every client operation
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the GitHub GraphQL client
#[derive(Debug, Error)]
pub enum Error {
  /// The request could not be sent or the response body could not be read
  #[error("request to {endpoint} failed: {source}")]
  Transport {
    endpoint: String,
    #[source]
    source: reqwest::Error,
  },

  /// GitHub rejected the credentials
  #[error("Authentication failed (HTTP {status}): {message}. Please check your GitHub token.")]
  Unauthorized { status: StatusCode, message: String },

  /// Any other non-success HTTP status
  #[error("Unexpected error: HTTP {status} - {body}")]
  Status { status: StatusCode, body: String },

  /// The response carried a GraphQL `errors` array
  #[error("GitHub GraphQL error: {message}")]
  GraphQl { message: String, errors: Vec<GraphQlError> },

  /// The response JSON did not match the expected record
  #[error("Failed to decode GitHub response: {0}")]
  Decode(#[from] serde_json::Error),

  /// An expected key was absent from the response
  #[error("GitHub response is missing `{path}`")]
  MissingField { path: String },

  /// A mutation returned `null` where a payload was required
  #[error("GitHub returned an empty payload for `{field}`")]
  EmptyPayload { field: String },

  /// The client configuration could not be loaded or is invalid
  #[error("Invalid client configuration: {0}")]
  Config(String),

  /// A caller-supplied value could not be parsed
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),
}

impl Error {
  /// Build a GraphQL error from the server's error list
  pub(crate) fn from_graphql(errors: Vec<GraphQlError>) -> Self {
    let message = match errors.as_slice() {
      [] => "unknown error".to_string(),
      [only] => only.message.clone(),
      [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    };
    Self::GraphQl { message, errors }
  }

  /// Whether GitHub reported the requested object as missing
  pub fn is_not_found(&self) -> bool {
    match self {
      Self::GraphQl { errors, .. } => errors.iter().any(|e| e.kind.as_deref() == Some("NOT_FOUND")),
      Self::Status { status, .. } => *status == StatusCode::NOT_FOUND,
      _ => false,
    }
  }

  /// The remote error payload, if the server sent one
  pub fn remote_errors(&self) -> &[GraphQlError] {
    match self {
      Self::GraphQl { errors, .. } => errors,
      _ => &[],
    }
  }

  /// Whether the error came from the HTTP layer rather than the response body
  pub fn is_transport(&self) -> bool {
    matches!(
      self,
      Self::Transport { .. } | Self::Unauthorized { .. } | Self::Status { .. }
    )
  }
}
