//! # GitHub GraphQL Client
//!
//! The façade every operation hangs off, and the single transport path all
//! of them share: POST a document to the GraphQL endpoint, map the HTTP
//! status, unwrap the response envelope.

use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::{ClientConfig, GitHubAuth};
use crate::consts::ACCEPT;
use crate::error::{Error, Result};
use crate::graphql::{GraphQlRequest, GraphQlResponse};

/// Longest response body kept in an [`Error::Status`]
const MAX_ERROR_BODY: usize = 4096;

/// Represents a GitHub GraphQL API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
  pub(crate) client: Client,
  pub(crate) endpoint: String,
  pub(crate) auth: GitHubAuth,
  pub(crate) user_agent: String,
  pub(crate) page_size: u32,
}

impl GitHubClient {
  /// Create a new GitHub client.
  ///
  /// The token is not checked here; an empty or invalid token surfaces as an
  /// [`Error::Unauthorized`] on the first call.
  pub fn new(config: ClientConfig) -> Result<Self> {
    config.validate()?;
    let client = Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

    let page_size = config.effective_page_size();
    Ok(Self {
      client,
      endpoint: config.endpoint,
      auth: GitHubAuth::new(config.auth.token),
      user_agent: config.user_agent,
      page_size,
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  pub fn page_size(&self) -> u32 {
    self.page_size
  }

  /// Send one GraphQL request and return its `data` tree
  pub async fn execute(&self, request: &GraphQlRequest) -> Result<Value> {
    self.send(request).await?.into_data()
  }

  /// Send a query that looks objects up; `NOT_FOUND` errors for fields that
  /// resolved to `null` leave the `null` in place instead of failing
  pub(crate) async fn execute_lookup(&self, request: &GraphQlRequest) -> Result<Value> {
    self.send(request).await?.into_lookup_data()
  }

  async fn send(&self, request: &GraphQlRequest) -> Result<GraphQlResponse> {
    trace!("GraphQL request: {}", request.query);

    let mut builder = self
      .client
      .post(&self.endpoint)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, &self.user_agent)
      .json(request);
    if self.auth.has_token() {
      builder = builder.bearer_auth(&self.auth.token);
    }

    let response = builder.send().await.map_err(|source| Error::Transport {
      endpoint: self.endpoint.clone(),
      source,
    })?;

    let status = response.status();
    debug!("GitHub API response status: {}", status);

    let body = response.text().await.map_err(|source| Error::Transport {
      endpoint: self.endpoint.clone(),
      source,
    })?;

    match status {
      s if s.is_success() => {
        trace!("GitHub API response body: {}", body);
        Ok(serde_json::from_str(&body)?)
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        warn!("Authentication failed when accessing GitHub API");
        Err(Error::Unauthorized {
          status,
          message: error_message(&body),
        })
      }
      _ => {
        warn!("Unexpected GitHub API error: HTTP {}", status);
        Err(Error::Status {
          status,
          body: truncate(body),
        })
      }
    }
  }

  /// Test the GitHub connection by fetching the authenticated user
  pub async fn test_connection(&self) -> Result<bool> {
    match self.execute(&GraphQlRequest::new("query { viewer { login } }")).await {
      Ok(_) => Ok(true),
      Err(Error::Unauthorized { .. }) => Ok(false),
      Err(e) => Err(e),
    }
  }
}

/// Create a GitHub client from a token and otherwise default settings
pub fn create_github_client(token: &str) -> Result<GitHubClient> {
  GitHubClient::new(ClientConfig::with_token(token))
}

/// Pull GitHub's `message` out of an error body, falling back to the body
fn error_message(body: &str) -> String {
  serde_json::from_str::<Value>(body)
    .ok()
    .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
    .unwrap_or_else(|| truncate(body.to_string()))
}

fn truncate(mut body: String) -> String {
  if body.len() > MAX_ERROR_BODY {
    let mut cut = MAX_ERROR_BODY;
    while !body.is_char_boundary(cut) {
      cut -= 1;
    }
    body.truncate(cut);
    body.push('…');
  }
  body
}
