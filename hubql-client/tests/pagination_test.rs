//! End-to-end pagination behaviour through the public client API, against a
//! mock GraphQL endpoint.

use hubql_client::{ClientConfig, Error, GitHubClient, IssueFilter, RepoRef, create_github_client};
use hubql_test_utils::{connection, fixtures, graphql_data};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, page_size: u32) -> anyhow::Result<GitHubClient> {
  let mut config = ClientConfig::with_token("test_token");
  config.endpoint = format!("{}/graphql", server.uri());
  config.page_size = page_size;
  Ok(GitHubClient::new(config)?)
}

fn repo() -> RepoRef {
  RepoRef::new("octocat", "Hello-World")
}

async fn mount_issue_page(server: &MockServer, after: Option<&str>, numbers: &[u32], next: Option<&str>) {
  Mock::given(method("POST"))
    .and(path("/graphql"))
    .and(body_partial_json(json!({ "variables": { "after": after } })))
    .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
      &["repository", "issues"],
      connection(numbers.iter().map(|n| fixtures::issue(*n)).collect(), next),
    )))
    .expect(1)
    .mount(server)
    .await;
}

#[tokio::test]
async fn test_every_item_of_every_page_once_in_order() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let client = client_for(&server, 2)?;

  mount_issue_page(&server, None, &[1, 2], Some("c2")).await;
  mount_issue_page(&server, Some("c2"), &[3, 4], Some("c4")).await;
  mount_issue_page(&server, Some("c4"), &[5], None).await;

  let issues = client.issues(&repo(), IssueFilter::default())?.collect_all().await?;
  let numbers: Vec<u32> = issues.iter().map(|i| i.number).collect();
  assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

  let requests = server.received_requests().await.unwrap_or_default();
  assert_eq!(requests.len(), 3);
  for request in &requests {
    let body: serde_json::Value = serde_json::from_slice(&request.body)?;
    assert_eq!(body["variables"]["first"], 2);
  }

  Ok(())
}

#[tokio::test]
async fn test_no_request_after_last_page() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let client = client_for(&server, 50)?;

  mount_issue_page(&server, None, &[7, 8], None).await;

  let mut stream = client.issues(&repo(), IssueFilter::default())?;
  assert_eq!(stream.try_next().await?.map(|i| i.number), Some(7));
  assert_eq!(stream.try_next().await?.map(|i| i.number), Some(8));
  for _ in 0..3 {
    assert!(stream.try_next().await?.is_none());
  }
  assert_eq!(stream.pages_fetched(), 1);

  Ok(())
}

#[tokio::test]
async fn test_mid_sequence_failure_ends_iteration() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let client = client_for(&server, 50)?;

  mount_issue_page(&server, None, &[1, 2], Some("c2")).await;
  Mock::given(method("POST"))
    .and(path("/graphql"))
    .and(body_partial_json(json!({ "variables": { "after": "c2" } })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "data": null,
      "errors": [{ "type": "RATE_LIMITED", "message": "API rate limit exceeded" }]
    })))
    .expect(1)
    .mount(&server)
    .await;

  let mut stream = client.issues(&repo(), IssueFilter::default())?;
  let mut seen = Vec::new();
  let err = loop {
    match stream.try_next().await {
      Ok(Some(issue)) => seen.push(issue.number),
      Ok(None) => panic!("stream ended without reporting the failure"),
      Err(e) => break e,
    }
  };

  assert_eq!(seen, vec![1, 2]);
  assert!(matches!(err, Error::GraphQl { .. }));
  assert_eq!(err.remote_errors()[0].kind.as_deref(), Some("RATE_LIMITED"));
  assert!(stream.try_next().await?.is_none());
  assert!(stream.is_terminated());

  Ok(())
}

#[tokio::test]
async fn test_empty_first_page() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let client = client_for(&server, 50)?;

  mount_issue_page(&server, None, &[], None).await;

  let issues = client.issues(&repo(), IssueFilter::default())?.collect_all().await?;
  assert!(issues.is_empty());

  Ok(())
}

#[tokio::test]
async fn test_nothing_is_requested_until_first_pull() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let client = client_for(&server, 50)?;

  let stream = client.labels(&repo());
  assert_eq!(stream.pages_fetched(), 0);
  drop(stream);

  assert!(server.received_requests().await.unwrap_or_default().is_empty());

  Ok(())
}

#[test]
fn test_client_without_token_constructs() {
  assert!(create_github_client("").is_ok());
  assert!(GitHubClient::new(ClientConfig::default()).is_ok());
}

#[test]
fn test_page_size_is_clamped() -> anyhow::Result<()> {
  let mut config = ClientConfig::default();
  config.page_size = 1000;
  assert_eq!(GitHubClient::new(config.clone())?.page_size(), 100);

  config.page_size = 0;
  assert_eq!(GitHubClient::new(config)?.page_size(), 1);

  Ok(())
}
