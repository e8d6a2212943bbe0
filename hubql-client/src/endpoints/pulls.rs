//! # GitHub Pull Request Endpoints
//!
//! GitHub API endpoint implementations for pull request operations,
//! including fetching, opening, editing, merging and listing pull requests.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::issues::IssueOrder;
use super::{document, non_empty};
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{MergeMethod, PullRequest, PullRequestState, RepoRef};
use crate::pagination::Paginated;

pub(crate) const PULL_REQUEST_FIELDS: &str = r#"
fragment PullRequestFields on PullRequest {
  id
  number
  title
  body
  state
  url
  author { login url }
  isDraft
  baseRefName
  headRefName
  mergeable
  merged
  mergedAt
  labels(first: 20) { nodes { id name color description isDefault } }
  createdAt
  updatedAt
}"#;

const GET_PULL_REQUEST: &str = r#"
query($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    pullRequest(number: $number) { ...PullRequestFields }
  }
}"#;

const CREATE_PULL_REQUEST: &str = r#"
mutation($input: CreatePullRequestInput!) {
  createPullRequest(input: $input) { pullRequest { ...PullRequestFields } }
}"#;

const UPDATE_PULL_REQUEST: &str = r#"
mutation($input: UpdatePullRequestInput!) {
  updatePullRequest(input: $input) { pullRequest { ...PullRequestFields } }
}"#;

const MERGE_PULL_REQUEST: &str = r#"
mutation($input: MergePullRequestInput!) {
  mergePullRequest(input: $input) { pullRequest { ...PullRequestFields } }
}"#;

const CLOSE_PULL_REQUEST: &str = r#"
mutation($input: ClosePullRequestInput!) {
  closePullRequest(input: $input) { pullRequest { ...PullRequestFields } }
}"#;

const LIST_PULL_REQUESTS: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String, $states: [PullRequestState!],
      $labels: [String!], $baseRefName: String, $headRefName: String, $orderBy: IssueOrder) {
  repository(owner: $owner, name: $name) {
    pullRequests(first: $first, after: $after, states: $states, labels: $labels,
                 baseRefName: $baseRefName, headRefName: $headRefName, orderBy: $orderBy) {
      nodes { ...PullRequestFields }
      pageInfo { hasNextPage endCursor }
      totalCount
    }
  }
}"#;

/// Parameters for opening a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestInput {
  pub repository_id: String,
  /// Branch the changes are merged into
  pub base_ref_name: String,
  /// Branch holding the changes; `owner:branch` for a fork
  pub head_ref_name: String,
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub draft: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub maintainer_can_modify: Option<bool>,
}

/// The states a pull request can be moved to by an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestUpdateState {
  Open,
  Closed,
}

/// Parameters for editing a pull request; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePullRequestInput {
  pub pull_request_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub base_ref_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub state: Option<PullRequestUpdateState>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label_ids: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub maintainer_can_modify: Option<bool>,
}

/// Parameters for merging a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePullRequestInput {
  pub pull_request_id: String,
  /// The repository's default method when unset
  #[serde(skip_serializing_if = "Option::is_none")]
  pub merge_method: Option<MergeMethod>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit_headline: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit_body: Option<String>,
  /// Refuse to merge unless the head is still at this commit
  #[serde(skip_serializing_if = "Option::is_none")]
  pub expected_head_oid: Option<String>,
}

/// Filters for [`GitHubClient::pull_requests`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestFilter {
  pub states: Vec<PullRequestState>,
  pub labels: Vec<String>,
  pub base_ref_name: Option<String>,
  pub head_ref_name: Option<String>,
  pub order: Option<IssueOrder>,
}

impl GitHubClient {
  /// Get a specific pull request
  #[instrument(skip(self), level = "debug")]
  pub async fn get_pull_request(&self, repo: &RepoRef, number: u32) -> Result<Option<PullRequest>> {
    let request = GraphQlRequest::new(document(GET_PULL_REQUEST, &[PULL_REQUEST_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .var("number", number);
    let data = self.execute_lookup(&request).await?;
    graphql::decode(&data, &["repository", "pullRequest"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn create_pull_request(&self, input: CreatePullRequestInput) -> Result<PullRequest> {
    let request =
      GraphQlRequest::new(document(CREATE_PULL_REQUEST, &[PULL_REQUEST_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    let pr: PullRequest = graphql::payload(&data, &["createPullRequest", "pullRequest"])?;
    info!("Opened pull request #{}: {}", pr.number, pr.url);
    Ok(pr)
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn update_pull_request(&self, input: UpdatePullRequestInput) -> Result<PullRequest> {
    let request =
      GraphQlRequest::new(document(UPDATE_PULL_REQUEST, &[PULL_REQUEST_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["updatePullRequest", "pullRequest"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn merge_pull_request(&self, input: MergePullRequestInput) -> Result<PullRequest> {
    let request =
      GraphQlRequest::new(document(MERGE_PULL_REQUEST, &[PULL_REQUEST_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    let pr: PullRequest = graphql::payload(&data, &["mergePullRequest", "pullRequest"])?;
    info!("Merged pull request #{}", pr.number);
    Ok(pr)
  }

  /// Close a pull request without merging it
  #[instrument(skip(self), level = "debug")]
  pub async fn close_pull_request(&self, pull_request_id: &str) -> Result<PullRequest> {
    let request = GraphQlRequest::new(document(CLOSE_PULL_REQUEST, &[PULL_REQUEST_FIELDS]))
      .var("input", json!({ "pullRequestId": pull_request_id }));
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["closePullRequest", "pullRequest"])
  }

  /// List the pull requests of a repository
  pub fn pull_requests(&self, repo: &RepoRef, filter: PullRequestFilter) -> Result<Paginated<'_, PullRequest>> {
    debug!("Listing pull requests of {} with {:?}", repo, filter);
    let request = GraphQlRequest::new(document(LIST_PULL_REQUESTS, &[PULL_REQUEST_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .try_var("states", &non_empty(&filter.states))?
      .try_var("labels", &non_empty(&filter.labels))?
      .try_var("baseRefName", &filter.base_ref_name)?
      .try_var("headRefName", &filter.head_ref_name)?
      .try_var("orderBy", &filter.order)?;
    Ok(self.paginate(request, vec!["repository", "pullRequests"]))
  }
}

#[cfg(test)]
mod tests {
  use hubql_test_utils::{connection, fixtures, graphql_data, graphql_errors, graphql_not_found, mount_graphql};
  use serde_json::json;
  use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::endpoints::test_client;
  use crate::models::MergeableState;

  fn hello_world() -> RepoRef {
    RepoRef::new("octocat", "Hello-World")
  }

  #[tokio::test]
  async fn test_get_pull_request() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_string_contains("pullRequest(number: $number)"))
      .and(body_partial_json(json!({ "variables": { "number": 1 } })))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(graphql_data(&["repository", "pullRequest"], fixtures::pull_request(1))),
      )
      .expect(1)
      .mount(&mock_server)
      .await;

    let pr = client.get_pull_request(&hello_world(), 1).await?.expect("pull request should exist");
    assert_eq!(pr.number, 1);
    assert_eq!(pr.state, PullRequestState::Open);
    assert_eq!(pr.mergeable, MergeableState::Mergeable);
    assert_eq!(pr.head_ref_name, "new-topic");
    assert!(pr.labels.is_empty());

    Ok(())
  }

  #[tokio::test]
  async fn test_get_pull_request_not_found_is_none() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());
    mount_graphql(
      &mock_server,
      graphql_not_found(
        &["repository", "pullRequest"],
        "Could not resolve to a PullRequest with the number of 999.",
      ),
    )
    .await;

    assert!(client.get_pull_request(&hello_world(), 999).await?.is_none());

    Ok(())
  }

  #[tokio::test]
  async fn test_get_pull_request_error_without_data() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());
    mount_graphql(
      &mock_server,
      graphql_errors(
        "NOT_FOUND",
        "Could not resolve to a PullRequest with the number of 999.",
      ),
    )
    .await;

    let err = client.get_pull_request(&hello_world(), 999).await.unwrap_err();
    assert!(err.is_not_found());

    Ok(())
  }

  #[tokio::test]
  async fn test_pull_requests_of_missing_repository_is_empty() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());
    mount_graphql(
      &mock_server,
      graphql_not_found(&["repository"], "Could not resolve to a Repository with the name 'octocat/Gone'."),
    )
    .await;

    let prs = client
      .pull_requests(&RepoRef::new("octocat", "Gone"), PullRequestFilter::default())?
      .collect_all()
      .await?;
    assert!(prs.is_empty());

    Ok(())
  }

  #[tokio::test]
  async fn test_create_pull_request() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({
        "variables": { "input": {
          "repositoryId": "R_1", "baseRefName": "main", "headRefName": "new-topic",
          "title": "Amazing new feature", "draft": true
        } }
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["createPullRequest", "pullRequest"],
        fixtures::pull_request(2),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let input = CreatePullRequestInput {
      repository_id: "R_1".to_string(),
      base_ref_name: "main".to_string(),
      head_ref_name: "new-topic".to_string(),
      title: "Amazing new feature".to_string(),
      draft: Some(true),
      ..Default::default()
    };
    assert_eq!(client.create_pull_request(input).await?.number, 2);

    Ok(())
  }

  #[tokio::test]
  async fn test_merge_pull_request() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    let mut merged = fixtures::pull_request(3);
    merged["state"] = json!("MERGED");
    merged["merged"] = json!(true);
    merged["mergedAt"] = json!("2024-03-05T12:00:00Z");
    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({
        "variables": { "input": { "pullRequestId": "PR_3", "mergeMethod": "SQUASH" } }
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(&["mergePullRequest", "pullRequest"], merged)))
      .expect(1)
      .mount(&mock_server)
      .await;

    let input = MergePullRequestInput {
      pull_request_id: "PR_3".to_string(),
      merge_method: Some(MergeMethod::Squash),
      ..Default::default()
    };
    let pr = client.merge_pull_request(input).await?;
    assert!(pr.merged);
    assert_eq!(pr.state, PullRequestState::Merged);

    Ok(())
  }

  #[tokio::test]
  async fn test_update_and_close_pull_request() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    let mut retitled = fixtures::pull_request(4);
    retitled["title"] = json!("Better title");
    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_string_contains("updatePullRequest"))
      .and(body_partial_json(json!({ "variables": { "input": { "pullRequestId": "PR_4", "title": "Better title" } } })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(&["updatePullRequest", "pullRequest"], retitled)))
      .expect(1)
      .mount(&mock_server)
      .await;

    let mut closed = fixtures::pull_request(4);
    closed["state"] = json!("CLOSED");
    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_string_contains("closePullRequest"))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(&["closePullRequest", "pullRequest"], closed)))
      .expect(1)
      .mount(&mock_server)
      .await;

    let input = UpdatePullRequestInput {
      pull_request_id: "PR_4".to_string(),
      title: Some("Better title".to_string()),
      ..Default::default()
    };
    assert_eq!(client.update_pull_request(input).await?.title, "Better title");
    assert_eq!(client.close_pull_request("PR_4").await?.state, PullRequestState::Closed);

    Ok(())
  }

  #[tokio::test]
  async fn test_pull_requests_by_head_branch() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({
        "variables": { "headRefName": "new-topic", "baseRefName": null, "states": ["OPEN", "MERGED"] }
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["repository", "pullRequests"],
        connection(vec![fixtures::pull_request(5)], None),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let filter = PullRequestFilter {
      states: vec![PullRequestState::Open, PullRequestState::Merged],
      head_ref_name: Some("new-topic".to_string()),
      ..Default::default()
    };
    let prs = client.pull_requests(&hello_world(), filter)?.collect_all().await?;
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].number, 5);

    Ok(())
  }
}
