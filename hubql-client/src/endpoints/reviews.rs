//! # GitHub Pull Request Review Endpoints
//!
//! Reviews are created pending, optionally with inline threads, and become
//! visible once submitted with an event. Only pending reviews can be deleted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use super::document;
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{RepoRef, Review, ReviewEvent};
use crate::pagination::Paginated;

pub(crate) const REVIEW_FIELDS: &str = r#"
fragment ReviewFields on PullRequestReview {
  id
  body
  state
  url
  author { login url }
  submittedAt
}"#;

const ADD_REVIEW: &str = r#"
mutation($input: AddPullRequestReviewInput!) {
  addPullRequestReview(input: $input) { pullRequestReview { ...ReviewFields } }
}"#;

const SUBMIT_REVIEW: &str = r#"
mutation($input: SubmitPullRequestReviewInput!) {
  submitPullRequestReview(input: $input) { pullRequestReview { ...ReviewFields } }
}"#;

const DELETE_REVIEW: &str = r#"
mutation($input: DeletePullRequestReviewInput!) {
  deletePullRequestReview(input: $input) { clientMutationId }
}"#;

const LIST_REVIEWS: &str = r#"
query($owner: String!, $name: String!, $number: Int!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    pullRequest(number: $number) {
      reviews(first: $first, after: $after) {
        nodes { ...ReviewFields }
        pageInfo { hasNextPage endCursor }
        totalCount
      }
    }
  }
}"#;

/// Side of a diff an inline comment is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffSide {
  Left,
  Right,
}

/// An inline comment thread opened as part of a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReviewThread {
  pub path: String,
  pub line: u32,
  pub body: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub side: Option<DiffSide>,
  /// First line of a multi-line comment
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_line: Option<u32>,
}

/// Parameters for starting a review
///
/// Without an `event` the review stays pending until
/// [`GitHubClient::submit_review`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewInput {
  pub pull_request_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub event: Option<ReviewEvent>,
  /// Commit the review applies to; the head commit when unset
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit_oid: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub threads: Vec<DraftReviewThread>,
}

impl GitHubClient {
  #[instrument(skip(self), level = "debug")]
  pub async fn add_review(&self, input: AddReviewInput) -> Result<Review> {
    let request = GraphQlRequest::new(document(ADD_REVIEW, &[REVIEW_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    let review: Review = graphql::payload(&data, &["addPullRequestReview", "pullRequestReview"])?;
    info!("Added review {} ({:?})", review.id, review.state);
    Ok(review)
  }

  /// Submit a pending review
  #[instrument(skip(self, body), level = "debug")]
  pub async fn submit_review(&self, review_id: &str, event: ReviewEvent, body: Option<&str>) -> Result<Review> {
    let mut input = Map::new();
    input.insert("pullRequestReviewId".to_string(), json!(review_id));
    input.insert("event".to_string(), serde_json::to_value(event)?);
    if let Some(body) = body {
      input.insert("body".to_string(), json!(body));
    }

    let request = GraphQlRequest::new(document(SUBMIT_REVIEW, &[REVIEW_FIELDS])).var("input", input);
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["submitPullRequestReview", "pullRequestReview"])
  }

  /// Delete a pending review
  #[instrument(skip(self), level = "debug")]
  pub async fn delete_review(&self, review_id: &str) -> Result<()> {
    let request =
      GraphQlRequest::new(DELETE_REVIEW.trim()).var("input", json!({ "pullRequestReviewId": review_id }));
    let data = self.execute(&request).await?;
    graphql::payload::<Value>(&data, &["deletePullRequestReview"])?;
    info!("Deleted review {}", review_id);
    Ok(())
  }

  /// List the reviews on a pull request
  pub fn reviews(&self, repo: &RepoRef, number: u32) -> Paginated<'_, Review> {
    debug!("Listing reviews on {}#{}", repo, number);
    let request = GraphQlRequest::new(document(LIST_REVIEWS, &[REVIEW_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .var("number", number);
    self.paginate(request, vec!["repository", "pullRequest", "reviews"])
  }
}

#[cfg(test)]
mod tests {
  use hubql_test_utils::{connection, fixtures, graphql_data, mount_graphql};
  use serde_json::json;
  use wiremock::matchers::{body_partial_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::endpoints::test_client;
  use crate::error::Error;
  use crate::models::ReviewState;

  #[tokio::test]
  async fn test_add_pending_review_with_thread() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({
        "variables": { "input": {
          "pullRequestId": "PR_1",
          "threads": [{ "path": "src/lib.rs", "line": 12, "body": "Typo", "side": "RIGHT" }]
        } }
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["addPullRequestReview", "pullRequestReview"],
        fixtures::review("PRR_1", "PENDING"),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let input = AddReviewInput {
      pull_request_id: "PR_1".to_string(),
      threads: vec![DraftReviewThread {
        path: "src/lib.rs".to_string(),
        line: 12,
        body: "Typo".to_string(),
        side: Some(DiffSide::Right),
        start_line: None,
      }],
      ..Default::default()
    };
    let review = client.add_review(input).await?;
    assert_eq!(review.state, ReviewState::Pending);
    assert!(review.submitted_at.is_none());

    Ok(())
  }

  #[test]
  fn test_add_review_input_omits_empty_threads() {
    let input = AddReviewInput {
      pull_request_id: "PR_1".to_string(),
      event: Some(ReviewEvent::Approve),
      ..Default::default()
    };
    assert_eq!(
      serde_json::to_value(&input).unwrap(),
      json!({ "pullRequestId": "PR_1", "event": "APPROVE" })
    );
  }

  #[tokio::test]
  async fn test_submit_review() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({
        "variables": { "input": { "pullRequestReviewId": "PRR_1", "event": "REQUEST_CHANGES", "body": "Needs tests" } }
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["submitPullRequestReview", "pullRequestReview"],
        fixtures::review("PRR_1", "CHANGES_REQUESTED"),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let review = client
      .submit_review("PRR_1", ReviewEvent::RequestChanges, Some("Needs tests"))
      .await?;
    assert_eq!(review.state, ReviewState::ChangesRequested);
    assert!(review.submitted_at.is_some());

    Ok(())
  }

  #[tokio::test]
  async fn test_delete_review_empty_payload() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());
    mount_graphql(&mock_server, graphql_data(&["deletePullRequestReview"], json!(null))).await;

    let err = client.delete_review("PRR_1").await.unwrap_err();
    assert!(matches!(err, Error::EmptyPayload { ref field } if field == "deletePullRequestReview"));

    Ok(())
  }

  #[tokio::test]
  async fn test_reviews() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({ "variables": { "number": 12 } })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["repository", "pullRequest", "reviews"],
        connection(
          vec![fixtures::review("PRR_1", "APPROVED"), fixtures::review("PRR_2", "COMMENTED")],
          None,
        ),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let reviews = client.reviews(&RepoRef::new("octocat", "Hello-World"), 12).collect_all().await?;
    let states: Vec<_> = reviews.iter().map(|r| r.state).collect();
    assert_eq!(states, vec![ReviewState::Approved, ReviewState::Commented]);

    Ok(())
  }
}
