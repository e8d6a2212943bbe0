//! # GitHub Comment Endpoints
//!
//! Comments on issues and pull requests. Both share GitHub's `IssueComment`
//! type, so every operation here works for either.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::document;
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{Comment, RepoRef};
use crate::pagination::Paginated;

pub(crate) const COMMENT_FIELDS: &str = r#"
fragment CommentFields on IssueComment {
  id
  body
  url
  author { login url }
  createdAt
  updatedAt
}"#;

const GET_COMMENT: &str = r#"
query($id: ID!) {
  node(id: $id) { __typename ... on IssueComment { ...CommentFields } }
}"#;

const ADD_COMMENT: &str = r#"
mutation($input: AddCommentInput!) {
  addComment(input: $input) { commentEdge { node { ...CommentFields } } }
}"#;

const UPDATE_COMMENT: &str = r#"
mutation($input: UpdateIssueCommentInput!) {
  updateIssueComment(input: $input) { issueComment { ...CommentFields } }
}"#;

const DELETE_COMMENT: &str = r#"
mutation($input: DeleteIssueCommentInput!) {
  deleteIssueComment(input: $input) { clientMutationId }
}"#;

const LIST_COMMENTS: &str = r#"
query($owner: String!, $name: String!, $number: Int!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    issueOrPullRequest(number: $number) {
      ... on Issue {
        comments(first: $first, after: $after) {
          nodes { ...CommentFields }
          pageInfo { hasNextPage endCursor }
          totalCount
        }
      }
      ... on PullRequest {
        comments(first: $first, after: $after) {
          nodes { ...CommentFields }
          pageInfo { hasNextPage endCursor }
          totalCount
        }
      }
    }
  }
}"#;

impl GitHubClient {
  /// Get a comment by node ID, `None` when no node has that ID or the node
  /// is not a comment
  #[instrument(skip(self), level = "debug")]
  pub async fn get_comment(&self, comment_id: &str) -> Result<Option<Comment>> {
    let request = GraphQlRequest::new(document(GET_COMMENT, &[COMMENT_FIELDS])).var("id", comment_id);
    let data = self.execute_lookup(&request).await?;
    match graphql::select(&data, &["node"])? {
      Some(node) if node.get("__typename").and_then(Value::as_str) == Some("IssueComment") => {
        Ok(Some(Comment::deserialize(node)?))
      }
      Some(node) => {
        debug!("Node {} is a {}, not a comment", comment_id, node["__typename"]);
        Ok(None)
      }
      None => Ok(None),
    }
  }

  /// Comment on an issue or pull request identified by its node ID
  #[instrument(skip(self, body), level = "debug")]
  pub async fn add_comment(&self, subject_id: &str, body: &str) -> Result<Comment> {
    let request = GraphQlRequest::new(document(ADD_COMMENT, &[COMMENT_FIELDS]))
      .var("input", json!({ "subjectId": subject_id, "body": body }));
    let data = self.execute(&request).await?;
    let comment: Comment = graphql::payload(&data, &["addComment", "commentEdge", "node"])?;
    info!("Added comment {}", comment.url);
    Ok(comment)
  }

  #[instrument(skip(self, body), level = "debug")]
  pub async fn update_comment(&self, comment_id: &str, body: &str) -> Result<Comment> {
    let request = GraphQlRequest::new(document(UPDATE_COMMENT, &[COMMENT_FIELDS]))
      .var("input", json!({ "id": comment_id, "body": body }));
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["updateIssueComment", "issueComment"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn delete_comment(&self, comment_id: &str) -> Result<()> {
    let request = GraphQlRequest::new(DELETE_COMMENT.trim()).var("input", json!({ "id": comment_id }));
    let data = self.execute(&request).await?;
    graphql::payload::<Value>(&data, &["deleteIssueComment"])?;
    info!("Deleted comment {}", comment_id);
    Ok(())
  }

  /// List the comments on an issue or pull request
  pub fn issue_comments(&self, repo: &RepoRef, number: u32) -> Paginated<'_, Comment> {
    debug!("Listing comments on {}#{}", repo, number);
    let request = GraphQlRequest::new(document(LIST_COMMENTS, &[COMMENT_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .var("number", number);
    self.paginate(request, vec!["repository", "issueOrPullRequest", "comments"])
  }
}
