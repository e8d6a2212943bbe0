//! # GitHub Issue Endpoints
//!
//! Issue lookups, the issue lifecycle mutations and the filtered issue list
//! of a repository.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::{OrderDirection, document, non_empty};
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{Issue, IssueState, RepoRef};
use crate::pagination::Paginated;

pub(crate) const ISSUE_FIELDS: &str = r#"
fragment IssueFields on Issue {
  id
  number
  title
  body
  state
  url
  author { login url }
  labels(first: 20) { nodes { id name color description isDefault } }
  milestone { id number title }
  createdAt
  updatedAt
  closedAt
}"#;

const GET_ISSUE: &str = r#"
query($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    issue(number: $number) { ...IssueFields }
  }
}"#;

const CREATE_ISSUE: &str = r#"
mutation($input: CreateIssueInput!) {
  createIssue(input: $input) { issue { ...IssueFields } }
}"#;

const UPDATE_ISSUE: &str = r#"
mutation($input: UpdateIssueInput!) {
  updateIssue(input: $input) { issue { ...IssueFields } }
}"#;

const CLOSE_ISSUE: &str = r#"
mutation($input: CloseIssueInput!) {
  closeIssue(input: $input) { issue { ...IssueFields } }
}"#;

const REOPEN_ISSUE: &str = r#"
mutation($input: ReopenIssueInput!) {
  reopenIssue(input: $input) { issue { ...IssueFields } }
}"#;

const DELETE_ISSUE: &str = r#"
mutation($input: DeleteIssueInput!) {
  deleteIssue(input: $input) { clientMutationId }
}"#;

const LIST_ISSUES: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String,
      $states: [IssueState!], $labels: [String!], $orderBy: IssueOrder) {
  repository(owner: $owner, name: $name) {
    issues(first: $first, after: $after, states: $states, labels: $labels, orderBy: $orderBy) {
      nodes { ...IssueFields }
      pageInfo { hasNextPage endCursor }
      totalCount
    }
  }
}"#;

/// Parameters for opening an issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueInput {
  pub repository_id: String,
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub assignee_ids: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub label_ids: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub milestone_id: Option<String>,
}

/// Parameters for editing an issue; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueInput {
  pub id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub state: Option<IssueState>,
  /// Replaces the assignees when set
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee_ids: Option<Vec<String>>,
  /// Replaces the labels when set
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label_ids: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub milestone_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueOrderField {
  CreatedAt,
  UpdatedAt,
  Comments,
}

/// Ordering for issue and pull request lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueOrder {
  pub field: IssueOrderField,
  pub direction: OrderDirection,
}

/// Filters for [`GitHubClient::issues`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
  /// Empty means every state
  pub states: Vec<IssueState>,
  /// Label names; an issue must carry one of them
  pub labels: Vec<String>,
  pub order: Option<IssueOrder>,
}

impl GitHubClient {
  /// Get an issue by number, `None` when the repository or issue is absent
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, repo: &RepoRef, number: u32) -> Result<Option<Issue>> {
    let request = GraphQlRequest::new(document(GET_ISSUE, &[ISSUE_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .var("number", number);
    let data = self.execute_lookup(&request).await?;
    graphql::decode(&data, &["repository", "issue"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn create_issue(&self, input: CreateIssueInput) -> Result<Issue> {
    let request = GraphQlRequest::new(document(CREATE_ISSUE, &[ISSUE_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    let issue: Issue = graphql::payload(&data, &["createIssue", "issue"])?;
    info!("Created issue #{}: {}", issue.number, issue.url);
    Ok(issue)
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn update_issue(&self, input: UpdateIssueInput) -> Result<Issue> {
    let request = GraphQlRequest::new(document(UPDATE_ISSUE, &[ISSUE_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["updateIssue", "issue"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn close_issue(&self, issue_id: &str) -> Result<Issue> {
    let request =
      GraphQlRequest::new(document(CLOSE_ISSUE, &[ISSUE_FIELDS])).var("input", json!({ "issueId": issue_id }));
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["closeIssue", "issue"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn reopen_issue(&self, issue_id: &str) -> Result<Issue> {
    let request =
      GraphQlRequest::new(document(REOPEN_ISSUE, &[ISSUE_FIELDS])).var("input", json!({ "issueId": issue_id }));
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["reopenIssue", "issue"])
  }

  /// Permanently delete an issue. Requires admin rights on the repository.
  #[instrument(skip(self), level = "debug")]
  pub async fn delete_issue(&self, issue_id: &str) -> Result<()> {
    let request = GraphQlRequest::new(DELETE_ISSUE.trim()).var("input", json!({ "issueId": issue_id }));
    let data = self.execute(&request).await?;
    graphql::payload::<Value>(&data, &["deleteIssue"])?;
    info!("Deleted issue {}", issue_id);
    Ok(())
  }

  /// List the issues of a repository
  pub fn issues(&self, repo: &RepoRef, filter: IssueFilter) -> Result<Paginated<'_, Issue>> {
    debug!("Listing issues of {} with {:?}", repo, filter);
    let request = GraphQlRequest::new(document(LIST_ISSUES, &[ISSUE_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .try_var("states", &non_empty(&filter.states))?
      .try_var("labels", &non_empty(&filter.labels))?
      .try_var("orderBy", &filter.order)?;
    Ok(self.paginate(request, vec!["repository", "issues"]))
  }
}
