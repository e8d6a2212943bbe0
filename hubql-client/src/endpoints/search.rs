//! # GitHub Search Endpoint
//!
//! One query spans every result type, so all fragments must merge: fields
//! sharing a response name across types need the same shape. Repository
//! `name` (non-null) and pull request `state` (its own enum) clash with
//! user and issue fields and are aliased here; the records accept either
//! key.

use tracing::debug;

use super::document;
use super::issues::ISSUE_FIELDS;
use super::organizations::ORGANIZATION_FIELDS;
use super::users::USER_FIELDS;
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::GraphQlRequest;
use crate::models::{SearchResult, SearchType};
use crate::pagination::Paginated;

const SEARCH_REPOSITORY_FIELDS: &str = r#"
fragment SearchRepositoryFields on Repository {
  id
  repositoryName: name
  nameWithOwner
  owner { login url }
  description
  url
  visibility
  isFork
  isArchived
  stargazerCount
  forkCount
  defaultBranchRef { name }
  createdAt
  updatedAt
  pushedAt
}"#;

const SEARCH_PULL_REQUEST_FIELDS: &str = r#"
fragment SearchPullRequestFields on PullRequest {
  id
  number
  title
  body
  pullRequestState: state
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

const SEARCH: &str = r#"
query($query: String!, $type: SearchType!, $first: Int!, $after: String) {
  search(query: $query, type: $type, first: $first, after: $after) {
    nodes {
      __typename
      ... on Repository { ...SearchRepositoryFields }
      ... on Issue { ...IssueFields }
      ... on PullRequest { ...SearchPullRequestFields }
      ... on User { ...UserFields }
      ... on Organization { ...OrganizationFields }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#;

impl GitHubClient {
  /// Search GitHub using its search syntax, e.g. `repo:owner/name is:open`.
  ///
  /// [`SearchType::Issue`] yields both issues and pull requests;
  /// [`SearchType::User`] yields users and organizations. Result types this
  /// client does not select fields for come back as [`SearchResult::Other`].
  pub fn search(&self, query: &str, search_type: SearchType) -> Result<Paginated<'_, SearchResult>> {
    debug!("Searching {:?}: {}", search_type, query);
    let request = GraphQlRequest::new(document(
      SEARCH,
      &[
        SEARCH_REPOSITORY_FIELDS,
        ISSUE_FIELDS,
        SEARCH_PULL_REQUEST_FIELDS,
        USER_FIELDS,
        ORGANIZATION_FIELDS,
      ],
    ))
    .var("query", query)
    .try_var("type", &search_type)?;
    Ok(self.paginate(request, vec!["search"]))
  }
}
