//! # GitHub Repository Endpoints
//!
//! Repository lookups and mutations, plus the paged lists hanging off an
//! owner or a repository: repositories, collaborators and branches.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::users::USER_FIELDS;
use super::{OrderDirection, document};
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{Branch, Owner, RepoRef, Repository, RepositoryPrivacy, RepositoryVisibility, User};
use crate::pagination::Paginated;

pub(crate) const REPOSITORY_FIELDS: &str = r#"
fragment RepositoryFields on Repository {
  id
  name
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

const GET_REPOSITORY: &str = r#"
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) { ...RepositoryFields }
}"#;

const CREATE_REPOSITORY: &str = r#"
mutation($input: CreateRepositoryInput!) {
  createRepository(input: $input) { repository { ...RepositoryFields } }
}"#;

const UPDATE_REPOSITORY: &str = r#"
mutation($input: UpdateRepositoryInput!) {
  updateRepository(input: $input) { repository { ...RepositoryFields } }
}"#;

const ARCHIVE_REPOSITORY: &str = r#"
mutation($input: ArchiveRepositoryInput!) {
  archiveRepository(input: $input) { repository { ...RepositoryFields } }
}"#;

const UNARCHIVE_REPOSITORY: &str = r#"
mutation($input: UnarchiveRepositoryInput!) {
  unarchiveRepository(input: $input) { repository { ...RepositoryFields } }
}"#;

const LIST_COLLABORATORS: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    collaborators(first: $first, after: $after) {
      nodes { ...UserFields }
      pageInfo { hasNextPage endCursor }
      totalCount
    }
  }
}"#;

const LIST_BRANCHES: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    refs(refPrefix: "refs/heads/", first: $first, after: $after) {
      nodes { name target { oid } }
      pageInfo { hasNextPage endCursor }
      totalCount
    }
  }
}"#;

/// Parameters for creating a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepositoryInput {
  pub name: String,
  pub visibility: RepositoryVisibility,
  /// Organization or user node ID; the viewer when unset
  #[serde(skip_serializing_if = "Option::is_none")]
  pub owner_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub homepage_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub has_issues_enabled: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub has_wiki_enabled: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub template: Option<bool>,
}

impl CreateRepositoryInput {
  pub fn new(name: impl Into<String>, visibility: RepositoryVisibility) -> Self {
    Self {
      name: name.into(),
      visibility,
      owner_id: None,
      description: None,
      homepage_url: None,
      has_issues_enabled: None,
      has_wiki_enabled: None,
      template: None,
    }
  }
}

/// Parameters for updating a repository; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRepositoryInput {
  pub repository_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub homepage_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub has_issues_enabled: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub has_wiki_enabled: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub has_projects_enabled: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub template: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryOrderField {
  CreatedAt,
  UpdatedAt,
  PushedAt,
  Name,
  Stargazers,
}

/// Ordering for repository lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOrder {
  pub field: RepositoryOrderField,
  pub direction: OrderDirection,
}

/// Filters for [`GitHubClient::repositories`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryFilter {
  pub privacy: Option<RepositoryPrivacy>,
  pub is_fork: Option<bool>,
  pub order: Option<RepositoryOrder>,
}

impl GitHubClient {
  /// Get a repository, `None` when it does not exist or is not visible
  #[instrument(skip(self), level = "debug")]
  pub async fn get_repository(&self, repo: &RepoRef) -> Result<Option<Repository>> {
    let request = GraphQlRequest::new(document(GET_REPOSITORY, &[REPOSITORY_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str());
    let data = self.execute_lookup(&request).await?;
    graphql::decode(&data, &["repository"])
  }

  /// Create a repository owned by the viewer or by `input.owner_id`
  #[instrument(skip(self), level = "debug")]
  pub async fn create_repository(&self, input: CreateRepositoryInput) -> Result<Repository> {
    let request = GraphQlRequest::new(document(CREATE_REPOSITORY, &[REPOSITORY_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    let repository: Repository = graphql::payload(&data, &["createRepository", "repository"])?;
    info!("Created repository {}", repository.name_with_owner);
    Ok(repository)
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn update_repository(&self, input: UpdateRepositoryInput) -> Result<Repository> {
    let request = GraphQlRequest::new(document(UPDATE_REPOSITORY, &[REPOSITORY_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["updateRepository", "repository"])
  }

  /// Archive a repository, making it read-only
  #[instrument(skip(self), level = "debug")]
  pub async fn archive_repository(&self, repository_id: &str) -> Result<Repository> {
    let request = GraphQlRequest::new(document(ARCHIVE_REPOSITORY, &[REPOSITORY_FIELDS]))
      .var("input", json!({ "repositoryId": repository_id }));
    let data = self.execute(&request).await?;
    let repository: Repository = graphql::payload(&data, &["archiveRepository", "repository"])?;
    info!("Archived repository {}", repository.name_with_owner);
    Ok(repository)
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn unarchive_repository(&self, repository_id: &str) -> Result<Repository> {
    let request = GraphQlRequest::new(document(UNARCHIVE_REPOSITORY, &[REPOSITORY_FIELDS]))
      .var("input", json!({ "repositoryId": repository_id }));
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["unarchiveRepository", "repository"])
  }

  /// List the repositories of an owner
  pub fn repositories(&self, owner: Owner, filter: RepositoryFilter) -> Result<Paginated<'_, Repository>> {
    debug!("Listing repositories of {} with {:?}", owner, filter);
    let (declaration, root) = owner.selection();
    let query = format!(
      r#"
query({declaration}$first: Int!, $after: String, $privacy: RepositoryPrivacy, $isFork: Boolean, $orderBy: RepositoryOrder) {{
  {root} {{
    repositories(first: $first, after: $after, privacy: $privacy, isFork: $isFork, orderBy: $orderBy) {{
      nodes {{ ...RepositoryFields }}
      pageInfo {{ hasNextPage endCursor }}
      totalCount
    }}
  }}
}}"#
    );

    let mut request = GraphQlRequest::new(document(&query, &[REPOSITORY_FIELDS]))
      .try_var("privacy", &filter.privacy)?
      .try_var("isFork", &filter.is_fork)?
      .try_var("orderBy", &filter.order)?;
    if let Some(login) = owner.login() {
      request = request.var("login", login);
    }

    Ok(self.paginate(request, vec![owner.root_field(), "repositories"]))
  }

  /// List the collaborators of a repository
  ///
  /// GitHub returns `null` collaborators to callers without push access;
  /// the stream is then empty.
  pub fn collaborators(&self, repo: &RepoRef) -> Paginated<'_, User> {
    debug!("Listing collaborators of {}", repo);
    let request = GraphQlRequest::new(document(LIST_COLLABORATORS, &[USER_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str());
    self.paginate(request, vec!["repository", "collaborators"])
  }

  /// List the branches of a repository
  pub fn branches(&self, repo: &RepoRef) -> Paginated<'_, Branch> {
    debug!("Listing branches of {}", repo);
    let request = GraphQlRequest::new(LIST_BRANCHES.trim())
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str());
    self.paginate(request, vec!["repository", "refs"])
  }
}
