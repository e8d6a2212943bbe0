//! # GitHub Records
//!
//! Flat value records mirroring the parts of GitHub's GraphQL schema this
//! client selects, and the context types operations are scoped by.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Where a list of repositories or projects is rooted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
  /// The authenticated user
  Viewer,
  User(String),
  Organization(String),
}

impl Owner {
  /// Root field the owner is selected through
  pub(crate) fn root_field(&self) -> &'static str {
    match self {
      Self::Viewer => "viewer",
      Self::User(_) => "user",
      Self::Organization(_) => "organization",
    }
  }

  /// `(variable declaration, root selection)` fragments for a query
  pub(crate) fn selection(&self) -> (&'static str, &'static str) {
    match self {
      Self::Viewer => ("", "viewer"),
      Self::User(_) => ("$login: String!, ", "user(login: $login)"),
      Self::Organization(_) => ("$login: String!, ", "organization(login: $login)"),
    }
  }

  pub fn login(&self) -> Option<&str> {
    match self {
      Self::Viewer => None,
      Self::User(login) | Self::Organization(login) => Some(login),
    }
  }
}

impl fmt::Display for Owner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Viewer => write!(f, "viewer"),
      Self::User(login) => write!(f, "user {login}"),
      Self::Organization(login) => write!(f, "organization {login}"),
    }
  }
}

/// A repository addressed by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
  pub owner: String,
  pub name: String,
}

impl RepoRef {
  pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      owner: owner.into(),
      name: name.into(),
    }
  }
}

impl fmt::Display for RepoRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}

/// Any account that can author content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
  pub login: String,
  pub url: String,
}

/// Represents a GitHub user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: String,
  pub login: String,
  pub name: Option<String>,
  pub bio: Option<String>,
  pub company: Option<String>,
  pub location: Option<String>,
  pub url: String,
  pub created_at: DateTime<Utc>,
}

/// Represents a GitHub organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
  pub id: String,
  pub login: String,
  pub name: Option<String>,
  pub description: Option<String>,
  pub url: String,
  pub website_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryVisibility {
  Public,
  Private,
  Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryPrivacy {
  Public,
  Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefName {
  pub name: String,
}

/// Represents a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
  pub id: String,
  #[serde(alias = "repositoryName")]
  pub name: String,
  pub name_with_owner: String,
  pub owner: Actor,
  pub description: Option<String>,
  pub url: String,
  pub visibility: RepositoryVisibility,
  pub is_fork: bool,
  pub is_archived: bool,
  pub stargazer_count: u64,
  pub fork_count: u64,
  pub default_branch_ref: Option<RefName>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub pushed_at: Option<DateTime<Utc>>,
}

impl Repository {
  pub fn default_branch(&self) -> Option<&str> {
    self.default_branch_ref.as_ref().map(|r| r.name.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitObject {
  pub oid: String,
}

/// A branch head (`refs/heads/*`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
  pub name: String,
  pub target: Option<GitObject>,
}

/// Represents a GitHub label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
  pub id: String,
  pub name: String,
  pub color: String,
  pub description: Option<String>,
  pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneState {
  Open,
  Closed,
}

/// Represents a GitHub milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
  pub id: String,
  pub number: u32,
  pub title: String,
  pub description: Option<String>,
  pub state: MilestoneState,
  pub url: String,
  pub due_on: Option<DateTime<Utc>>,
  pub closed_at: Option<DateTime<Utc>>,
}

/// The milestone summary embedded in issues and pull requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneRef {
  pub id: String,
  pub number: u32,
  pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueState {
  Open,
  Closed,
}

/// Represents a GitHub issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
  pub id: String,
  pub number: u32,
  pub title: String,
  pub body: String,
  pub state: IssueState,
  pub url: String,
  pub author: Option<Actor>,
  #[serde(default, deserialize_with = "nodes")]
  pub labels: Vec<Label>,
  pub milestone: Option<MilestoneRef>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub closed_at: Option<DateTime<Utc>>,
}

/// Represents a comment on an issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub id: String,
  pub body: String,
  pub url: String,
  pub author: Option<Actor>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
  Open,
  Closed,
  Merged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeableState {
  Mergeable,
  Conflicting,
  Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeMethod {
  Merge,
  Squash,
  Rebase,
}

/// Represents a GitHub pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
  pub id: String,
  pub number: u32,
  pub title: String,
  pub body: String,
  #[serde(alias = "pullRequestState")]
  pub state: PullRequestState,
  pub url: String,
  pub author: Option<Actor>,
  pub is_draft: bool,
  pub base_ref_name: String,
  pub head_ref_name: String,
  pub mergeable: MergeableState,
  pub merged: bool,
  pub merged_at: Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "nodes")]
  pub labels: Vec<Label>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
  Pending,
  Commented,
  Approved,
  ChangesRequested,
  Dismissed,
}

/// Action taken when a review is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
  Comment,
  Approve,
  RequestChanges,
  Dismiss,
}

/// Represents a GitHub pull request review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  pub id: String,
  pub body: String,
  pub state: ReviewState,
  pub url: String,
  pub author: Option<Actor>,
  pub submitted_at: Option<DateTime<Utc>>,
}

/// Represents a GitHub project (Projects V2)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id: String,
  pub number: u32,
  pub title: String,
  pub short_description: Option<String>,
  pub url: String,
  pub closed: bool,
  pub public: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// What a search query looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
  Issue,
  Repository,
  User,
  Discussion,
}

/// One search hit, tagged by its GraphQL type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum SearchResult {
  Repository(Repository),
  Issue(Issue),
  PullRequest(PullRequest),
  User(User),
  Organization(Organization),
  /// A result type this client does not select fields for
  #[serde(other)]
  Other,
}

/// Flatten a `{ nodes: [...] }` selection into its non-null nodes
fn nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  #[derive(Deserialize)]
  #[serde(bound(deserialize = "T: Deserialize<'de>"))]
  struct NodeList<T> {
    #[serde(default)]
    nodes: Vec<Option<T>>,
  }

  let list = Option::<NodeList<T>>::deserialize(deserializer)?;
  Ok(list.map(|l| l.nodes.into_iter().flatten().collect()).unwrap_or_default())
}
