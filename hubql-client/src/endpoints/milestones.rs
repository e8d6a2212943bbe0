//! # GitHub Milestone Endpoints
//!
//! GitHub's GraphQL schema only reads milestones; they are created and
//! edited through the REST API, which this client does not cover.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{OrderDirection, document, non_empty};
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{Milestone, MilestoneState, RepoRef};
use crate::pagination::Paginated;

pub(crate) const MILESTONE_FIELDS: &str = r#"
fragment MilestoneFields on Milestone {
  id
  number
  title
  description
  state
  url
  dueOn
  closedAt
}"#;

const GET_MILESTONE: &str = r#"
query($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    milestone(number: $number) { ...MilestoneFields }
  }
}"#;

const LIST_MILESTONES: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String,
      $states: [MilestoneState!], $orderBy: MilestoneOrder) {
  repository(owner: $owner, name: $name) {
    milestones(first: $first, after: $after, states: $states, orderBy: $orderBy) {
      nodes { ...MilestoneFields }
      pageInfo { hasNextPage endCursor }
      totalCount
    }
  }
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneOrderField {
  DueDate,
  CreatedAt,
  UpdatedAt,
  Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneOrder {
  pub field: MilestoneOrderField,
  pub direction: OrderDirection,
}

/// Filters for [`GitHubClient::milestones`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneFilter {
  pub states: Vec<MilestoneState>,
  pub order: Option<MilestoneOrder>,
}

impl GitHubClient {
  #[instrument(skip(self), level = "debug")]
  pub async fn get_milestone(&self, repo: &RepoRef, number: u32) -> Result<Option<Milestone>> {
    let request = GraphQlRequest::new(document(GET_MILESTONE, &[MILESTONE_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .var("number", number);
    let data = self.execute_lookup(&request).await?;
    graphql::decode(&data, &["repository", "milestone"])
  }

  /// List the milestones of a repository
  pub fn milestones(&self, repo: &RepoRef, filter: MilestoneFilter) -> Result<Paginated<'_, Milestone>> {
    debug!("Listing milestones of {} with {:?}", repo, filter);
    let request = GraphQlRequest::new(document(LIST_MILESTONES, &[MILESTONE_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .try_var("states", &non_empty(&filter.states))?
      .try_var("orderBy", &filter.order)?;
    Ok(self.paginate(request, vec!["repository", "milestones"]))
  }
}
