//! # GitHub Project Endpoints
//!
//! Projects (the V2 boards) belong to a user or an organization, so lookups
//! and lists are rooted at an [`Owner`].

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::document;
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{Owner, Project};
use crate::pagination::Paginated;

pub(crate) const PROJECT_FIELDS: &str = r#"
fragment ProjectFields on ProjectV2 {
  id
  number
  title
  shortDescription
  url
  closed
  public
  createdAt
  updatedAt
}"#;

const CREATE_PROJECT: &str = r#"
mutation($input: CreateProjectV2Input!) {
  createProjectV2(input: $input) { projectV2 { ...ProjectFields } }
}"#;

const UPDATE_PROJECT: &str = r#"
mutation($input: UpdateProjectV2Input!) {
  updateProjectV2(input: $input) { projectV2 { ...ProjectFields } }
}"#;

const DELETE_PROJECT: &str = r#"
mutation($input: DeleteProjectV2Input!) {
  deleteProjectV2(input: $input) { projectV2 { id } }
}"#;

/// Parameters for creating a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
  /// Node ID of the owning user or organization
  pub owner_id: String,
  pub title: String,
  /// Link the new project to this repository
  #[serde(skip_serializing_if = "Option::is_none")]
  pub repository_id: Option<String>,
}

/// Parameters for editing a project; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
  pub project_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub short_description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub readme: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub closed: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub public: Option<bool>,
}

impl GitHubClient {
  /// Get an owner's project by number
  #[instrument(skip(self), level = "debug")]
  pub async fn get_project(&self, owner: Owner, number: u32) -> Result<Option<Project>> {
    let (declaration, root) = owner.selection();
    let query = format!(
      "query({declaration}$number: Int!) {{ {root} {{ projectV2(number: $number) {{ ...ProjectFields }} }} }}"
    );

    let mut request = GraphQlRequest::new(document(&query, &[PROJECT_FIELDS])).var("number", number);
    if let Some(login) = owner.login() {
      request = request.var("login", login);
    }

    let data = self.execute_lookup(&request).await?;
    graphql::decode(&data, &[owner.root_field(), "projectV2"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn create_project(&self, input: CreateProjectInput) -> Result<Project> {
    let request = GraphQlRequest::new(document(CREATE_PROJECT, &[PROJECT_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    let project: Project = graphql::payload(&data, &["createProjectV2", "projectV2"])?;
    info!("Created project #{}: {}", project.number, project.url);
    Ok(project)
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn update_project(&self, input: UpdateProjectInput) -> Result<Project> {
    let request = GraphQlRequest::new(document(UPDATE_PROJECT, &[PROJECT_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["updateProjectV2", "projectV2"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn delete_project(&self, project_id: &str) -> Result<()> {
    let request = GraphQlRequest::new(DELETE_PROJECT.trim()).var("input", json!({ "projectId": project_id }));
    let data = self.execute(&request).await?;
    graphql::payload::<Value>(&data, &["deleteProjectV2"])?;
    info!("Deleted project {}", project_id);
    Ok(())
  }

  /// List the projects of an owner
  pub fn projects(&self, owner: Owner) -> Paginated<'_, Project> {
    debug!("Listing projects of {}", owner);
    let (declaration, root) = owner.selection();
    let query = format!(
      r#"
query({declaration}$first: Int!, $after: String) {{
  {root} {{
    projectsV2(first: $first, after: $after) {{
      nodes {{ ...ProjectFields }}
      pageInfo {{ hasNextPage endCursor }}
      totalCount
    }}
  }}
}}"#
    );

    let mut request = GraphQlRequest::new(document(&query, &[PROJECT_FIELDS]));
    if let Some(login) = owner.login() {
      request = request.var("login", login);
    }
    self.paginate(request, vec![owner.root_field(), "projectsV2"])
  }
}
