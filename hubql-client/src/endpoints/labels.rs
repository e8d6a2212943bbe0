//! # GitHub Label Endpoints

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::document;
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{Label, RepoRef};
use crate::pagination::Paginated;

pub(crate) const LABEL_FIELDS: &str = r#"
fragment LabelFields on Label {
  id
  name
  color
  description
  isDefault
}"#;

const GET_LABEL: &str = r#"
query($owner: String!, $name: String!, $label: String!) {
  repository(owner: $owner, name: $name) {
    label(name: $label) { ...LabelFields }
  }
}"#;

const CREATE_LABEL: &str = r#"
mutation($input: CreateLabelInput!) {
  createLabel(input: $input) { label { ...LabelFields } }
}"#;

const UPDATE_LABEL: &str = r#"
mutation($input: UpdateLabelInput!) {
  updateLabel(input: $input) { label { ...LabelFields } }
}"#;

const DELETE_LABEL: &str = r#"
mutation($input: DeleteLabelInput!) {
  deleteLabel(input: $input) { clientMutationId }
}"#;

const LIST_LABELS: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    labels(first: $first, after: $after) {
      nodes { ...LabelFields }
      pageInfo { hasNextPage endCursor }
      totalCount
    }
  }
}"#;

/// Parameters for creating a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelInput {
  pub repository_id: String,
  pub name: String,
  /// Six-digit hex color without the leading `#`
  pub color: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// Parameters for editing a label; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabelInput {
  pub id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl GitHubClient {
  /// Get a label by name
  #[instrument(skip(self), level = "debug")]
  pub async fn get_label(&self, repo: &RepoRef, name: &str) -> Result<Option<Label>> {
    let request = GraphQlRequest::new(document(GET_LABEL, &[LABEL_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str())
      .var("label", name);
    let data = self.execute_lookup(&request).await?;
    graphql::decode(&data, &["repository", "label"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn create_label(&self, input: CreateLabelInput) -> Result<Label> {
    let request = GraphQlRequest::new(document(CREATE_LABEL, &[LABEL_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    let label: Label = graphql::payload(&data, &["createLabel", "label"])?;
    info!("Created label {}", label.name);
    Ok(label)
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn update_label(&self, input: UpdateLabelInput) -> Result<Label> {
    let request = GraphQlRequest::new(document(UPDATE_LABEL, &[LABEL_FIELDS])).try_var("input", &input)?;
    let data = self.execute(&request).await?;
    graphql::payload(&data, &["updateLabel", "label"])
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn delete_label(&self, label_id: &str) -> Result<()> {
    let request = GraphQlRequest::new(DELETE_LABEL.trim()).var("input", json!({ "id": label_id }));
    let data = self.execute(&request).await?;
    graphql::payload::<Value>(&data, &["deleteLabel"])?;
    info!("Deleted label {}", label_id);
    Ok(())
  }

  pub fn labels(&self, repo: &RepoRef) -> Paginated<'_, Label> {
    debug!("Listing labels of {}", repo);
    let request = GraphQlRequest::new(document(LIST_LABELS, &[LABEL_FIELDS]))
      .var("owner", repo.owner.as_str())
      .var("name", repo.name.as_str());
    self.paginate(request, vec!["repository", "labels"])
  }
}
