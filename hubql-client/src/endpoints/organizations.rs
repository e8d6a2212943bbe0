//! # GitHub Organization Endpoints

use tracing::{debug, instrument};

use super::document;
use super::users::USER_FIELDS;
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::{Organization, Owner, User};
use crate::pagination::Paginated;

pub(crate) const ORGANIZATION_FIELDS: &str = r#"
fragment OrganizationFields on Organization {
  id
  login
  name
  description
  url
  websiteUrl
}"#;

const GET_ORGANIZATION: &str = r#"
query($login: String!) {
  organization(login: $login) { ...OrganizationFields }
}"#;

const LIST_MEMBERS: &str = r#"
query($login: String!, $first: Int!, $after: String) {
  organization(login: $login) {
    membersWithRole(first: $first, after: $after) {
      nodes { ...UserFields }
      pageInfo { hasNextPage endCursor }
      totalCount
    }
  }
}"#;

impl GitHubClient {
  #[instrument(skip(self), level = "debug")]
  pub async fn get_organization(&self, login: &str) -> Result<Option<Organization>> {
    let request = GraphQlRequest::new(document(GET_ORGANIZATION, &[ORGANIZATION_FIELDS])).var("login", login);
    let data = self.execute_lookup(&request).await?;
    graphql::decode(&data, &["organization"])
  }

  /// List the organizations a user belongs to; the viewer's when `login` is
  /// `None`
  pub fn organizations(&self, login: Option<&str>) -> Paginated<'_, Organization> {
    let owner = login.map_or(Owner::Viewer, |login| Owner::User(login.to_string()));
    debug!("Listing organizations of {}", owner);

    let (declaration, root) = owner.selection();
    let query = format!(
      r#"
query({declaration}$first: Int!, $after: String) {{
  {root} {{
    organizations(first: $first, after: $after) {{
      nodes {{ ...OrganizationFields }}
      pageInfo {{ hasNextPage endCursor }}
      totalCount
    }}
  }}
}}"#
    );

    let mut request = GraphQlRequest::new(document(&query, &[ORGANIZATION_FIELDS]));
    if let Some(login) = owner.login() {
      request = request.var("login", login);
    }
    self.paginate(request, vec![owner.root_field(), "organizations"])
  }

  /// List the members of an organization
  pub fn members(&self, login: &str) -> Paginated<'_, User> {
    debug!("Listing members of {}", login);
    let request = GraphQlRequest::new(document(LIST_MEMBERS, &[USER_FIELDS])).var("login", login);
    self.paginate(request, vec!["organization", "membersWithRole"])
  }
}

#[cfg(test)]
mod tests {
  use hubql_test_utils::{connection, fixtures, graphql_data, graphql_not_found, mount_graphql};
  use serde_json::json;
  use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::endpoints::test_client;

  #[tokio::test]
  async fn test_get_organization() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({ "variables": { "login": "github" } })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(&["organization"], fixtures::organization("github"))))
      .mount(&mock_server)
      .await;

    let org = client.get_organization("github").await?.expect("organization should exist");
    assert_eq!(org.name.as_deref(), Some("GITHUB"));
    assert!(org.website_url.is_none());

    Ok(())
  }

  #[tokio::test]
  async fn test_get_missing_organization() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());
    mount_graphql(&mock_server, graphql_data(&["organization"], json!(null))).await;

    assert!(client.get_organization("ghost").await?.is_none());

    Ok(())
  }

  #[tokio::test]
  async fn test_get_organization_not_found_is_none() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());
    mount_graphql(
      &mock_server,
      graphql_not_found(&["organization"], "Could not resolve to an Organization with the login of 'ghost'."),
    )
    .await;

    assert!(client.get_organization("ghost").await?.is_none());

    Ok(())
  }

  #[tokio::test]
  async fn test_members_of_missing_organization_is_empty() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());
    mount_graphql(
      &mock_server,
      graphql_not_found(&["organization"], "Could not resolve to an Organization with the login of 'ghost'."),
    )
    .await;

    assert!(client.members("ghost").collect_all().await?.is_empty());

    Ok(())
  }

  #[tokio::test]
  async fn test_viewer_organizations() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_string_contains("viewer"))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["viewer", "organizations"],
        connection(vec![fixtures::organization("github"), fixtures::organization("rust-lang")], None),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let orgs = client.organizations(None).collect_all().await?;
    let logins: Vec<_> = orgs.iter().map(|o| o.login.as_str()).collect();
    assert_eq!(logins, vec!["github", "rust-lang"]);

    Ok(())
  }

  #[tokio::test]
  async fn test_user_organizations() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_string_contains("user(login: $login)"))
      .and(body_partial_json(json!({ "variables": { "login": "hubot" } })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["user", "organizations"],
        connection(vec![fixtures::organization("github")], None),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let orgs = client.organizations(Some("hubot")).collect_all().await?;
    assert_eq!(orgs.len(), 1);

    Ok(())
  }

  #[tokio::test]
  async fn test_members_across_pages() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({ "variables": { "login": "github", "after": null } })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["organization", "membersWithRole"],
        connection(vec![fixtures::user("octocat")], Some("MQ")),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("POST"))
      .and(path("/graphql"))
      .and(body_partial_json(json!({ "variables": { "after": "MQ" } })))
      .respond_with(ResponseTemplate::new(200).set_body_json(graphql_data(
        &["organization", "membersWithRole"],
        connection(vec![fixtures::user("hubot")], None),
      )))
      .expect(1)
      .mount(&mock_server)
      .await;

    let members = client.members("github").collect_all().await?;
    let logins: Vec<_> = members.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["octocat", "hubot"]);

    Ok(())
  }
}
