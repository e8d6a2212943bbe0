//! # GitHub User Endpoints
//!
//! GitHub API endpoint implementations for user-related operations,
//! including the authenticated viewer and lookups by login.

use tracing::{info, instrument};

use super::document;
use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};
use crate::models::User;

pub(crate) const USER_FIELDS: &str = r#"
fragment UserFields on User {
  id
  login
  name
  bio
  company
  location
  url
  createdAt
}"#;

impl GitHubClient {
  /// Get the authenticated user
  #[instrument(skip(self), level = "debug")]
  pub async fn viewer(&self) -> Result<User> {
    let query = document("query { viewer { ...UserFields } }", &[USER_FIELDS]);
    let data = self.execute(&GraphQlRequest::new(query)).await?;
    let user: User = graphql::payload(&data, &["viewer"])?;
    info!("Authenticated as {}", user.login);
    Ok(user)
  }

  /// Get a user by login, `None` when no such user exists
  #[instrument(skip(self), level = "debug")]
  pub async fn get_user(&self, login: &str) -> Result<Option<User>> {
    let query = document(
      "query($login: String!) { user(login: $login) { ...UserFields } }",
      &[USER_FIELDS],
    );
    let data = self.execute_lookup(&GraphQlRequest::new(query).var("login", login)).await?;
    graphql::decode(&data, &["user"])
  }
}
