//! # Search Command

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use hubql_client::{GitHubClient, SearchType};
use tracing::debug;

use super::LimitArgs;
use crate::output::print_stream;

/// Command for searching GitHub
#[derive(Args)]
pub struct SearchArgs {
  /// Query in GitHub's search syntax
  pub query: String,

  /// What to search for
  #[arg(short = 't', long = "type", value_enum, default_value_t = SearchKind::Issue)]
  pub kind: SearchKind,

  #[command(flatten)]
  pub limit: LimitArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
  /// Issues and pull requests
  Issue,
  #[value(alias = "repo")]
  Repository,
  /// Users and organizations
  User,
  Discussion,
}

impl From<SearchKind> for SearchType {
  fn from(value: SearchKind) -> Self {
    match value {
      SearchKind::Issue => Self::Issue,
      SearchKind::Repository => Self::Repository,
      SearchKind::User => Self::User,
      SearchKind::Discussion => Self::Discussion,
    }
  }
}

pub(crate) async fn handle_search_command(client: &GitHubClient, search: SearchArgs) -> Result<()> {
  let stream = client
    .search(&search.query, search.kind.into())
    .context("Failed to build search request")?;
  let written = print_stream(stream, search.limit.limit).await?;
  debug!("Printed {} search results", written);
  Ok(())
}
