//! # Organization Command

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use hubql_client::GitHubClient;

use super::LimitArgs;
use crate::output::{print_found, print_stream};

/// Command for organization operations
#[derive(Args)]
pub struct OrgArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: OrgSubcommands,
}

#[derive(Subcommand)]
pub enum OrgSubcommands {
  /// Show an organization
  View { login: String },

  /// List organizations the viewer or a user belongs to
  #[command(alias = "ls")]
  List {
    /// List this user's organizations instead of the viewer's
    #[arg(long)]
    user: Option<String>,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// List members of an organization
  Members {
    login: String,

    #[command(flatten)]
    limit: LimitArgs,
  },
}

pub(crate) async fn handle_org_command(client: &GitHubClient, org: OrgArgs) -> Result<()> {
  match org.subcommand {
    OrgSubcommands::View { login } => {
      let found = client
        .get_organization(&login)
        .await
        .with_context(|| format!("Failed to fetch organization {login}"))?;
      print_found(found, &format!("Organization {login}"))
    }
    OrgSubcommands::List { user, limit } => {
      print_stream(client.organizations(user.as_deref()), limit.limit).await?;
      Ok(())
    }
    OrgSubcommands::Members { login, limit } => {
      print_stream(client.members(&login), limit.limit).await?;
      Ok(())
    }
  }
}
