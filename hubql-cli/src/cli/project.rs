//! # Project Command
//!
//! Projects (v2) belong to a user or an organization rather than a
//! repository, so every subcommand takes the owner flags.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use hubql_client::{CreateProjectInput, GitHubClient, Owner};
use tracing::info;

use super::{LimitArgs, OwnerArgs, number_arg, require};
use crate::output::{print_found, print_json, print_stream};

/// Command for project operations
#[derive(Args)]
pub struct ProjectArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ProjectSubcommands,
}

#[derive(Subcommand)]
pub enum ProjectSubcommands {
  /// List projects
  #[command(alias = "ls")]
  List {
    #[command(flatten)]
    owner: OwnerArgs,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// Show a project by number
  View {
    #[arg(value_parser = number_arg)]
    number: u32,

    #[command(flatten)]
    owner: OwnerArgs,
  },

  /// Create a project
  Create {
    title: String,

    #[command(flatten)]
    owner: OwnerArgs,
  },

  /// Delete a project by number
  Delete {
    #[arg(value_parser = number_arg)]
    number: u32,

    #[command(flatten)]
    owner: OwnerArgs,
  },
}

pub(crate) async fn handle_project_command(client: &GitHubClient, project: ProjectArgs) -> Result<()> {
  match project.subcommand {
    ProjectSubcommands::List { owner, limit } => {
      print_stream(client.projects(owner.owner()), limit.limit).await?;
      Ok(())
    }
    ProjectSubcommands::View { number, owner } => {
      let owner = owner.owner();
      let found = client.get_project(owner.clone(), number).await?;
      print_found(found, &format!("Project #{number} of {owner}"))
    }
    ProjectSubcommands::Create { title, owner } => {
      let input = CreateProjectInput {
        owner_id: owner_id(client, &owner.owner()).await?,
        title,
        repository_id: None,
      };
      print_json(&client.create_project(input).await.context("Failed to create project")?)
    }
    ProjectSubcommands::Delete { number, owner } => {
      let owner = owner.owner();
      let found = client.get_project(owner.clone(), number).await?;
      let project = require(found, || format!("Project #{number} of {owner}"))?;
      client.delete_project(&project.id).await?;
      info!("Deleted project #{} of {}", number, owner);
      Ok(())
    }
  }
}

/// Node id of the account new projects are created under
async fn owner_id(client: &GitHubClient, owner: &Owner) -> Result<String> {
  match owner {
    Owner::Viewer => Ok(client.viewer().await?.id),
    Owner::User(login) => Ok(require(client.get_user(login).await?, || format!("User {login}"))?.id),
    Owner::Organization(login) => {
      Ok(require(client.get_organization(login).await?, || format!("Organization {login}"))?.id)
    }
  }
}
