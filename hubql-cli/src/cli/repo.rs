//! # Repository Command
//!
//! Repository lookups and edits, plus the per-repository collections that
//! have no command of their own: branches, collaborators, labels and
//! milestones.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use hubql_client::{
  CreateLabelInput, CreateRepositoryInput, GitHubClient, MilestoneFilter, MilestoneState, RepoRef, RepositoryFilter,
  RepositoryPrivacy, RepositoryVisibility,
};
use tracing::info;

use super::{LimitArgs, OwnerArgs, number_arg, require};
use crate::output::{print_found, print_json, print_stream};

/// Command for repository operations
#[derive(Args)]
pub struct RepoArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: RepoSubcommands,
}

#[derive(Subcommand)]
pub enum RepoSubcommands {
  /// Show a repository
  View {
    /// Repository as owner/name or a GitHub URL
    repo: RepoRef,
  },

  /// List repositories of the viewer, a user or an organization
  #[command(alias = "ls")]
  List {
    #[command(flatten)]
    owner: OwnerArgs,

    /// Only public or only private repositories
    #[arg(long, value_enum)]
    privacy: Option<PrivacyArg>,

    /// Leave out forks
    #[arg(long)]
    no_forks: bool,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// Create a repository owned by the viewer
  Create {
    name: String,

    #[arg(long, value_enum, default_value_t = VisibilityArg::Private)]
    visibility: VisibilityArg,

    #[arg(long)]
    description: Option<String>,
  },

  /// Archive a repository
  Archive { repo: RepoRef },

  /// Unarchive a repository
  Unarchive { repo: RepoRef },

  /// List branches
  #[command(alias = "br")]
  Branches {
    repo: RepoRef,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// List collaborators
  Collaborators {
    repo: RepoRef,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// Label operations
  Label {
    #[command(subcommand)]
    subcommand: LabelSubcommands,
  },

  /// Milestone operations
  Milestone {
    #[command(subcommand)]
    subcommand: MilestoneSubcommands,
  },
}

#[derive(Subcommand)]
pub enum LabelSubcommands {
  /// List labels
  #[command(alias = "ls")]
  List {
    repo: RepoRef,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// Show a label by name
  View { repo: RepoRef, name: String },

  /// Create a label
  Create {
    repo: RepoRef,
    name: String,

    /// Hex color without the leading '#'
    #[arg(long, default_value = "ededed")]
    color: String,

    #[arg(long)]
    description: Option<String>,
  },

  /// Delete a label by name
  Delete { repo: RepoRef, name: String },
}

#[derive(Subcommand)]
pub enum MilestoneSubcommands {
  /// List milestones
  #[command(alias = "ls")]
  List {
    repo: RepoRef,

    #[arg(long, value_enum, default_value_t = MilestoneStateArg::Open)]
    state: MilestoneStateArg,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// Show a milestone by number
  View {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrivacyArg {
  Public,
  Private,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityArg {
  Public,
  Private,
  Internal,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MilestoneStateArg {
  Open,
  Closed,
  All,
}

impl From<PrivacyArg> for RepositoryPrivacy {
  fn from(value: PrivacyArg) -> Self {
    match value {
      PrivacyArg::Public => Self::Public,
      PrivacyArg::Private => Self::Private,
    }
  }
}

impl From<VisibilityArg> for RepositoryVisibility {
  fn from(value: VisibilityArg) -> Self {
    match value {
      VisibilityArg::Public => Self::Public,
      VisibilityArg::Private => Self::Private,
      VisibilityArg::Internal => Self::Internal,
    }
  }
}

impl MilestoneStateArg {
  fn states(self) -> Vec<MilestoneState> {
    match self {
      Self::Open => vec![MilestoneState::Open],
      Self::Closed => vec![MilestoneState::Closed],
      Self::All => Vec::new(),
    }
  }
}

pub(crate) async fn handle_repo_command(client: &GitHubClient, repo: RepoArgs) -> Result<()> {
  match repo.subcommand {
    RepoSubcommands::View { repo } => {
      let found = client
        .get_repository(&repo)
        .await
        .with_context(|| format!("Failed to fetch {repo}"))?;
      print_found(found, &format!("Repository {repo}"))
    }
    RepoSubcommands::List {
      owner,
      privacy,
      no_forks,
      limit,
    } => {
      let filter = RepositoryFilter {
        privacy: privacy.map(Into::into),
        is_fork: no_forks.then_some(false),
        order: None,
      };
      let stream = client.repositories(owner.owner(), filter)?;
      print_stream(stream, limit.limit).await?;
      Ok(())
    }
    RepoSubcommands::Create {
      name,
      visibility,
      description,
    } => {
      let input = CreateRepositoryInput {
        description,
        ..CreateRepositoryInput::new(name, visibility.into())
      };
      let created = client.create_repository(input).await.context("Failed to create repository")?;
      info!("Created {}", created.name_with_owner);
      print_json(&created)
    }
    RepoSubcommands::Archive { repo } => {
      let id = repository_id(client, &repo).await?;
      print_json(&client.archive_repository(&id).await?)
    }
    RepoSubcommands::Unarchive { repo } => {
      let id = repository_id(client, &repo).await?;
      print_json(&client.unarchive_repository(&id).await?)
    }
    RepoSubcommands::Branches { repo, limit } => {
      print_stream(client.branches(&repo), limit.limit).await?;
      Ok(())
    }
    RepoSubcommands::Collaborators { repo, limit } => {
      print_stream(client.collaborators(&repo), limit.limit).await?;
      Ok(())
    }
    RepoSubcommands::Label { subcommand } => handle_label_command(client, subcommand).await,
    RepoSubcommands::Milestone { subcommand } => handle_milestone_command(client, subcommand).await,
  }
}

async fn handle_label_command(client: &GitHubClient, subcommand: LabelSubcommands) -> Result<()> {
  match subcommand {
    LabelSubcommands::List { repo, limit } => {
      print_stream(client.labels(&repo), limit.limit).await?;
      Ok(())
    }
    LabelSubcommands::View { repo, name } => {
      let label = client.get_label(&repo, &name).await?;
      print_found(label, &format!("Label '{name}' in {repo}"))
    }
    LabelSubcommands::Create {
      repo,
      name,
      color,
      description,
    } => {
      let input = CreateLabelInput {
        repository_id: repository_id(client, &repo).await?,
        name,
        color: color.trim_start_matches('#').to_string(),
        description,
      };
      print_json(&client.create_label(input).await.context("Failed to create label")?)
    }
    LabelSubcommands::Delete { repo, name } => {
      let label = require(client.get_label(&repo, &name).await?, || format!("Label '{name}' in {repo}"))?;
      client.delete_label(&label.id).await?;
      info!("Deleted label '{}' from {}", name, repo);
      Ok(())
    }
  }
}

async fn handle_milestone_command(client: &GitHubClient, subcommand: MilestoneSubcommands) -> Result<()> {
  match subcommand {
    MilestoneSubcommands::List { repo, state, limit } => {
      let filter = MilestoneFilter {
        states: state.states(),
        order: None,
      };
      print_stream(client.milestones(&repo, filter)?, limit.limit).await?;
      Ok(())
    }
    MilestoneSubcommands::View { repo, number } => {
      let milestone = client.get_milestone(&repo, number).await?;
      print_found(milestone, &format!("Milestone #{number} in {repo}"))
    }
  }
}

/// Resolve the node id mutations address a repository by
pub(crate) async fn repository_id(client: &GitHubClient, repo: &RepoRef) -> Result<String> {
  let found = client
    .get_repository(repo)
    .await
    .with_context(|| format!("Failed to fetch {repo}"))?;
  Ok(require(found, || format!("Repository {repo}"))?.id)
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;
  use crate::cli::{Cli, Commands};

  fn parse(args: &[&str]) -> anyhow::Result<RepoSubcommands> {
    let cli = Cli::try_parse_from(["hubql", "repo"].iter().chain(args))?;
    match cli.command {
      Commands::Repo(repo) => Ok(repo.subcommand),
      _ => anyhow::bail!("expected a repo command"),
    }
  }

  #[test]
  fn test_view_accepts_urls() -> anyhow::Result<()> {
    let RepoSubcommands::View { repo } = parse(&["view", "https://github.com/octocat/Hello-World.git"])? else {
      anyhow::bail!("expected view");
    };
    assert_eq!(repo, RepoRef::new("octocat", "Hello-World"));
    Ok(())
  }

  #[test]
  fn test_list_flags() -> anyhow::Result<()> {
    let RepoSubcommands::List {
      owner,
      privacy,
      no_forks,
      limit,
    } = parse(&["ls", "--org", "github", "--privacy", "public", "--no-forks", "-L", "5"])?
    else {
      anyhow::bail!("expected list");
    };
    assert_eq!(owner.org.as_deref(), Some("github"));
    assert_eq!(privacy, Some(PrivacyArg::Public));
    assert!(no_forks);
    assert_eq!(limit.limit, Some(5));
    Ok(())
  }

  #[test]
  fn test_invalid_repo_is_rejected() {
    assert!(parse(&["view", "not-a-repo"]).is_err());
  }

  #[test]
  fn test_milestone_states() {
    assert_eq!(MilestoneStateArg::Open.states(), vec![MilestoneState::Open]);
    assert!(MilestoneStateArg::All.states().is_empty());
  }
}
