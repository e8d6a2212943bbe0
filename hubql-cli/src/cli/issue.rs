//! # Issue Command

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use hubql_client::{CreateIssueInput, GitHubClient, Issue, IssueFilter, IssueState, RepoRef};
use tracing::info;

use super::repo::repository_id;
use super::{LimitArgs, number_arg, require};
use crate::output::{print_found, print_json, print_stream};

/// Command for issue operations
#[derive(Args)]
pub struct IssueArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: IssueSubcommands,
}

#[derive(Subcommand)]
pub enum IssueSubcommands {
  /// Show an issue
  View {
    repo: RepoRef,
    /// Issue number, '#123' or issue URL
    #[arg(value_parser = number_arg)]
    number: u32,
  },

  /// List issues of a repository
  #[command(alias = "ls")]
  List {
    repo: RepoRef,

    #[arg(long, value_enum, default_value_t = IssueStateArg::Open)]
    state: IssueStateArg,

    /// Only issues carrying this label (repeatable)
    #[arg(long = "label")]
    labels: Vec<String>,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// Open an issue
  Create {
    repo: RepoRef,

    #[arg(long)]
    title: String,

    #[arg(long)]
    body: Option<String>,
  },

  /// Close an issue
  Close {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,
  },

  /// Reopen a closed issue
  Reopen {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,
  },

  /// Comment on an issue or pull request
  Comment {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,

    #[arg(long)]
    body: String,
  },

  /// List comments of an issue or pull request
  Comments {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,

    #[command(flatten)]
    limit: LimitArgs,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueStateArg {
  Open,
  Closed,
  All,
}

impl IssueStateArg {
  fn states(self) -> Vec<IssueState> {
    match self {
      Self::Open => vec![IssueState::Open],
      Self::Closed => vec![IssueState::Closed],
      Self::All => Vec::new(),
    }
  }
}

pub(crate) async fn handle_issue_command(client: &GitHubClient, issue: IssueArgs) -> Result<()> {
  match issue.subcommand {
    IssueSubcommands::View { repo, number } => {
      let found = client
        .get_issue(&repo, number)
        .await
        .with_context(|| format!("Failed to fetch issue #{number} in {repo}"))?;
      print_found(found, &format!("Issue #{number} in {repo}"))
    }
    IssueSubcommands::List {
      repo,
      state,
      labels,
      limit,
    } => {
      let filter = IssueFilter {
        states: state.states(),
        labels,
        order: None,
      };
      print_stream(client.issues(&repo, filter)?, limit.limit).await?;
      Ok(())
    }
    IssueSubcommands::Create { repo, title, body } => {
      let input = CreateIssueInput {
        repository_id: repository_id(client, &repo).await?,
        title,
        body,
        ..CreateIssueInput::default()
      };
      let created = client.create_issue(input).await.context("Failed to create issue")?;
      info!("Opened issue #{} in {}", created.number, repo);
      print_json(&created)
    }
    IssueSubcommands::Close { repo, number } => {
      let issue = existing_issue(client, &repo, number).await?;
      print_json(&client.close_issue(&issue.id).await?)
    }
    IssueSubcommands::Reopen { repo, number } => {
      let issue = existing_issue(client, &repo, number).await?;
      print_json(&client.reopen_issue(&issue.id).await?)
    }
    IssueSubcommands::Comment { repo, number, body } => {
      let subject_id = match client.get_issue(&repo, number).await? {
        Some(issue) => issue.id,
        // Pull requests share the numbering and accept the same comments
        None => require(client.get_pull_request(&repo, number).await?, || {
          format!("Issue or pull request #{number} in {repo}")
        })?
        .id,
      };
      let comment = client.add_comment(&subject_id, &body).await.context("Failed to add comment")?;
      print_json(&comment)
    }
    IssueSubcommands::Comments { repo, number, limit } => {
      print_stream(client.issue_comments(&repo, number), limit.limit).await?;
      Ok(())
    }
  }
}

async fn existing_issue(client: &GitHubClient, repo: &RepoRef, number: u32) -> Result<Issue> {
  let found = client
    .get_issue(repo, number)
    .await
    .with_context(|| format!("Failed to fetch issue #{number} in {repo}"))?;
  require(found, || format!("Issue #{number} in {repo}"))
}
