//! # Pull Request Command

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use hubql_client::{
  AddReviewInput, CreatePullRequestInput, GitHubClient, MergeMethod, MergePullRequestInput, PullRequest,
  PullRequestFilter, PullRequestState, RepoRef, ReviewEvent,
};
use tracing::info;

use super::repo::repository_id;
use super::{LimitArgs, number_arg, require};
use crate::output::{print_found, print_json, print_stream};

/// Command for pull request operations
#[derive(Args)]
pub struct PrArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: PrSubcommands,
}

#[derive(Subcommand)]
pub enum PrSubcommands {
  /// Show a pull request
  View {
    repo: RepoRef,
    /// Pull request number, '#123' or pull request URL
    #[arg(value_parser = number_arg)]
    number: u32,
  },

  /// List pull requests of a repository
  #[command(alias = "ls")]
  List {
    repo: RepoRef,

    #[arg(long, value_enum, default_value_t = PrStateArg::Open)]
    state: PrStateArg,

    /// Only pull requests into this branch
    #[arg(long)]
    base: Option<String>,

    /// Only pull requests from this branch
    #[arg(long)]
    head: Option<String>,

    #[command(flatten)]
    limit: LimitArgs,
  },

  /// Open a pull request
  Create {
    repo: RepoRef,

    #[arg(long)]
    base: String,

    #[arg(long)]
    head: String,

    #[arg(long)]
    title: String,

    #[arg(long)]
    body: Option<String>,

    #[arg(long)]
    draft: bool,
  },

  /// Merge a pull request
  Merge {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,

    /// Defaults to the repository's preferred method
    #[arg(long, value_enum)]
    method: Option<MergeMethodArg>,
  },

  /// Close a pull request without merging
  Close {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,
  },

  /// Submit a review
  Review {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,

    #[arg(long, value_enum, default_value_t = ReviewEventArg::Comment)]
    event: ReviewEventArg,

    #[arg(long)]
    body: Option<String>,
  },

  /// List reviews of a pull request
  Reviews {
    repo: RepoRef,
    #[arg(value_parser = number_arg)]
    number: u32,

    #[command(flatten)]
    limit: LimitArgs,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrStateArg {
  Open,
  Closed,
  Merged,
  All,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeMethodArg {
  Merge,
  Squash,
  Rebase,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewEventArg {
  Comment,
  Approve,
  RequestChanges,
}

impl PrStateArg {
  fn states(self) -> Vec<PullRequestState> {
    match self {
      Self::Open => vec![PullRequestState::Open],
      Self::Closed => vec![PullRequestState::Closed],
      Self::Merged => vec![PullRequestState::Merged],
      Self::All => Vec::new(),
    }
  }
}

impl From<MergeMethodArg> for MergeMethod {
  fn from(value: MergeMethodArg) -> Self {
    match value {
      MergeMethodArg::Merge => Self::Merge,
      MergeMethodArg::Squash => Self::Squash,
      MergeMethodArg::Rebase => Self::Rebase,
    }
  }
}

impl From<ReviewEventArg> for ReviewEvent {
  fn from(value: ReviewEventArg) -> Self {
    match value {
      ReviewEventArg::Comment => Self::Comment,
      ReviewEventArg::Approve => Self::Approve,
      ReviewEventArg::RequestChanges => Self::RequestChanges,
    }
  }
}

pub(crate) async fn handle_pr_command(client: &GitHubClient, pr: PrArgs) -> Result<()> {
  match pr.subcommand {
    PrSubcommands::View { repo, number } => {
      let found = client
        .get_pull_request(&repo, number)
        .await
        .with_context(|| format!("Failed to fetch pull request #{number} in {repo}"))?;
      print_found(found, &format!("Pull request #{number} in {repo}"))
    }
    PrSubcommands::List {
      repo,
      state,
      base,
      head,
      limit,
    } => {
      let filter = PullRequestFilter {
        states: state.states(),
        base_ref_name: base,
        head_ref_name: head,
        ..PullRequestFilter::default()
      };
      print_stream(client.pull_requests(&repo, filter)?, limit.limit).await?;
      Ok(())
    }
    PrSubcommands::Create {
      repo,
      base,
      head,
      title,
      body,
      draft,
    } => {
      let input = CreatePullRequestInput {
        repository_id: repository_id(client, &repo).await?,
        base_ref_name: base,
        head_ref_name: head,
        title,
        body,
        draft: draft.then_some(true),
        maintainer_can_modify: None,
      };
      let created = client
        .create_pull_request(input)
        .await
        .context("Failed to create pull request")?;
      info!("Opened pull request #{} in {}", created.number, repo);
      print_json(&created)
    }
    PrSubcommands::Merge { repo, number, method } => {
      let pr = existing_pull_request(client, &repo, number).await?;
      let input = MergePullRequestInput {
        pull_request_id: pr.id,
        merge_method: method.map(Into::into),
        expected_head_oid: None,
        ..MergePullRequestInput::default()
      };
      let merged = client
        .merge_pull_request(input)
        .await
        .with_context(|| format!("Failed to merge pull request #{number} in {repo}"))?;
      print_json(&merged)
    }
    PrSubcommands::Close { repo, number } => {
      let pr = existing_pull_request(client, &repo, number).await?;
      print_json(&client.close_pull_request(&pr.id).await?)
    }
    PrSubcommands::Review {
      repo,
      number,
      event,
      body,
    } => {
      let pr = existing_pull_request(client, &repo, number).await?;
      let input = AddReviewInput {
        pull_request_id: pr.id,
        body,
        event: Some(event.into()),
        ..AddReviewInput::default()
      };
      let review = client.add_review(input).await.context("Failed to submit review")?;
      print_json(&review)
    }
    PrSubcommands::Reviews { repo, number, limit } => {
      print_stream(client.reviews(&repo, number), limit.limit).await?;
      Ok(())
    }
  }
}

async fn existing_pull_request(client: &GitHubClient, repo: &RepoRef, number: u32) -> Result<PullRequest> {
  let found = client
    .get_pull_request(repo, number)
    .await
    .with_context(|| format!("Failed to fetch pull request #{number} in {repo}"))?;
  require(found, || format!("Pull request #{number} in {repo}"))
}
