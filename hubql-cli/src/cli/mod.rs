//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the hubql tool. Every
//! subcommand maps onto one or two client operations and prints the result
//! as JSON.

mod issue;
mod org;
mod pr;
mod project;
mod repo;
mod search;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Args, Parser, Subcommand};
use hubql_client::auth::with_discovered_token;
use hubql_client::utils::parse_number;
use hubql_client::{ClientConfig, GitHubClient, Owner};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::output::{print_found, print_json};

/// Top-level CLI command for the hubql tool
#[derive(Parser)]
#[command(name = "hubql")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Query and script the GitHub GraphQL API")]
#[command(long_about = "hubql reads and edits GitHub repositories, issues, pull requests and more\n\
        through the GraphQL API. Lists are paged transparently and printed as one\n\
        JSON record per line; single records are printed as pretty JSON.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Read client settings from this TOML file instead of the default location
  #[arg(long, global = true, value_name = "PATH")]
  pub config: Option<PathBuf>,

  /// GitHub token; falls back to GITHUB_TOKEN, GH_TOKEN and ~/.netrc
  #[arg(long, global = true)]
  pub token: Option<String>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the hubql tool
#[derive(Subcommand)]
pub enum Commands {
  /// Check that the configured token authenticates
  #[command(long_about = "Sends a minimal query to verify that the endpoint is reachable and\n\
            that the token is accepted. Prints the authenticated user on success.")]
  Check,

  /// Show the authenticated user
  #[command(alias = "whoami")]
  Viewer,

  /// Show a user by login
  User {
    /// The user's login
    login: String,
  },

  /// Repository operations
  #[command(alias = "r")]
  Repo(repo::RepoArgs),

  /// Issue operations
  #[command(alias = "i")]
  Issue(issue::IssueArgs),

  /// Pull request operations
  #[command(alias = "pull")]
  Pr(pr::PrArgs),

  /// Projects (v2) of a user or organization
  Project(project::ProjectArgs),

  /// Organization operations
  Org(org::OrgArgs),

  /// Search GitHub
  #[command(long_about = "Search GitHub using its search syntax.\n\n\
            Examples: 'repo:owner/name is:open label:bug', 'language:rust stars:>100'.\n\
            Issue searches return both issues and pull requests.")]
  Search(search::SearchArgs),
}

/// Selects the owner a list is rooted at; the authenticated user by default
#[derive(Args, Debug, Clone, Default)]
pub struct OwnerArgs {
  /// List for this organization
  #[arg(long, conflicts_with = "user")]
  pub org: Option<String>,

  /// List for this user
  #[arg(long)]
  pub user: Option<String>,
}

impl OwnerArgs {
  pub fn owner(&self) -> Owner {
    match (&self.org, &self.user) {
      (Some(org), _) => Owner::Organization(org.clone()),
      (None, Some(user)) => Owner::User(user.clone()),
      (None, None) => Owner::Viewer,
    }
  }
}

/// Caps how many records a list command prints
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct LimitArgs {
  /// Stop after this many records; no further pages are fetched
  #[arg(short = 'L', long)]
  pub limit: Option<usize>,
}

/// Accepts `123`, `#123` or an issue/pull request URL
pub(crate) fn number_arg(input: &str) -> Result<u32, String> {
  parse_number(input).map_err(|e| e.to_string())
}

/// Fail with "`what` not found" when a lookup came back empty
pub(crate) fn require<T>(value: Option<T>, what: impl FnOnce() -> String) -> Result<T> {
  value.with_context(|| format!("{} not found", what()))
}

/// Build a client from the configuration file, the `--token` flag and the
/// usual token sources, in that order of precedence for the token
fn build_client(config: Option<&PathBuf>, token: Option<&str>) -> Result<GitHubClient> {
  let mut client_config = match config {
    Some(path) => ClientConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))?,
    None => ClientConfig::load_default().context("Failed to load the client configuration")?,
  };

  if let Some(token) = token {
    client_config.auth.token = token.to_string();
  }
  let client_config = with_discovered_token(client_config);

  debug!("Using endpoint {}", client_config.endpoint);
  GitHubClient::new(client_config).context("Failed to create GitHub client")
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  let client = build_client(cli.config.as_ref(), cli.token.as_deref())?;

  // Create a runtime for the async API calls
  let rt = Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(dispatch(&client, cli.command))
}

async fn dispatch(client: &GitHubClient, command: Commands) -> Result<()> {
  match command {
    Commands::Check => handle_check_command(client).await,
    Commands::Viewer => {
      let viewer = client.viewer().await.context("Failed to fetch the authenticated user")?;
      print_json(&viewer)
    }
    Commands::User { login } => {
      let user = client
        .get_user(&login)
        .await
        .with_context(|| format!("Failed to fetch user {login}"))?;
      print_found(user, &format!("User {login}"))
    }
    Commands::Repo(repo) => repo::handle_repo_command(client, repo).await,
    Commands::Issue(issue) => issue::handle_issue_command(client, issue).await,
    Commands::Pr(pr) => pr::handle_pr_command(client, pr).await,
    Commands::Project(project) => project::handle_project_command(client, project).await,
    Commands::Org(org) => org::handle_org_command(client, org).await,
    Commands::Search(search) => search::handle_search_command(client, search).await,
  }
}

async fn handle_check_command(client: &GitHubClient) -> Result<()> {
  if !client
    .test_connection()
    .await
    .context("Failed to reach the GitHub API")?
  {
    anyhow::bail!("GitHub rejected the credentials; set GITHUB_TOKEN or add a machine entry to ~/.netrc");
  }

  let viewer = client.viewer().await.context("Failed to fetch the authenticated user")?;
  info!("Authenticated as {}", viewer.login);
  print_json(&viewer)
}
