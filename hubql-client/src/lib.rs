//! # GitHub GraphQL Client
//!
//! Typed bindings over GitHub's GraphQL API: repositories, issues, comments,
//! labels, milestones, pull requests, reviews, projects, organizations and
//! search. List operations return lazy, cursor-driven [`PageStream`]s that
//! fetch one page per request.

pub mod auth;
pub mod client;
pub mod config;
pub mod consts;
pub mod endpoints;
pub mod error;
pub mod graphql;
pub mod models;
pub mod pagination;
pub mod utils;

// Re-export the client
pub use auth::create_github_client_from_env;
pub use client::{GitHubClient, create_github_client};
pub use config::{ClientConfig, GitHubAuth};
pub use error::{Error, Result};
// Re-export models
pub use models::{
  Actor, Branch, Comment, GitObject, Issue, IssueState, Label, MergeMethod, MergeableState, Milestone, MilestoneRef,
  MilestoneState, Organization, Owner, Project, PullRequest, PullRequestState, RefName, RepoRef, Repository,
  RepositoryPrivacy, RepositoryVisibility, Review, ReviewEvent, ReviewState, SearchResult, SearchType, User,
};
pub use pagination::{Page, PageInfo, PageSource, PageStream, Paginated};
// Re-export endpoints structs
pub use endpoints::OrderDirection;
pub use endpoints::issues::{CreateIssueInput, IssueFilter, IssueOrder, IssueOrderField, UpdateIssueInput};
pub use endpoints::labels::{CreateLabelInput, UpdateLabelInput};
pub use endpoints::milestones::{MilestoneFilter, MilestoneOrder, MilestoneOrderField};
pub use endpoints::projects::{CreateProjectInput, UpdateProjectInput};
pub use endpoints::pulls::{
  CreatePullRequestInput, MergePullRequestInput, PullRequestFilter, PullRequestUpdateState, UpdatePullRequestInput,
};
pub use endpoints::repositories::{
  CreateRepositoryInput, RepositoryFilter, RepositoryOrder, RepositoryOrderField, UpdateRepositoryInput,
};
pub use endpoints::reviews::{AddReviewInput, DiffSide, DraftReviewThread};
