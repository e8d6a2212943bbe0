//! # GitHub API Endpoints
//!
//! Query builders and operations for each GitHub resource type. Every module
//! owns the GraphQL fragment for its record and extends [`GitHubClient`] with
//! the operations on that record.
//!
//! [`GitHubClient`]: crate::GitHubClient

pub mod comments;
pub mod issues;
pub mod labels;
pub mod milestones;
pub mod organizations;
pub mod projects;
pub mod pulls;
pub mod repositories;
pub mod reviews;
pub mod search;
pub mod users;

use serde::{Deserialize, Serialize};

/// Join an operation with the fragment definitions it spreads
pub(crate) fn document(operation: &str, fragments: &[&str]) -> String {
  let mut doc = operation.trim().to_string();
  for fragment in fragments {
    doc.push('\n');
    doc.push_str(fragment.trim());
  }
  doc
}

/// An empty filter list is sent as `null` so GitHub applies no filter
pub(crate) fn non_empty<T>(items: &[T]) -> Option<&[T]> {
  if items.is_empty() { None } else { Some(items) }
}

/// Sort direction shared by every ordered connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDirection {
  Asc,
  #[default]
  Desc,
}

/// Client pointed at a wiremock server
#[cfg(test)]
pub(crate) fn test_client(uri: &str) -> crate::GitHubClient {
  let mut config = crate::ClientConfig::with_token("test_token");
  config.endpoint = format!("{uri}/graphql");
  crate::GitHubClient::new(config).expect("mock endpoint is valid")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_document_appends_fragments() {
    let doc = document(
      "\n query { viewer { ...UserFields } }\n",
      &["\nfragment UserFields on User { login }\n"],
    );
    assert_eq!(doc, "query { viewer { ...UserFields } }\nfragment UserFields on User { login }");
  }

  #[test]
  fn test_non_empty() {
    let empty: [u8; 0] = [];
    assert!(non_empty(&empty).is_none());
    assert_eq!(non_empty(&[1, 2]), Some(&[1, 2][..]));
  }
}
