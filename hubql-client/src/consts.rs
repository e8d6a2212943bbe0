//! Constants for the hubql client

/// GraphQL endpoint of the official SaaS GitHub API
pub const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// User-Agent header value for the GitHub API client
pub const USER_AGENT: &str = concat!("hubql/", env!("CARGO_PKG_VERSION"));

/// Accept header value for GraphQL requests
pub const ACCEPT: &str = "application/json";

/// Page size used by list operations when the configuration does not set one
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest `first:` argument GitHub accepts on a connection
pub const MAX_PAGE_SIZE: u32 = 100;

/// Request timeout used when the configuration does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Hosts looked up in `.netrc` when discovering a token, in order
pub const NETRC_MACHINES: [&str; 2] = ["api.github.com", "github.com"];
