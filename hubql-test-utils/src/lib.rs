//! Test utilities shared across the hubql workspace
//!
//! This crate provides common testing infrastructure including:
//! - Temporary `.netrc` homes ([`NetrcGuard`])
//! - GraphQL response envelopes and connection pages ([`graphql`])
//! - JSON fixtures for every GitHub record the client decodes ([`fixtures`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod fixtures;
pub mod graphql;
pub mod netrc;

// Re-export commonly used items
pub use graphql::{connection, graphql_data, graphql_errors, graphql_not_found, mount_graphql};
pub use netrc::NetrcGuard;
