//! # TaskHive Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the TaskHive API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication, tenant scoping, and authorization
//! - `db`: Database connection pool management

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskHive shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
