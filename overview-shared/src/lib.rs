//! # Overview Shared Library
//!
//! Types, storage, and authentication logic shared by the Overview dashboard
//! API server and the admin CLI.
//!
//! ## Module Organization
//!
//! - `auth`: Session tokens, password verification, and the request gate
//! - `db`: PostgreSQL pool and schema migrations
//! - `models`: Dashboard records (clients, subprojects, tasks, collaborators, events)
//! - `migration`: Legacy record normalization and snapshot merging
//! - `store`: Document store abstraction and snapshot loading

pub mod auth;
pub mod db;
pub mod migration;
pub mod models;
pub mod store;

/// Current version of the Overview shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
