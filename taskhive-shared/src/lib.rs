//! # Taskhive Shared Library
//!
//! This crate contains the authorization and referential-consistency core of
//! taskhive, shared by the API server and any future binaries.
//!
//! ## Module Organization
//!
//! - `models`: Database models and entity stores
//! - `auth`: Principal resolution and the Access Evaluator
//! - `consistency`: Structural invariants and cascading-deletion protocols
//! - `notify`: Best-effort notification emitter
//! - `blob`: External blob-store collaborator
//! - `db`: Connection pool and migrations
//! - `error`: Common error taxonomy

pub mod auth;
pub mod blob;
pub mod consistency;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;

/// Current version of the taskhive shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
