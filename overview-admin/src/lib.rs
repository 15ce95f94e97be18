//! # Overview Admin Library
//!
//! Operator tasks that have no HTTP surface: creating login accounts,
//! exporting and importing snapshots, and running the legacy migration by
//! hand. Every command works against any [`DocumentStore`], so the binary
//! uses PostgreSQL while the tests use the in-memory store.
//!
//! ## Modules
//!
//! - `cli`: Command line definition
//! - `commands`: The commands themselves
//!
//! [`DocumentStore`]: overview_shared::store::DocumentStore

pub mod cli;
pub mod commands;
