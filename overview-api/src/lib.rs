//! # Overview API Server Library
//!
//! HTTP server for the Overview dashboard: the session-gated collection API,
//! login/logout, and whole-store snapshots.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
