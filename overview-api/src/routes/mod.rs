/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Login and logout
/// - `collections`: CRUD over the dashboard collections
/// - `snapshot`: Whole-store export and import

pub mod auth;
pub mod collections;
pub mod health;
pub mod snapshot;
