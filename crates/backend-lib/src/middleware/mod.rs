// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the gym backend.

pub mod auth;

pub use auth::{authenticate, bearer_token, AuthenticatedUser, Principal};
