pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod routes;
pub mod types;
pub mod validation;
pub mod views;

pub use api::{ApiClient, ApiResponse};
pub use auth::{SessionStore, TokenStore};
pub use error::ApiError;

#[cfg(test)]
pub mod testing;
