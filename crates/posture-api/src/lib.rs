//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /analyze` for remote-video posture analysis
//! - Health endpoints
//! - CORS, request IDs, request logging and security headers

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
