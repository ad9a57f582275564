//! # nicelab-api
//!
//! HTTP API layer for NiceLab built on Axum.
//!
//! Provides the auth and pipeline endpoints, the session-token extractor,
//! request logging and CORS middleware, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::{ServiceScope, build_router};
pub use state::AppState;
