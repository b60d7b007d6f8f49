//! Service layer for the duel-finder matchmaking service
//!
//! This module contains the application state, the HTTP handlers and server,
//! and health reporting for the production service.

pub mod app;
pub mod handlers;
pub mod health;
pub mod server;

pub use app::{AppState, ServiceError};
pub use handlers::{error_response, MatchQuery, INTERNAL_ERROR_BODY};
pub use health::{ComponentCheck, HealthCheck, HealthStatus};
pub use server::{router, HttpServer};
