//! # HTTP Server Module
//!
//! Axum router, server configuration and middleware.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/products`, `/products/:id` - Product catalog
//! - `/users` - Registration
//! - `/auth` - Login

pub mod config;
pub mod health_routes;
pub mod middleware;
pub mod server;

pub use config::{AppConfig, ConfigError};
pub use middleware::{CorrelationId, CORRELATION_ID_HEADER};
pub use server::{build_router, HttpServer, ServerError};
