//! # HTTP Server
//!
//! Builds the router over the product and user handlers and serves it.

use std::net::SocketAddr;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::AppConfig;
use super::health_routes::health_routes;
use super::middleware::{correlation_id, make_span, require_token};
use crate::api::products::{
    create_products, delete_product, get_product, list_products, update_product,
};
use crate::api::users::{authenticate, register};
use crate::api::{ApiError, AppState};
use crate::store::MemoryStore;

/// Server startup errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid socket address {0}")]
    InvalidAddress(String),

    #[error("startup preparation failed: {0}")]
    Prepare(#[from] ApiError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Product routes; writes require a token
pub fn product_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/products", post(create_products))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route_layer(from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .merge(protected)
        .with_state(state)
}

/// Registration and login
pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", post(register))
        .route("/auth", post(authenticate))
        .with_state(state)
}

/// Full router with the middleware stack.
///
/// Outermost first: correlation id, CORS, tracing, timeout.
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(health_routes())
        .merge(product_routes(state.clone()))
        .merge(user_routes(state))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(cors)
        .layer(from_fn(correlation_id))
}

/// HTTP server over an in-process store
pub struct HttpServer {
    config: AppConfig,
    state: AppState,
}

impl HttpServer {
    /// Wire state from configuration and declare store indexes
    pub async fn new(config: AppConfig) -> Result<Self, ServerError> {
        let store = MemoryStore::new(config.db_target());
        let state = AppState::in_memory(
            &store,
            &config.db_name,
            &config.collection_name,
            &config.users_collection_name,
            &config.jwt(),
        );
        state.prepare().await?;

        tracing::info!(
            store = store.target(),
            database = %config.db_name,
            products = %config.collection_name,
            users = %config.users_collection_name,
            "store ready"
        );

        Ok(Self { config, state })
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Serve until the process is stopped
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.config.socket_addr()))?;

        let router = self.router();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "listening");

        axum::serve(listener, router).await?;
        Ok(())
    }
}
