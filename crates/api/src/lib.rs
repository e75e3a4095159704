//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Cookie-based authentication middleware
//! - The JSON response envelope and error rendering

pub mod cookies;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use riderledger_shared::config::CorsConfig;
use riderledger_shared::{EmailService, JwtService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for session token operations.
    pub jwt_service: Arc<JwtService>,
    /// Email service for sending emails.
    pub email_service: Arc<EmailService>,
    /// Whether the server runs in production mode. Controls cookie
    /// attributes and error detail exposure.
    pub production: bool,
}

/// Creates the main application router.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    response::set_expose_error_detail(!state.production);

    Router::new()
        .nest("/api/auth", routes::auth::routes(state.clone()))
        .nest("/api/user", routes::users::routes(state.clone()))
        .nest("/api/daily", routes::records::routes(state.clone()))
        .merge(routes::health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

/// Builds the CORS layer. A configured allow-list sends credentials (the
/// session travels as a cookie); without one the layer stays permissive
/// and credential-free for local tooling.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    }
}
