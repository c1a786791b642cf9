//! Appointments server - appointment management API for doctors
//!
//! This library provides the HTTP surface (routes, handlers, JWT
//! authentication, OpenAPI docs), the appointment use cases and the storage
//! backends behind them. The binary in `main.rs` only loads configuration and
//! serves [`create_app`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod server;
pub mod services;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use error::*;
pub use server::AppointmentsServer;

use axum::{
    body::Body,
    http::Request,
    middleware::from_fn,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(server: AppointmentsServer) -> Router {
    let cors = middleware::create_cors_layer(&server.config.cors_origins);
    let timeout = Duration::from_secs(server.config.request_timeout_secs);

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    // Path only; query strings carry SSNs
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }))
                .layer(cors)
                .layer(from_fn(middleware::request_timing_middleware))
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(server)
}
