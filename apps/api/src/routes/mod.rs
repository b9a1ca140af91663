//! HTTP route handlers for the Rookery API
//!
//! - GraphQL endpoint and playground
//! - Health check and readiness endpoints

pub mod graphql;
pub mod health;

pub use graphql::{graphql_router, GraphQLState};
pub use health::{health_router, HealthState};

use axum::Router;
use tower_http::trace::TraceLayer;

/// Assemble the application router without CORS
///
/// The binary adds its CORS layer on top; tests drive this router directly.
pub fn app(graphql: GraphQLState, health: HealthState) -> Router {
    Router::new()
        .nest("/graphql", graphql_router(graphql))
        .nest("/health", health_router(health))
        .layer(TraceLayer::new_for_http())
}
