//! Test helper functions for API integration tests
//!
//! [`TestApp`] wires the schema to an in-memory store and executes each
//! request with its own context, the same way the HTTP handler does.

#![allow(dead_code)]

use async_graphql::{Request, Response, ServerError};
use axum::Router;
use rookery_api::graphql::{LoaderConfig, RequestContext, RookerySchema, SchemaBuilder};
use rookery_api::repositories::{MemoryRepository, Repositories};
use rookery_api::routes::{app, GraphQLState, HealthState};
use rookery_shared_config::StorageBackend;

/// In-memory application harness
pub struct TestApp {
    pub store: MemoryRepository,
    pub repos: Repositories,
    pub schema: RookerySchema,
    pub loader_config: LoaderConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_max_depth(5)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        let store = MemoryRepository::new();
        Self {
            repos: Repositories::in_memory(store.clone()),
            store,
            schema: SchemaBuilder::new().max_depth(max_depth).build(),
            loader_config: LoaderConfig::default(),
        }
    }

    /// A fresh request context, as the HTTP handler would build it
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.repos.clone(), &self.loader_config)
    }

    /// Execute a query with a fresh request context
    pub async fn execute(&self, query: &str) -> Response {
        self.execute_request(Request::new(query)).await
    }

    pub async fn execute_request(&self, request: Request) -> Response {
        self.schema.execute(request.data(self.context())).await
    }

    /// The full HTTP router over this app's store
    pub fn router(&self, playground: bool) -> Router {
        let graphql = GraphQLState::new(self.schema.clone(), self.repos.clone(), self.loader_config)
            .with_playground(playground);
        let health = HealthState::new(self.repos.clone(), StorageBackend::Memory);
        app(graphql, health)
    }
}

/// Response data as JSON
pub fn data(response: &Response) -> serde_json::Value {
    response.data.clone().into_json().expect("response data is JSON")
}

/// The `extensions.code` of a GraphQL error, if any
pub fn error_code(error: &ServerError) -> Option<String> {
    let json = serde_json::to_value(error).ok()?;
    json["extensions"]["code"].as_str().map(str::to_string)
}

/// Assert that a result contains a specific error message substring
#[macro_export]
macro_rules! assert_err_contains {
    ($result:expr, $substr:expr) => {
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let msg = e.to_string();
                assert!(
                    msg.contains($substr),
                    "Error message '{}' does not contain '{}'",
                    msg,
                    $substr
                );
            }
        }
    };
}
