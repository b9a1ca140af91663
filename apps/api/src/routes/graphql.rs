//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - Execute a GraphQL request
//! - `GET /graphql` - GraphQL Playground (when enabled)
//!
//! Every request gets its own [`RequestContext`] with fresh loaders.

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::graphql::{LoaderConfig, RequestContext, RookerySchema};
use crate::repositories::Repositories;

/// Shared state for the GraphQL endpoint
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: RookerySchema,
    pub repos: Repositories,
    pub loader_config: LoaderConfig,
    pub playground: bool,
}

impl GraphQLState {
    pub fn new(schema: RookerySchema, repos: Repositories, loader_config: LoaderConfig) -> Self {
        Self {
            schema,
            repos,
            loader_config,
            playground: false,
        }
    }

    /// Serve the playground on `GET /graphql`
    pub fn with_playground(mut self, enabled: bool) -> Self {
        self.playground = enabled;
        self
    }
}

/// Create the GraphQL router, mounted at `/graphql`
pub fn graphql_router(state: GraphQLState) -> Router {
    Router::new()
        .route("/", get(graphql_playground).post(graphql_handler))
        .with_state(state)
}

async fn graphql_handler(State(state): State<GraphQLState>, req: GraphQLRequest) -> GraphQLResponse {
    let request = req.into_inner();
    tracing::debug!(
        operation = request.operation_name.as_deref().unwrap_or("anonymous"),
        query_len = request.query.len(),
        "GraphQL request"
    );

    let context = RequestContext::new(state.repos.clone(), &state.loader_config);
    state.schema.execute(request.data(context)).await.into()
}

async fn graphql_playground(State(state): State<GraphQLState>) -> impl IntoResponse {
    if !state.playground {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql"))).into_response()
}
