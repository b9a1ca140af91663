//! Per-request GraphQL context
//!
//! A [`RequestContext`] is created by the HTTP handler for every incoming
//! request and attached to that request only. It owns a fresh [`Loaders`]
//! set, so loader caches live exactly as long as the request and are never
//! shared between callers.

use async_graphql::Context;

use crate::error::ApiError;
use crate::graphql::loaders::{LoaderConfig, Loaders};
use crate::repositories::{RepositoryError, Repositories};

/// Repository handle plus the request's loader set
#[derive(Clone)]
pub struct RequestContext {
    pub repos: Repositories,
    pub loaders: Loaders,
}

impl RequestContext {
    /// Build a context with empty loader caches
    pub fn new(repos: Repositories, config: &LoaderConfig) -> Self {
        let loaders = Loaders::new(&repos, config);
        Self { repos, loaders }
    }

    /// Fetch the context attached to the current request
    pub fn from_ctx<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a Self> {
        ctx.data::<RequestContext>()
    }
}

/// Convert a repository failure into a GraphQL field error
pub(crate) fn to_graphql_error(err: RepositoryError) -> async_graphql::Error {
    ApiError::from(err).into_graphql()
}

/// Resolve a nullable field from a loader result
///
/// A failed load is reported against this field's path and the field itself
/// resolves to `null`, so sibling fields are unaffected.
pub(crate) fn null_on_error<T>(
    ctx: &Context<'_>,
    result: Result<Option<T>, RepositoryError>,
) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(err) => {
            let error = ApiError::from(err).into_graphql();
            ctx.add_error(ctx.set_error_path(error.into_server_error(ctx.item.pos)));
            None
        }
    }
}
