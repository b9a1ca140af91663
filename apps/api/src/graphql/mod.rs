//! GraphQL schema and resolvers for Rookery
//!
//! This module contains the async-graphql schema including:
//! - Query and mutation resolvers for users, posts, profiles, member types
//! - Type definitions whose relationship fields resolve through loaders
//! - Per-request batch loaders and the context that carries them
//! - The query depth guard

pub mod context;
pub mod guards;
pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use context::RequestContext;
pub use guards::{check_depth, DepthLimit};
pub use loaders::{LoaderConfig, Loaders};
pub use schema::{build_schema, RookerySchema, SchemaBuilder};
