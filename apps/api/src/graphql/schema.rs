//! GraphQL schema builder for Rookery
//!
//! The schema itself is shared by every request. Per-request state (the
//! repositories handle and a fresh loader set) is attached to each request
//! as a [`RequestContext`](super::context::RequestContext) by the HTTP
//! handler, never to the schema.

use async_graphql::{EmptySubscription, Schema};

use super::guards::{DepthLimit, DEFAULT_MAX_DEPTH};
use super::mutation::Mutation;
use super::query::Query;

/// The Rookery GraphQL schema type
pub type RookerySchema = Schema<Query, Mutation, EmptySubscription>;

/// Builder for constructing the GraphQL schema
pub struct SchemaBuilder {
    max_depth: usize,
    introspection: bool,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            introspection: true,
        }
    }

    /// Set the maximum query depth enforced before execution
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable schema introspection
    pub fn introspection(mut self, enabled: bool) -> Self {
        self.introspection = enabled;
        self
    }

    /// Build the schema
    pub fn build(self) -> RookerySchema {
        let mut builder = Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .extension(DepthLimit::new(self.max_depth));

        if !self.introspection {
            builder = builder.disable_introspection();
        }

        builder.finish()
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a schema with the given depth limit and introspection enabled
pub fn build_schema(max_depth: usize) -> RookerySchema {
    SchemaBuilder::new().max_depth(max_depth).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder_default() {
        let builder = SchemaBuilder::default();
        assert_eq!(builder.max_depth, DEFAULT_MAX_DEPTH);
        assert!(builder.introspection);
    }

    #[test]
    fn test_sdl_names() {
        let sdl = build_schema(5).sdl();
        assert!(sdl.contains("userSubscribedTo: [User!]!"));
        assert!(sdl.contains("subscribedToUser: [User!]!"));
        assert!(sdl.contains("postsLimitPerMonth: Int!"));
        assert!(sdl.contains("createUser(dto: CreateUserInput!): User!"));
        assert!(sdl.contains("deleteUser(id: UUID!): Boolean!"));
        assert!(sdl.contains("subscribeTo(userId: UUID!, authorId: UUID!): User!"));
        assert!(sdl.contains("memberType(id: MemberTypeId!): MemberType"));
    }

    #[test]
    fn test_member_type_enum_values_are_lowercase() {
        let sdl = build_schema(5).sdl();
        assert!(sdl.contains("enum MemberTypeId"));
        assert!(sdl.contains("\tbasic\n"));
        assert!(sdl.contains("\tbusiness\n"));
    }
}
