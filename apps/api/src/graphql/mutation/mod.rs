//! GraphQL mutations for Rookery
//!
//! Mutations write straight through the repositories. They do not touch the
//! request's loader caches, so a value loaded earlier in the same request is
//! not refreshed by a later write.

mod post;
mod profile;
mod user;

pub use post::{ChangePostInput, CreatePostInput, PostMutation};
pub use profile::{ChangeProfileInput, CreateProfileInput, ProfileMutation};
pub use user::{ChangeUserInput, CreateUserInput, UserMutation};

use async_graphql::MergedObject;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(UserMutation, PostMutation, ProfileMutation);
