//! GraphQL type definitions for Rookery
//!
//! Each object wraps its database model and resolves relationship fields
//! through the request's loaders.

mod member_type;
mod post;
mod profile;
mod user;

pub use member_type::{MemberType, MemberTypeId};
pub use post::Post;
pub use profile::Profile;
pub use user::User;
