//! Database models for Rookery
//!
//! Plain row types shared by the repositories and the GraphQL layer:
//! - Users and the subscription edges between them
//! - Profiles and the member types they reference
//! - Posts

pub mod member_type;
pub mod post;
pub mod profile;
pub mod subscription;
pub mod user;

pub use member_type::{MemberType, MemberTypeId};
pub use post::{ChangePost, CreatePost, Post, PostFilter};
pub use profile::{ChangeProfile, CreateProfile, Profile, ProfileFilter};
pub use subscription::{Subscription, SubscriptionFilter, SubscriptionInclude};
pub use user::{ChangeUser, CreateUser, User, UserFilter, UserListing};
