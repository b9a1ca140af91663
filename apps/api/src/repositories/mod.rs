//! Repository layer for Rookery
//!
//! Each entity has an async trait describing what the resolvers and loaders
//! need from storage. Two adapters implement every trait:
//! - PostgreSQL (`Pg*Repository`), used in deployments
//! - [`MemoryRepository`], a seeded in-process store with a call journal,
//!   used by tests and the `memory` storage backend
//!
//! [`Repositories`] bundles one trait object per entity and is what the
//! request context carries around.

pub mod error;
pub mod member_type;
pub mod memory;
pub mod post;
pub mod profile;
pub mod subscription;
pub mod user;
pub mod utils;

pub use error::{RepositoryError, RepositoryResult};
pub use member_type::{MemberTypeRepository, PgMemberTypeRepository};
pub use memory::{MemoryRepository, RepositoryCall};
pub use post::{PgPostRepository, PostRepository};
pub use profile::{PgProfileRepository, ProfileRepository};
pub use subscription::{PgSubscriptionRepository, SubscriptionRepository};
pub use user::{PgUserRepository, UserRepository};

use std::sync::Arc;

use sqlx::PgPool;

/// Handle to every entity repository
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub member_types: Arc<dyn MemberTypeRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}

impl Repositories {
    /// Build PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            profiles: Arc::new(PgProfileRepository::new(pool.clone())),
            member_types: Arc::new(PgMemberTypeRepository::new(pool.clone())),
            subscriptions: Arc::new(PgSubscriptionRepository::new(pool)),
        }
    }

    /// Build repositories that all read and write the given in-memory store
    pub fn in_memory(store: MemoryRepository) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            posts: store.clone(),
            profiles: store.clone(),
            member_types: store.clone(),
            subscriptions: store,
        }
    }
}
