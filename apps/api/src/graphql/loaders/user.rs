//! User DataLoader for batched fetching
//!
//! Batches user id lookups (post authors, profile owners, subscription
//! targets) into one `find_many` call per dispatch.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::match_one;
use crate::models::{User, UserFilter};
use crate::repositories::utils::preview_keys;
use crate::repositories::{RepositoryError, UserRepository};

/// DataLoader for batching user queries
#[derive(Clone)]
pub struct UserLoader {
    repo: Arc<dyn UserRepository>,
}

impl UserLoader {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<Uuid> for UserLoader {
    type Value = User;
    type Error = RepositoryError;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), keys = %preview_keys(keys), "loading users");
        let users = self.repo.find_many(UserFilter::by_ids(keys)).await?;
        Ok(match_one(keys, users, |u| u.id))
    }
}
