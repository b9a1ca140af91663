//! Post DataLoader for batched fetching

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::match_one;
use crate::models::{Post, PostFilter};
use crate::repositories::{PostRepository, RepositoryError};

/// DataLoader for batching post queries by post id
#[derive(Clone)]
pub struct PostLoader {
    repo: Arc<dyn PostRepository>,
}

impl PostLoader {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<Uuid> for PostLoader {
    type Value = Post;
    type Error = RepositoryError;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), "loading posts");
        let posts = self.repo.find_many(PostFilter::by_ids(keys)).await?;
        Ok(match_one(keys, posts, |p| p.id))
    }
}
