//! Posts-by-Author DataLoader for batched fetching
//!
//! This loader batches multiple author id lookups into a single repository
//! call, returning all posts for each author. Authors without posts map to
//! an empty list.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::match_many;
use crate::models::{Post, PostFilter};
use crate::repositories::{PostRepository, RepositoryError};

/// DataLoader for batching posts-by-author queries
#[derive(Clone)]
pub struct PostsByAuthorLoader {
    repo: Arc<dyn PostRepository>,
}

impl PostsByAuthorLoader {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<Uuid> for PostsByAuthorLoader {
    type Value = Vec<Post>;
    type Error = RepositoryError;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), "loading posts by author");
        let posts = self.repo.find_many(PostFilter::by_authors(keys)).await?;
        Ok(match_many(keys, posts, |p| p.author_id))
    }
}
