//! Subscription edge DataLoaders
//!
//! Both loaders resolve to lists of user ids rather than users. Resolvers
//! then hand those ids to [`UserLoader`](super::UserLoader), which keeps a
//! two-level traversal at one edge batch plus one user batch.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::match_many;
use crate::models::SubscriptionFilter;
use crate::repositories::{RepositoryError, SubscriptionRepository};

/// Subscriber id to the ids of the authors they follow
#[derive(Clone)]
pub struct SubscribedToLoader {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscribedToLoader {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<Uuid> for SubscribedToLoader {
    type Value = Vec<Uuid>;
    type Error = RepositoryError;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), "loading followed authors");
        let edges = self
            .repo
            .find_many(SubscriptionFilter::by_subscribers(keys))
            .await?;
        Ok(match_many(keys, edges, |e| e.subscriber_id)
            .into_iter()
            .map(|(id, edges)| (id, edges.into_iter().map(|e| e.author_id).collect()))
            .collect())
    }
}

/// Author id to the ids of the users following them
#[derive(Clone)]
pub struct SubscribersLoader {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscribersLoader {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<Uuid> for SubscribersLoader {
    type Value = Vec<Uuid>;
    type Error = RepositoryError;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), "loading subscribers");
        let edges = self
            .repo
            .find_many(SubscriptionFilter::by_authors(keys))
            .await?;
        Ok(match_many(keys, edges, |e| e.author_id)
            .into_iter()
            .map(|(id, edges)| (id, edges.into_iter().map(|e| e.subscriber_id).collect()))
            .collect())
    }
}
