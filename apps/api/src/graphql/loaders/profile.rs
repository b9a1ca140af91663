//! Profile DataLoader for batched fetching

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::match_one;
use crate::models::{Profile, ProfileFilter};
use crate::repositories::{ProfileRepository, RepositoryError};

/// DataLoader for batching profile queries by profile id
#[derive(Clone)]
pub struct ProfileLoader {
    repo: Arc<dyn ProfileRepository>,
}

impl ProfileLoader {
    pub fn new(repo: Arc<dyn ProfileRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<Uuid> for ProfileLoader {
    type Value = Profile;
    type Error = RepositoryError;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), "loading profiles");
        let profiles = self.repo.find_many(ProfileFilter::by_ids(keys)).await?;
        Ok(match_one(keys, profiles, |p| p.id))
    }
}
