//! Profile-by-User DataLoader for batched fetching
//!
//! Keys are user ids; the row whose `user_id` equals the key is the match.
//! A user owns at most one profile.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::match_one;
use crate::models::{Profile, ProfileFilter};
use crate::repositories::{ProfileRepository, RepositoryError};

/// DataLoader for batching profile-by-owner queries
#[derive(Clone)]
pub struct ProfileByUserLoader {
    repo: Arc<dyn ProfileRepository>,
}

impl ProfileByUserLoader {
    pub fn new(repo: Arc<dyn ProfileRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<Uuid> for ProfileByUserLoader {
    type Value = Profile;
    type Error = RepositoryError;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), "loading profiles by user");
        let profiles = self.repo.find_many(ProfileFilter::by_users(keys)).await?;
        Ok(match_one(keys, profiles, |p| p.user_id))
    }
}
