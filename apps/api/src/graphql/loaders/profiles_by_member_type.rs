//! Profiles-by-MemberType DataLoader for batched fetching

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;

use super::match_many;
use crate::models::{MemberTypeId, Profile, ProfileFilter};
use crate::repositories::{ProfileRepository, RepositoryError};

/// DataLoader for batching profiles-by-member-type queries
#[derive(Clone)]
pub struct ProfilesByMemberTypeLoader {
    repo: Arc<dyn ProfileRepository>,
}

impl ProfilesByMemberTypeLoader {
    pub fn new(repo: Arc<dyn ProfileRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<MemberTypeId> for ProfilesByMemberTypeLoader {
    type Value = Vec<Profile>;
    type Error = RepositoryError;

    async fn load(
        &self,
        keys: &[MemberTypeId],
    ) -> Result<HashMap<MemberTypeId, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), "loading profiles by member type");
        let profiles = self
            .repo
            .find_many(ProfileFilter::by_member_types(keys))
            .await?;
        Ok(match_many(keys, profiles, |p| p.member_type_id))
    }
}
