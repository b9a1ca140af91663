//! MemberType DataLoader for batched fetching
//!
//! Member types are a two-row reference table, but profiles in a listing
//! still ask for them one by one, so they go through a loader like
//! everything else.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;

use super::match_one;
use crate::models::{MemberType, MemberTypeId};
use crate::repositories::{MemberTypeRepository, RepositoryError};

/// DataLoader for batching member type queries
#[derive(Clone)]
pub struct MemberTypeLoader {
    repo: Arc<dyn MemberTypeRepository>,
}

impl MemberTypeLoader {
    pub fn new(repo: Arc<dyn MemberTypeRepository>) -> Self {
        Self { repo }
    }
}

impl Loader<MemberTypeId> for MemberTypeLoader {
    type Value = MemberType;
    type Error = RepositoryError;

    async fn load(
        &self,
        keys: &[MemberTypeId],
    ) -> Result<HashMap<MemberTypeId, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), ?keys, "loading member types");
        let member_types = self.repo.find_many(Some(keys.to_vec())).await?;
        Ok(match_one(keys, member_types, |m| m.id))
    }
}
