//! MemberType GraphQL type
//!
//! Member types are seeded reference data keyed by a closed enum.

use async_graphql::{Context, Enum, Object, Result};

use crate::graphql::context::{to_graphql_error, RequestContext};
use crate::models::MemberType as DbMemberType;
use crate::models::MemberTypeId as DbMemberTypeId;

use super::profile::Profile;

/// Membership tier identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum MemberTypeId {
    #[graphql(name = "basic")]
    Basic,
    #[graphql(name = "business")]
    Business,
}

impl From<DbMemberTypeId> for MemberTypeId {
    fn from(id: DbMemberTypeId) -> Self {
        match id {
            DbMemberTypeId::Basic => Self::Basic,
            DbMemberTypeId::Business => Self::Business,
        }
    }
}

impl From<MemberTypeId> for DbMemberTypeId {
    fn from(id: MemberTypeId) -> Self {
        match id {
            MemberTypeId::Basic => Self::Basic,
            MemberTypeId::Business => Self::Business,
        }
    }
}

/// Membership tier exposed via GraphQL
pub struct MemberType {
    inner: DbMemberType,
}

impl From<DbMemberType> for MemberType {
    fn from(member_type: DbMemberType) -> Self {
        Self { inner: member_type }
    }
}

#[Object]
impl MemberType {
    async fn id(&self) -> MemberTypeId {
        self.inner.id.into()
    }

    /// Discount granted to members of this tier, in percent
    async fn discount(&self) -> f64 {
        self.inner.discount
    }

    async fn posts_limit_per_month(&self) -> i32 {
        self.inner.posts_limit_per_month
    }

    /// Profiles on this tier (batched per request)
    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<Profile>> {
        let loader = &RequestContext::from_ctx(ctx)?.loaders.profiles_by_member_type;
        let profiles = loader
            .load_one(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        Ok(profiles
            .unwrap_or_default()
            .into_iter()
            .map(Profile::from)
            .collect())
    }
}
