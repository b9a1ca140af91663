//! Profile GraphQL type

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::{null_on_error, RequestContext};
use crate::models::Profile as DbProfile;

use super::member_type::{MemberType, MemberTypeId};
use super::user::User;

/// Profile exposed via GraphQL
pub struct Profile {
    inner: DbProfile,
}

impl From<DbProfile> for Profile {
    fn from(profile: DbProfile) -> Self {
        Self { inner: profile }
    }
}

#[Object]
impl Profile {
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn is_male(&self) -> bool {
        self.inner.is_male
    }

    async fn year_of_birth(&self) -> i32 {
        self.inner.year_of_birth
    }

    async fn member_type_id(&self) -> MemberTypeId {
        self.inner.member_type_id.into()
    }

    async fn user_id(&self) -> Uuid {
        self.inner.user_id
    }

    /// Owner of this profile
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loader = &RequestContext::from_ctx(ctx)?.loaders.user;
        let user = null_on_error(ctx, loader.load_one(self.inner.user_id).await);
        Ok(user.map(User::from))
    }

    /// Membership tier of this profile
    ///
    /// Profiles listed together share one member type batch.
    async fn member_type(&self, ctx: &Context<'_>) -> Result<Option<MemberType>> {
        let loader = &RequestContext::from_ctx(ctx)?.loaders.member_type;
        let member_type = null_on_error(ctx, loader.load_one(self.inner.member_type_id).await);
        Ok(member_type.map(MemberType::from))
    }
}
