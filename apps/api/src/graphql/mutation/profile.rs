//! Profile mutations

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::context::{to_graphql_error, RequestContext};
use crate::graphql::types::{MemberTypeId, Profile};
use crate::models::{ChangeProfile, CreateProfile};

/// Input for creating a profile; a user may own only one
#[derive(Debug, Clone, InputObject)]
pub struct CreateProfileInput {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub member_type_id: MemberTypeId,
    pub user_id: Uuid,
}

impl From<CreateProfileInput> for CreateProfile {
    fn from(input: CreateProfileInput) -> Self {
        Self {
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            member_type_id: input.member_type_id.into(),
            user_id: input.user_id,
        }
    }
}

/// Input for changing a profile
#[derive(Debug, Clone, InputObject)]
pub struct ChangeProfileInput {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeId>,
}

impl From<ChangeProfileInput> for ChangeProfile {
    fn from(input: ChangeProfileInput) -> Self {
        Self {
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            member_type_id: input.member_type_id.map(Into::into),
        }
    }
}

/// Profile mutations
#[derive(Default)]
pub struct ProfileMutation;

#[Object]
impl ProfileMutation {
    async fn create_profile(&self, ctx: &Context<'_>, dto: CreateProfileInput) -> Result<Profile> {
        let rc = RequestContext::from_ctx(ctx)?;
        let profile = rc
            .repos
            .profiles
            .create(dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Profile::from(profile))
    }

    async fn change_profile(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeProfileInput,
    ) -> Result<Profile> {
        let rc = RequestContext::from_ctx(ctx)?;
        let profile = rc
            .repos
            .profiles
            .update(id, dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Profile::from(profile))
    }

    async fn delete_profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let rc = RequestContext::from_ctx(ctx)?;
        rc.repos.profiles.delete(id).await.map_err(to_graphql_error)?;
        Ok(true)
    }
}
