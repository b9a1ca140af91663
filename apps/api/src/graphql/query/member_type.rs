//! MemberType queries

use async_graphql::{Context, Object, Result};

use crate::graphql::context::{null_on_error, to_graphql_error, RequestContext};
use crate::graphql::types::{MemberType, MemberTypeId};
use crate::models::MemberTypeId as DbMemberTypeId;

/// Member type queries
#[derive(Default)]
pub struct MemberTypeQuery;

#[Object]
impl MemberTypeQuery {
    /// Get a member type by ID
    async fn member_type(&self, ctx: &Context<'_>, id: MemberTypeId) -> Result<Option<MemberType>> {
        let rc = RequestContext::from_ctx(ctx)?;
        let member_type = null_on_error(
            ctx,
            rc.loaders
                .member_type
                .load_one(DbMemberTypeId::from(id))
                .await,
        );
        Ok(member_type.map(MemberType::from))
    }

    /// List all member types
    async fn member_types(&self, ctx: &Context<'_>) -> Result<Vec<MemberType>> {
        let rc = RequestContext::from_ctx(ctx)?;
        let member_types = rc
            .repos
            .member_types
            .find_many(None)
            .await
            .map_err(to_graphql_error)?;
        rc.loaders.prime_member_types(&member_types).await;
        Ok(member_types.into_iter().map(MemberType::from).collect())
    }
}
