//! Profile queries

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::{null_on_error, to_graphql_error, RequestContext};
use crate::graphql::types::Profile;
use crate::models::ProfileFilter;

/// Profile queries
#[derive(Default)]
pub struct ProfileQuery;

#[Object]
impl ProfileQuery {
    /// Get a profile by ID
    async fn profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Profile>> {
        let rc = RequestContext::from_ctx(ctx)?;
        let profile = null_on_error(ctx, rc.loaders.profile.load_one(id).await);
        Ok(profile.map(Profile::from))
    }

    /// List all profiles
    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<Profile>> {
        let rc = RequestContext::from_ctx(ctx)?;
        let profiles = rc
            .repos
            .profiles
            .find_many(ProfileFilter::default())
            .await
            .map_err(to_graphql_error)?;
        rc.loaders.prime_profiles(&profiles).await;
        Ok(profiles.into_iter().map(Profile::from).collect())
    }
}
