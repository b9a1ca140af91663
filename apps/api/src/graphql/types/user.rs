//! User GraphQL type
//!
//! Users are the hub of the graph: profile, posts and both subscription
//! directions all resolve through loaders so a listing of N users costs a
//! constant number of repository calls per nesting level.

use std::sync::Arc;

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::{null_on_error, to_graphql_error, RequestContext};
use crate::graphql::loaders::{CachedLoader, UserLoader};
use crate::models::User as DbUser;

use super::post::Post;
use super::profile::Profile;

/// User exposed via GraphQL
pub struct User {
    inner: DbUser,
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self { inner: user }
    }
}

/// Resolve related ids to users, keeping edge order and dropping dangling ids
async fn users_for(loader: &Arc<CachedLoader<Uuid, UserLoader>>, ids: Vec<Uuid>) -> Result<Vec<User>> {
    let mut found = loader
        .load_many(ids.iter().copied())
        .await
        .map_err(to_graphql_error)?;
    Ok(ids
        .iter()
        .filter_map(|id| found.remove(id))
        .map(User::from)
        .collect())
}

#[Object]
impl User {
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn balance(&self) -> f64 {
        self.inner.balance
    }

    /// Profile owned by this user, if any
    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<Profile>> {
        let loader = &RequestContext::from_ctx(ctx)?.loaders.profile_by_user;
        let profile = null_on_error(ctx, loader.load_one(self.inner.id).await);
        Ok(profile.map(Profile::from))
    }

    /// Posts written by this user
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let loader = &RequestContext::from_ctx(ctx)?.loaders.posts_by_author;
        let posts = loader
            .load_one(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        Ok(posts
            .unwrap_or_default()
            .into_iter()
            .map(Post::from)
            .collect())
    }

    /// Users this user follows
    async fn user_subscribed_to(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = &RequestContext::from_ctx(ctx)?.loaders;
        let author_ids = loaders
            .subscribed_to
            .load_one(self.inner.id)
            .await
            .map_err(to_graphql_error)?
            .unwrap_or_default();
        users_for(&loaders.user, author_ids).await
    }

    /// Users following this user
    async fn subscribed_to_user(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = &RequestContext::from_ctx(ctx)?.loaders;
        let subscriber_ids = loaders
            .subscribers
            .load_one(self.inner.id)
            .await
            .map_err(to_graphql_error)?
            .unwrap_or_default();
        users_for(&loaders.user, subscriber_ids).await
    }
}
