//! Post queries

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::{null_on_error, to_graphql_error, RequestContext};
use crate::graphql::types::Post;
use crate::models::PostFilter;

/// Post queries
#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Get a post by ID
    async fn post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Post>> {
        let rc = RequestContext::from_ctx(ctx)?;
        let post = null_on_error(ctx, rc.loaders.post.load_one(id).await);
        Ok(post.map(Post::from))
    }

    /// List all posts
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let rc = RequestContext::from_ctx(ctx)?;
        let posts = rc
            .repos
            .posts
            .find_many(PostFilter::default())
            .await
            .map_err(to_graphql_error)?;
        rc.loaders.prime_posts(&posts).await;
        Ok(posts.into_iter().map(Post::from).collect())
    }
}
