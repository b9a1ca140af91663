//! Post GraphQL type

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::{null_on_error, RequestContext};
use crate::models::Post as DbPost;

use super::user::User;

/// Post exposed via GraphQL
pub struct Post {
    inner: DbPost,
}

impl From<DbPost> for Post {
    fn from(post: DbPost) -> Self {
        Self { inner: post }
    }
}

#[Object]
impl Post {
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn title(&self) -> &str {
        &self.inner.title
    }

    async fn content(&self) -> &str {
        &self.inner.content
    }

    async fn author_id(&self) -> Uuid {
        self.inner.author_id
    }

    /// Author of this post (uses the user loader)
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loader = &RequestContext::from_ctx(ctx)?.loaders.user;
        let author = null_on_error(ctx, loader.load_one(self.inner.author_id).await);
        Ok(author.map(User::from))
    }
}
