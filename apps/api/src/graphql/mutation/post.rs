//! Post mutations

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::context::{to_graphql_error, RequestContext};
use crate::graphql::types::Post;
use crate::models::{ChangePost, CreatePost};

/// Input for creating a post
#[derive(Debug, Clone, InputObject)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

impl From<CreatePostInput> for CreatePost {
    fn from(input: CreatePostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
            author_id: input.author_id,
        }
    }
}

/// Input for changing a post
#[derive(Debug, Clone, InputObject)]
pub struct ChangePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<ChangePostInput> for ChangePost {
    fn from(input: ChangePostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
        }
    }
}

/// Post mutations
#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(&self, ctx: &Context<'_>, dto: CreatePostInput) -> Result<Post> {
        let rc = RequestContext::from_ctx(ctx)?;
        let post = rc
            .repos
            .posts
            .create(dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Post::from(post))
    }

    async fn change_post(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangePostInput,
    ) -> Result<Post> {
        let rc = RequestContext::from_ctx(ctx)?;
        let post = rc
            .repos
            .posts
            .update(id, dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Post::from(post))
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let rc = RequestContext::from_ctx(ctx)?;
        rc.repos.posts.delete(id).await.map_err(to_graphql_error)?;
        Ok(true)
    }
}
