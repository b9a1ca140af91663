//! User mutations, including follow and unfollow

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::context::{to_graphql_error, RequestContext};
use crate::graphql::types::User;
use crate::models::{ChangeUser, CreateUser};

/// Input for creating a user
#[derive(Debug, Clone, InputObject)]
pub struct CreateUserInput {
    pub name: String,
    pub balance: f64,
}

impl From<CreateUserInput> for CreateUser {
    fn from(input: CreateUserInput) -> Self {
        Self {
            name: input.name,
            balance: input.balance,
        }
    }
}

/// Input for changing a user; omitted fields keep their value
#[derive(Debug, Clone, InputObject)]
pub struct ChangeUserInput {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

impl From<ChangeUserInput> for ChangeUser {
    fn from(input: ChangeUserInput) -> Self {
        Self {
            name: input.name,
            balance: input.balance,
        }
    }
}

/// User mutations
#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, dto: CreateUserInput) -> Result<User> {
        let rc = RequestContext::from_ctx(ctx)?;
        let user = rc
            .repos
            .users
            .create(dto.into())
            .await
            .map_err(to_graphql_error)?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(User::from(user))
    }

    async fn change_user(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeUserInput,
    ) -> Result<User> {
        let rc = RequestContext::from_ctx(ctx)?;
        let user = rc
            .repos
            .users
            .update(id, dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(User::from(user))
    }

    /// Delete a user together with their profile, posts and subscriptions
    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let rc = RequestContext::from_ctx(ctx)?;
        rc.repos.users.delete(id).await.map_err(to_graphql_error)?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(true)
    }

    /// Make `user_id` follow `author_id`, returning the follower
    async fn subscribe_to(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<User> {
        let rc = RequestContext::from_ctx(ctx)?;
        rc.repos
            .subscriptions
            .create(user_id, author_id)
            .await
            .map_err(to_graphql_error)?;
        let user = rc
            .repos
            .users
            .find_by_id(user_id)
            .await
            .map_err(to_graphql_error)?
            .ok_or_else(|| ApiError::not_found("user", user_id.to_string()).into_graphql())?;
        Ok(User::from(user))
    }

    /// Remove the `user_id` follows `author_id` edge
    async fn unsubscribe_from(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool> {
        let rc = RequestContext::from_ctx(ctx)?;
        rc.repos
            .subscriptions
            .delete(user_id, author_id)
            .await
            .map_err(to_graphql_error)?;
        Ok(true)
    }
}
