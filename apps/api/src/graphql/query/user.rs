//! User queries
//!
//! The `users` listing looks at its own selection set: when either
//! subscription direction is selected, the edges come back in the same
//! repository call and the edge loaders are primed, so nested relation
//! fields resolve from cache.

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::context::{null_on_error, to_graphql_error, RequestContext};
use crate::graphql::types::User;
use crate::models::SubscriptionInclude;

const SUBSCRIBED_TO: &str = "userSubscribedTo";
const SUBSCRIBERS: &str = "subscribedToUser";

/// User queries
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Get a user by ID
    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        let rc = RequestContext::from_ctx(ctx)?;
        let user = null_on_error(ctx, rc.loaders.user.load_one(id).await);
        Ok(user.map(User::from))
    }

    /// List all users
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let rc = RequestContext::from_ctx(ctx)?;
        let lookahead = ctx.look_ahead();

        // A listing holds every user, so edges read for it also answer the
        // opposite direction one level down.
        let include = SubscriptionInclude {
            subscribed_to: lookahead.field(SUBSCRIBED_TO).exists()
                || lookahead.field(SUBSCRIBERS).field(SUBSCRIBED_TO).exists(),
            subscribers: lookahead.field(SUBSCRIBERS).exists()
                || lookahead.field(SUBSCRIBED_TO).field(SUBSCRIBERS).exists(),
        };

        let listing = rc
            .repos
            .users
            .list_with_subscriptions(include)
            .await
            .map_err(to_graphql_error)?;
        tracing::debug!(
            users = listing.users.len(),
            edges = listing.subscriptions.len(),
            ?include,
            "listed users"
        );

        rc.loaders.prime_users(&listing.users).await;
        if include.any() {
            let ids: Vec<Uuid> = listing.users.iter().map(|u| u.id).collect();
            rc.loaders
                .prime_subscriptions(
                    &ids,
                    &listing.subscriptions,
                    include.subscribed_to,
                    include.subscribers,
                )
                .await;
        }

        Ok(listing.users.into_iter().map(User::from).collect())
    }
}
